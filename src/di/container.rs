use super::cycle::ResolutionStack;
use super::registry::{BindingEntry, Concrete, Factory, Registry};
use super::{Binder, ConstructorFn, Dependencies, Id, Injectable, Resolvable, Scope, Shared, TypeKey};
use crate::config::ContainerConfig;
use crate::error::{MeshjectError, Result};
use std::rc::Rc;

/// Dependency injection container.
///
/// Bindings are registered through [`Container::bind`] during installation
/// (`&mut self`) and resolved afterwards through `&self`. Resolution is
/// fail-soft: a key that cannot be produced yields `None`, and that `None`
/// is carried into whatever depended on it.
///
/// The container is single-threaded (`!Send`, `!Sync`). Use one container per
/// thread.
pub struct Container {
    registry: Registry,
    stack: ResolutionStack,
    config: ContainerConfig,
}

impl Container {
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registry: Registry::new(),
            stack: ResolutionStack::new(),
            config,
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Start binding `T` with the default discriminator
    #[must_use]
    pub fn bind<T: ?Sized + 'static>(&mut self) -> Binder<'_, T> {
        self.bind_id::<T>(0)
    }

    /// Start binding `T` under an explicit discriminator
    #[must_use]
    pub fn bind_id<T: ?Sized + 'static>(&mut self, id: Id) -> Binder<'_, T> {
        Binder::new(self, TypeKey::with_id::<T>(id))
    }

    pub(crate) fn register<T: ?Sized + 'static>(
        &mut self,
        key: TypeKey,
        scope: Scope,
        concrete: Option<Concrete>,
        factory: Factory<T>,
    ) -> Result<()> {
        let target = concrete.map_or("<unused>", |c| c.name());
        match self
            .registry
            .register(BindingEntry::new(key, scope, concrete, factory))
        {
            Ok(()) => {
                tracing::debug!("Bound {} -> {} as {}", key, target, scope);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected binding {} -> {}: {}", key, target, e);
                Err(e)
            }
        }
    }

    /// Resolve `T` with the default discriminator
    pub fn resolve<T: ?Sized + Resolvable>(&self) -> Option<Shared<T>> {
        self.resolve_id::<T>(0)
    }

    /// Resolve `T` under `id`; `None` when it cannot be produced
    pub fn resolve_id<T: ?Sized + Resolvable>(&self, id: Id) -> Option<Shared<T>> {
        match self.try_resolve_id::<T>(id) {
            Ok(instance) => Some(instance),
            Err(MeshjectError::CycleDetected { path, .. }) => {
                tracing::warn!("Circular dependency detected: {}", path);
                None
            }
            Err(e) => {
                if self.config.log_resolution_failures {
                    tracing::debug!("Resolved to empty: {}", e);
                }
                None
            }
        }
    }

    /// Same algorithm as [`resolve`](Self::resolve), reporting why the result is empty
    pub fn try_resolve<T: ?Sized + Resolvable>(&self) -> Result<Shared<T>> {
        self.try_resolve_id::<T>(0)
    }

    pub fn try_resolve_id<T: ?Sized + Resolvable>(&self, id: Id) -> Result<Shared<T>> {
        let key = TypeKey::with_id::<T>(id);

        if let Some(entry) = self.registry.route(&key) {
            return self.resolve_bound::<T>(key, entry);
        }

        let _guard = self.stack.enter(key, self.config.max_depth)?;
        T::auto_construct(self).ok_or(MeshjectError::UnresolvedDependency { key })
    }

    fn resolve_bound<T: ?Sized + 'static>(
        &self,
        requested: TypeKey,
        entry: &BindingEntry,
    ) -> Result<Shared<T>> {
        let slot = entry.slot::<T>()?;
        let scope = entry.scope();

        if scope != Scope::Transient {
            if let Some(cached) = slot.cached() {
                tracing::trace!("Cache hit for {}", entry.key());
                return Ok(cached);
            }
        }

        let _guard = self.stack.enter(entry.key(), self.config.max_depth)?;
        let instance = slot
            .produce(self)
            .ok_or(MeshjectError::UnresolvedDependency { key: requested })?;

        if scope != Scope::Transient {
            slot.store(Rc::clone(&instance));
        }
        Ok(instance)
    }

    /// Build a fresh `T` and run its injection points, bypassing the registry
    ///
    /// Meant for root objects that nothing else looks up.
    pub fn instantiate<T: Injectable>(&self) -> Option<Shared<T>> {
        let instance = self.build::<T>();
        if instance.is_none() && self.config.log_resolution_failures {
            tracing::debug!("Failed to instantiate {}", std::any::type_name::<T>());
        }
        instance
    }

    /// Build `T` from a fixed argument list, then run its injection points
    pub fn instantiate_with<T, A>(&self, args: A) -> Shared<T>
    where
        T: Injectable + From<A>,
    {
        let mut instance = T::from(args);
        self.inject(&mut instance);
        Rc::new(instance)
    }

    /// Run every injection point `T` declares against `target`
    pub fn inject<T: Injectable>(&self, target: &mut T) {
        T::injection_points().dispatch(target, self);
    }

    /// Resolve the ordered dependency list `Args` and hand it to `constructor`
    ///
    /// `ids` lines up with the constructor parameters; missing ids default to `0`.
    pub fn construct_with<T, Args, F>(&self, ids: &[Id], constructor: F) -> Option<T>
    where
        Args: Dependencies,
        F: ConstructorFn<T, Args>,
    {
        constructor.construct(Args::resolve_all(self, ids))
    }

    pub(crate) fn build<T: Injectable>(&self) -> Option<Shared<T>> {
        let mut instance = T::construct(self)?;
        tracing::trace!("Constructed {}", std::any::type_name::<T>());
        self.inject(&mut instance);
        Some(Rc::new(instance))
    }

    /// Whether a binding is registered under exactly this key
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.registry.lookup(key).is_some()
    }

    /// Scope of the binding registered under exactly this key
    pub fn scope_of(&self, key: &TypeKey) -> Option<Scope> {
        self.registry.lookup(key).map(BindingEntry::scope)
    }

    /// Keys of every binding that constructs the concrete type `U`
    pub fn bindings_targeting<U: ?Sized + 'static>(&self) -> Vec<TypeKey> {
        self.registry.group_members::<U>().to_vec()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}
