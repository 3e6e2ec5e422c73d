use super::{Container, Shared, TypeKey};
use crate::error::{MeshjectError, Result};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

/// Lifetime policy of the instances a binding produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::AsRefStr)]
pub enum Scope {
    /// A fresh instance on every resolve
    Transient,
    /// Built once, on first resolve, then reused for that key
    Cached,
    /// Like `Cached`, and the only binding allowed for its concrete type
    Single,
}

pub(crate) type Factory<T> = Box<dyn Fn(&Container) -> Option<Shared<T>>>;

/// Typed payload of a binding: its factory and its cache cell.
pub(crate) struct Slot<T: ?Sized> {
    factory: Factory<T>,
    cache: RefCell<Option<Shared<T>>>,
}

impl<T: ?Sized> Slot<T> {
    pub(crate) fn produce(&self, container: &Container) -> Option<Shared<T>> {
        (self.factory)(container)
    }

    pub(crate) fn cached(&self) -> Option<Shared<T>> {
        self.cache.borrow().clone()
    }

    pub(crate) fn store(&self, instance: Shared<T>) {
        let mut cache = self.cache.borrow_mut();
        if cache.is_none() {
            *cache = Some(instance);
        }
    }
}

/// Identity of the type a binding hands out.
///
/// Only bindings that build their instance join that type's [`DerefGroup`];
/// an alias of an existing binding does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Concrete {
    type_id: TypeId,
    name: &'static str,
    constructs: bool,
}

impl Concrete {
    pub(crate) fn of<U: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<U>(),
            name: std::any::type_name::<U>(),
            constructs: true,
        }
    }

    pub(crate) fn alias<U: ?Sized + 'static>() -> Self {
        Self {
            constructs: false,
            ..Self::of::<U>()
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn constructs(&self) -> bool {
        self.constructs
    }
}

pub(crate) struct BindingEntry {
    key: TypeKey,
    scope: Scope,
    concrete: Option<Concrete>,
    slot: Box<dyn Any>,
}

impl BindingEntry {
    pub(crate) fn new<T: ?Sized + 'static>(
        key: TypeKey,
        scope: Scope,
        concrete: Option<Concrete>,
        factory: Factory<T>,
    ) -> Self {
        Self {
            key,
            scope,
            concrete,
            slot: Box::new(Slot {
                factory,
                cache: RefCell::new(None),
            }),
        }
    }

    pub(crate) fn key(&self) -> TypeKey {
        self.key
    }

    pub(crate) fn scope(&self) -> Scope {
        self.scope
    }

    pub(crate) fn slot<T: ?Sized + 'static>(&self) -> Result<&Slot<T>> {
        self.slot
            .downcast_ref::<Slot<T>>()
            .ok_or(MeshjectError::DowncastFailed { key: self.key })
    }
}

/// Every binding that constructs one concrete type
#[derive(Debug, Default)]
pub(crate) struct DerefGroup {
    is_single: bool,
    members: Vec<TypeKey>,
}

/// Table of bindings plus the bookkeeping for single-scope exclusivity.
///
/// A Single binding owns its concrete type outright: it is rejected when the
/// concrete type already has bindings, and later bindings to that concrete
/// type are rejected in turn. Nothing is ever evicted.
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<TypeKey, BindingEntry>,
    groups: HashMap<TypeId, DerefGroup>,
    singles: HashMap<TypeId, TypeKey>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, entry: BindingEntry) -> Result<()> {
        let key = entry.key;

        if self.entries.contains_key(&key) {
            return Err(MeshjectError::DuplicateBinding { key });
        }

        if entry.scope == Scope::Single && key.id() != 0 {
            return Err(MeshjectError::SingleWithId { key });
        }

        if let Some(concrete) = entry.concrete.filter(Concrete::constructs) {
            if let Some(group) = self.groups.get(&concrete.type_id) {
                let conflicts = group.is_single
                    || (entry.scope == Scope::Single && !group.members.is_empty());
                if conflicts {
                    return Err(MeshjectError::SingleConflict {
                        key,
                        concrete: concrete.name,
                    });
                }
            }

            let group = self.groups.entry(concrete.type_id).or_default();
            group.is_single |= entry.scope == Scope::Single;
            if !group.members.contains(&key) {
                group.members.push(key);
            }
        }

        // An unused key stays a reservation of its own discriminator
        if entry.scope == Scope::Single && entry.concrete.is_some() {
            self.singles.insert(key.type_id(), key);
        }

        self.entries.insert(key, entry);
        Ok(())
    }

    /// Exact lookup, no fallback
    pub(crate) fn lookup(&self, key: &TypeKey) -> Option<&BindingEntry> {
        self.entries.get(key)
    }

    /// Lookup used by resolution: the exact key first, then the Single
    /// binding of the requested type, which answers every discriminator.
    pub(crate) fn route(&self, key: &TypeKey) -> Option<&BindingEntry> {
        self.entries.get(key).or_else(|| {
            self.singles
                .get(&key.type_id())
                .and_then(|single| self.entries.get(single))
        })
    }

    /// Keys of the bindings constructing the concrete type `U`, in registration order
    pub(crate) fn group_members<U: ?Sized + 'static>(&self) -> &[TypeKey] {
        self.groups
            .get(&TypeId::of::<U>())
            .map(|group| group.members.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    trait Counter {}
    struct CounterImpl;
    impl Counter for CounterImpl {}
    struct OtherCounter;
    impl Counter for OtherCounter {}

    fn entry<T: ?Sized + 'static, U: 'static>(id: i32, scope: Scope) -> BindingEntry {
        BindingEntry::new::<T>(
            TypeKey::with_id::<T>(id),
            scope,
            Some(Concrete::of::<U>()),
            Box::new(|_| None),
        )
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut registry = Registry::new();
        assert!(registry.register(entry::<dyn Counter, CounterImpl>(0, Scope::Cached)).is_ok());

        let err = registry
            .register(entry::<dyn Counter, OtherCounter>(0, Scope::Transient))
            .unwrap_err();
        assert_eq!(
            err,
            MeshjectError::DuplicateBinding {
                key: TypeKey::of::<dyn Counter>()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_binding_after_single_is_rejected() {
        let mut registry = Registry::new();
        registry
            .register(entry::<dyn Counter, CounterImpl>(0, Scope::Single))
            .unwrap();

        for (id, scope) in [(1, Scope::Transient), (2, Scope::Cached)] {
            let err = registry
                .register(entry::<dyn Counter, CounterImpl>(id, scope))
                .unwrap_err();
            assert!(matches!(err, MeshjectError::SingleConflict { .. }));
        }

        let err = registry
            .register(entry::<CounterImpl, CounterImpl>(0, Scope::Cached))
            .unwrap_err();
        assert!(matches!(err, MeshjectError::SingleConflict { .. }));

        assert!(registry
            .register(entry::<dyn Counter, OtherCounter>(1, Scope::Cached))
            .is_ok());
        assert_eq!(registry.group_members::<CounterImpl>().len(), 1);
    }

    #[test]
    fn test_single_after_binding_is_rejected() {
        let mut registry = Registry::new();
        registry
            .register(entry::<CounterImpl, CounterImpl>(0, Scope::Transient))
            .unwrap();

        let err = registry
            .register(entry::<dyn Counter, CounterImpl>(0, Scope::Single))
            .unwrap_err();
        assert_eq!(
            err,
            MeshjectError::SingleConflict {
                key: TypeKey::of::<dyn Counter>(),
                concrete: std::any::type_name::<CounterImpl>(),
            }
        );
        assert!(registry.lookup(&TypeKey::of::<dyn Counter>()).is_none());
    }

    #[test]
    fn test_single_routes_every_discriminator() {
        let mut registry = Registry::new();
        registry
            .register(entry::<dyn Counter, CounterImpl>(0, Scope::Single))
            .unwrap();
        registry
            .register(entry::<dyn Counter, OtherCounter>(2, Scope::Cached))
            .unwrap();

        let routed = registry.route(&TypeKey::with_id::<dyn Counter>(7)).unwrap();
        assert_eq!(routed.key(), TypeKey::of::<dyn Counter>());

        let exact = registry.route(&TypeKey::with_id::<dyn Counter>(2)).unwrap();
        assert_eq!(exact.scope(), Scope::Cached);

        assert!(registry.lookup(&TypeKey::with_id::<dyn Counter>(7)).is_none());
    }

    #[test]
    fn test_single_requires_default_discriminator() {
        let mut registry = Registry::new();

        let err = registry
            .register(entry::<dyn Counter, CounterImpl>(3, Scope::Single))
            .unwrap_err();
        assert_eq!(
            err,
            MeshjectError::SingleWithId {
                key: TypeKey::with_id::<dyn Counter>(3)
            }
        );
        assert!(registry.route(&TypeKey::of::<dyn Counter>()).is_none());
        assert!(registry.group_members::<CounterImpl>().is_empty());

        registry
            .register(entry::<dyn Counter, CounterImpl>(0, Scope::Single))
            .unwrap();
        let err = registry
            .register(entry::<dyn Counter, OtherCounter>(5, Scope::Single))
            .unwrap_err();
        assert!(matches!(err, MeshjectError::SingleWithId { .. }));
    }

    #[test]
    fn test_unused_single_reserves_only_its_key() {
        let mut registry = Registry::new();
        registry
            .register(BindingEntry::new::<dyn Counter>(
                TypeKey::of::<dyn Counter>(),
                Scope::Single,
                None,
                Box::new(|_| None),
            ))
            .unwrap();

        assert!(registry.route(&TypeKey::of::<dyn Counter>()).is_some());
        assert!(registry.route(&TypeKey::with_id::<dyn Counter>(1)).is_none());
    }

    #[test]
    fn test_alias_does_not_join_group() {
        let mut registry = Registry::new();
        registry
            .register(entry::<CounterImpl, CounterImpl>(0, Scope::Single))
            .unwrap();

        let alias = BindingEntry::new::<dyn Counter>(
            TypeKey::of::<dyn Counter>(),
            Scope::Cached,
            Some(Concrete::alias::<CounterImpl>()),
            Box::new(|_| None),
        );
        assert!(registry.register(alias).is_ok());
        assert_eq!(
            registry.group_members::<CounterImpl>(),
            &[TypeKey::of::<CounterImpl>()]
        );
    }

    #[test]
    fn test_slot_downcast_is_checked() {
        let entry = BindingEntry::new::<dyn Counter>(
            TypeKey::of::<dyn Counter>(),
            Scope::Cached,
            None,
            Box::new(|_| Some(Rc::new(CounterImpl) as Rc<dyn Counter>)),
        );
        assert!(entry.slot::<dyn Counter>().is_ok());
        assert!(matches!(
            entry.slot::<CounterImpl>(),
            Err(MeshjectError::DowncastFailed { .. })
        ));
    }
}
