//! Fluent binding builder
//!
//! A binding is declared in three stages and only registered by the last one:
//!
//! ```text
//! container.bind::<dyn Counter>()      // Binder:        which key
//!     .to::<CounterImpl>()             // Target:        which concrete type
//!     .with_args(100)                  // ScopeRegister: how to build it
//!     .as_cached()                     // registration:  Result<()>
//! ```
//!
//! Dropping a stage before the terminal call leaves the container untouched.

use super::registry::{Concrete, Factory};
use super::{Container, Id, Implements, Injectable, Resolvable, Scope, Shared, TypeKey};
use crate::error::Result;
use std::marker::PhantomData;
use std::rc::Rc;

/// Stage 1: the key being bound
#[must_use = "a binding is only registered by as_transient, as_cached or as_single"]
pub struct Binder<'c, T: ?Sized + 'static> {
    container: &'c mut Container,
    key: TypeKey,
    _marker: PhantomData<fn() -> Shared<T>>,
}

/// Stage 2: the key plus the concrete type `U` it will produce
#[must_use = "a binding is only registered by as_transient, as_cached or as_single"]
pub struct Target<'c, T: ?Sized + 'static, U: ?Sized + 'static> {
    container: &'c mut Container,
    key: TypeKey,
    _marker: PhantomData<fn() -> (Shared<T>, Shared<U>)>,
}

/// Stage 3: a complete recipe waiting for its scope
#[must_use = "a binding is only registered by as_transient, as_cached or as_single"]
pub struct ScopeRegister<'c, T: ?Sized + 'static> {
    container: &'c mut Container,
    key: TypeKey,
    concrete: Option<Concrete>,
    factory: Factory<T>,
}

impl<'c, T: ?Sized + 'static> Binder<'c, T> {
    pub(crate) fn new(container: &'c mut Container, key: TypeKey) -> Self {
        Self {
            container,
            key,
            _marker: PhantomData,
        }
    }

    /// Produce instances of `U`, upcast to `T`
    pub fn to<U>(self) -> Target<'c, T, U>
    where
        U: ?Sized + Implements<T>,
    {
        Target {
            container: self.container,
            key: self.key,
            _marker: PhantomData,
        }
    }

    /// Produce instances of `T` itself
    pub fn to_self(self) -> Target<'c, T, T> {
        self.to::<T>()
    }

    /// Reserve the key: it always resolves to empty
    pub fn unused(self) -> ScopeRegister<'c, T> {
        ScopeRegister::unused(self.container, self.key)
    }

    /// Shorthand for `to_self().from_instance(instance)`
    pub fn from_instance(self, instance: Shared<T>) -> ScopeRegister<'c, T> {
        self.to_self().from_instance(instance)
    }
}

impl<'c, T: Injectable> Binder<'c, T> {
    /// Shorthand for `to_self().from_new()`
    pub fn from_new(self) -> ScopeRegister<'c, T> {
        self.to_self().from_new()
    }

    /// Shorthand for `to_self().with_args(args)`
    pub fn with_args<A>(self, args: A) -> ScopeRegister<'c, T>
    where
        A: Clone + 'static,
        T: From<A>,
    {
        self.to_self().with_args(args)
    }

    /// Shorthand for `to_self().from_factory(factory)`
    pub fn from_factory<F>(self, factory: F) -> ScopeRegister<'c, T>
    where
        F: Fn(&Container) -> Option<T> + 'static,
    {
        self.to_self().from_factory(factory)
    }

    /// Shorthand for `to_self().from_fn(factory)`
    pub fn from_fn<F>(self, factory: F) -> ScopeRegister<'c, T>
    where
        F: Fn() -> Option<T> + 'static,
    {
        self.to_self().from_fn(factory)
    }

    pub fn as_transient(self) -> Result<()> {
        self.from_new().as_transient()
    }

    pub fn as_cached(self) -> Result<()> {
        self.from_new().as_cached()
    }

    pub fn as_single(self) -> Result<()> {
        self.from_new().as_single()
    }
}

impl<'c, T, U> Target<'c, T, U>
where
    T: ?Sized + 'static,
    U: ?Sized + Implements<T>,
{
    /// Wrap an instance owned elsewhere
    ///
    /// The container keeps a shared handle and never runs injection on it.
    pub fn from_instance(self, instance: Shared<U>) -> ScopeRegister<'c, T> {
        self.finish(Box::new(move |_| {
            Some(<U as Implements<T>>::upcast(Rc::clone(&instance)))
        }))
    }

    /// Reserve the key: it always resolves to empty
    pub fn unused(self) -> ScopeRegister<'c, T> {
        ScopeRegister::unused(self.container, self.key)
    }

    fn finish(self, factory: Factory<T>) -> ScopeRegister<'c, T> {
        ScopeRegister {
            container: self.container,
            key: self.key,
            concrete: Some(Concrete::of::<U>()),
            factory,
        }
    }
}

impl<'c, T, U> Target<'c, T, U>
where
    T: ?Sized + 'static,
    U: ?Sized + Resolvable + Implements<T>,
{
    /// Alias: resolve `U` (discriminator `0`) and hand out that instance
    pub fn from_resolve(self) -> ScopeRegister<'c, T> {
        self.from_resolve_id(0)
    }

    /// Alias: resolve `U` under `id` and hand out that instance
    ///
    /// The alias builds nothing, so it does not count against a Single
    /// binding of `U`.
    pub fn from_resolve_id(self, id: Id) -> ScopeRegister<'c, T> {
        ScopeRegister {
            container: self.container,
            key: self.key,
            concrete: Some(Concrete::alias::<U>()),
            factory: Box::new(move |container| {
                container
                    .resolve_id::<U>(id)
                    .map(<U as Implements<T>>::upcast)
            }),
        }
    }
}

impl<'c, T, U> Target<'c, T, U>
where
    T: ?Sized + 'static,
    U: Injectable + Implements<T>,
{
    /// Constructor injection, or default construction
    pub fn from_new(self) -> ScopeRegister<'c, T> {
        self.finish(Box::new(|container| {
            container.build::<U>().map(<U as Implements<T>>::upcast)
        }))
    }

    /// Build from a fixed argument list; injection points still run
    pub fn with_args<A>(self, args: A) -> ScopeRegister<'c, T>
    where
        A: Clone + 'static,
        U: From<A>,
    {
        self.finish(Box::new(move |container| {
            let mut instance = U::from(args.clone());
            container.inject(&mut instance);
            Some(<U as Implements<T>>::upcast(Rc::new(instance)))
        }))
    }

    /// Build with a factory that may resolve its own dependencies
    pub fn from_factory<F>(self, factory: F) -> ScopeRegister<'c, T>
    where
        F: Fn(&Container) -> Option<U> + 'static,
    {
        self.finish(Box::new(move |container| {
            let mut instance = factory(container)?;
            container.inject(&mut instance);
            Some(<U as Implements<T>>::upcast(Rc::new(instance)))
        }))
    }

    /// Build with a factory that needs no container
    pub fn from_fn<F>(self, factory: F) -> ScopeRegister<'c, T>
    where
        F: Fn() -> Option<U> + 'static,
    {
        self.from_factory(move |_| factory())
    }
}

impl<'c, T: ?Sized + 'static> ScopeRegister<'c, T> {
    fn unused(container: &'c mut Container, key: TypeKey) -> Self {
        Self {
            container,
            key,
            concrete: None,
            factory: Box::new(|_| None),
        }
    }

    /// Register: a fresh instance on every resolve
    pub fn as_transient(self) -> Result<()> {
        self.register(Scope::Transient)
    }

    /// Register: build once on first resolve, then reuse
    pub fn as_cached(self) -> Result<()> {
        self.register(Scope::Cached)
    }

    /// Register: build once, and own the concrete type exclusively
    pub fn as_single(self) -> Result<()> {
        self.register(Scope::Single)
    }

    fn register(self, scope: Scope) -> Result<()> {
        self.container
            .register(self.key, scope, self.concrete, self.factory)
    }
}
