//! # Meshject
//!
//! A small dependency injection container: bindings keyed by type and
//! discriminator, three lifetime scopes, and automatic delivery of an
//! object's own dependencies after it is built.
//!
//! ## Features
//!
//! - **Fluent bindings**: `bind` → `to` → instantiation strategy → scope
//! - **Scopes**: `Transient`, `Cached`, and `Single` (exclusive per concrete type)
//! - **Four injection mechanisms**: constructor, field, method and a custom handler
//! - **Fail-soft resolution**: missing dependencies and cycles resolve to `None`
//! - **Trait Object Support**: bind `dyn Trait` keys to concrete implementations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use meshject::prelude::*;
//! use std::cell::Cell;
//!
//! pub trait Counter {
//!     fn count_up(&self) -> i32;
//! }
//!
//! #[derive(Default, Injectable)]
//! pub struct CounterImpl {
//!     count: Cell<i32>,
//! }
//!
//! impl Counter for CounterImpl {
//!     fn count_up(&self) -> i32 {
//!         self.count.set(self.count.get() + 1);
//!         self.count.get()
//!     }
//! }
//!
//! meshject::interface!(dyn Counter);
//! meshject::implements!(CounterImpl => dyn Counter);
//!
//! #[derive(Default, Injectable)]
//! pub struct App {
//!     #[inject]
//!     counter: Option<Rc<dyn Counter>>,
//! }
//!
//! fn main() {
//!     let mut injector = Injector::new();
//!     injector.install(|c: &mut Container| {
//!         c.bind::<dyn Counter>()
//!             .to::<CounterImpl>()
//!             .from_new()
//!             .as_cached()
//!             .expect("counter binding");
//!     });
//!
//!     let app = injector.instantiate::<App>().unwrap();
//!     assert_eq!(app.counter.as_ref().unwrap().count_up(), 1);
//! }
//! ```
//!
//! ## Threading
//!
//! A [`Container`] is single-threaded. Give each thread its own container, or
//! build the graph on one thread and hand out only what it produced.

pub mod config;
pub mod di;
pub mod error;
pub mod installer;

// Re-export core types
pub use config::ContainerConfig;
pub use di::{
    Binder, ConstructorFn, Container, Dependencies, Dependency, Id, Implements,
    InjectionDescriptor, InjectionKind, InjectionPoint, InjectionPoints, Injectable, Injector,
    MethodFn, Resolvable, Scope, ScopeRegister, Shared, Target, TypeKey,
};
pub use error::{MeshjectError, Result};
pub use installer::Installer;

// Re-export macros
pub use meshject_macro::Injectable as DeriveInjectable;

/// Prelude module for convenient imports
///
/// ```
/// use meshject::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::ContainerConfig;
    pub use crate::di::{
        Container, Id, Implements, InjectionPoints, Injectable, Injector, Resolvable, Scope,
        Shared, TypeKey,
    };
    pub use crate::error::{MeshjectError, Result};
    pub use crate::installer::Installer;
    pub use crate::DeriveInjectable as Injectable;
    pub use crate::{implements, interface};
    pub use std::rc::Rc;
}
