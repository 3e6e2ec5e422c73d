mod binder;
mod container;
mod cycle;
mod injectable;
mod injection;
mod injector;
mod key;
mod registry;

pub use binder::{Binder, ScopeRegister, Target};
pub use container::Container;
pub use injectable::{Implements, Injectable, Resolvable};
pub use injection::{
    ConstructorFn, Dependencies, Dependency, InjectionDescriptor, InjectionKind, InjectionPoint,
    InjectionPoints, MethodFn,
};
pub use injector::Injector;
pub use key::{Id, TypeKey};
pub use registry::Scope;

/// Handle to a resolved instance
pub type Shared<T> = std::rc::Rc<T>;
