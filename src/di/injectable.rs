use super::{Container, InjectionPoints, Shared};

/// A type the container can build on its own
///
/// `construct` is the constructor-injection contract: it receives the
/// container so it can resolve the type's declared dependencies, and returns
/// `None` when the type cannot be built. `injection_points` lists what the
/// container runs against every freshly built instance.
///
/// This trait is usually implemented with `#[derive(Injectable)]`.
///
/// # Example
/// ```rust,ignore
/// use meshject::prelude::*;
///
/// // Trivially constructible, with one field injection point
/// #[derive(Default, Injectable)]
/// pub struct Greeter {
///     #[inject]
///     printer: Option<Rc<dyn Printer>>,
/// }
///
/// // Constructor injection by hand
/// pub struct Report {
///     printer: Rc<dyn Printer>,
/// }
///
/// impl Injectable for Report {
///     fn construct(container: &Container) -> Option<Self> {
///         container.construct_with(&[], |printer: Option<Rc<dyn Printer>>| {
///             Some(Report { printer: printer? })
///         })
///     }
/// }
/// ```
pub trait Injectable: Sized + 'static {
    /// Build an instance, or `None` if a required dependency is missing
    fn construct(container: &Container) -> Option<Self>;

    /// Injection points run after construction, in declaration order
    fn injection_points() -> InjectionPoints<Self> {
        InjectionPoints::new()
    }
}

/// A type that may be requested from the container
///
/// `auto_construct` is the fallback used when no binding exists for the
/// requested key. Every [`Injectable`] type builds itself; interfaces declared
/// with [`interface!`](crate::interface) never auto-construct.
pub trait Resolvable: 'static {
    fn auto_construct(container: &Container) -> Option<Shared<Self>>;
}

impl<T: Injectable> Resolvable for T {
    fn auto_construct(container: &Container) -> Option<Shared<Self>> {
        container.build::<T>()
    }
}

/// Upcast from a concrete (or narrower) type to the interface `I`
///
/// Every type implements itself. Other relations are declared with
/// [`implements!`](crate::implements).
pub trait Implements<I: ?Sized + 'static>: 'static {
    fn upcast(this: Shared<Self>) -> Shared<I>;
}

impl<T: ?Sized + 'static> Implements<T> for T {
    fn upcast(this: Shared<Self>) -> Shared<T> {
        this
    }
}

/// Declare interface types that may be requested from the container.
///
/// ```rust,ignore
/// trait Printer { fn println(&self, line: &str); }
/// meshject::interface!(dyn Printer);
/// ```
#[macro_export]
macro_rules! interface {
    ($($iface:ty),+ $(,)?) => {
        $(
            impl $crate::Resolvable for $iface {
                fn auto_construct(
                    _container: &$crate::Container,
                ) -> ::core::option::Option<$crate::Shared<Self>> {
                    ::core::option::Option::None
                }
            }
        )+
    };
}

/// Declare which interfaces a type implements, so it can be bound with `to`.
///
/// ```rust,ignore
/// meshject::implements!(ConsolePrinter => dyn Printer);
/// meshject::implements!(dyn FancyPrinter => dyn Printer);
/// ```
#[macro_export]
macro_rules! implements {
    ($concrete:ty => $($iface:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$iface> for $concrete {
                fn upcast(this: $crate::Shared<Self>) -> $crate::Shared<$iface> {
                    this
                }
            }
        )+
    };
}
