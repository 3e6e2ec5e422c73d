//! Injection points and the dispatcher that runs them
//!
//! A type lists its injection points through [`Injectable::injection_points`].
//! After the container builds an instance it runs, in this order:
//!
//! ```text
//! 1. field points   (declaration order)
//! 2. method points  (declaration order)
//! 3. trait handler  (at most one)
//! ```
//!
//! Every declared point runs. A dependency that resolves to empty is still
//! assigned or passed as `None`.
//!
//! [`Injectable::injection_points`]: crate::Injectable::injection_points

use super::{Container, Id, Resolvable, Shared, TypeKey};
use std::fmt;
use strum::IntoEnumIterator;

/// A value the container can supply for one declared discriminator
pub trait Dependency: Sized + 'static {
    fn resolve_from(container: &Container, id: Id) -> Self;

    fn key(id: Id) -> TypeKey;
}

impl<T: ?Sized + Resolvable> Dependency for Option<Shared<T>> {
    fn resolve_from(container: &Container, id: Id) -> Self {
        container.resolve_id::<T>(id)
    }

    fn key(id: Id) -> TypeKey {
        TypeKey::with_id::<T>(id)
    }
}

/// An ordered list of dependencies, resolved in parameter order.
///
/// Missing trailing ids default to `0`.
pub trait Dependencies: Sized + 'static {
    fn keys(ids: &[Id]) -> Vec<TypeKey>;

    fn resolve_all(container: &Container, ids: &[Id]) -> Self;
}

/// A method taking `&mut T` followed by resolvable parameters
pub trait MethodFn<T, Args>: 'static {
    fn invoke(&self, target: &mut T, args: Args);
}

/// A constructor taking resolvable parameters and returning `Option<T>`
pub trait ConstructorFn<T, Args>: 'static {
    fn construct(&self, args: Args) -> Option<T>;
}

fn id_at(ids: &[Id], index: usize) -> Id {
    ids.get(index).copied().unwrap_or(0)
}

impl Dependencies for () {
    fn keys(_ids: &[Id]) -> Vec<TypeKey> {
        Vec::new()
    }

    fn resolve_all(_container: &Container, _ids: &[Id]) -> Self {}
}

impl<T, F> MethodFn<T, ()> for F
where
    F: Fn(&mut T) + 'static,
{
    fn invoke(&self, target: &mut T, _args: ()) {
        self(target)
    }
}

impl<T, F> ConstructorFn<T, ()> for F
where
    F: Fn() -> Option<T> + 'static,
{
    fn construct(&self, _args: ()) -> Option<T> {
        self()
    }
}

macro_rules! impl_dependency_tuple {
    ($(($ty:ident, $var:ident, $idx:tt)),+) => {
        impl<$($ty: Dependency),+> Dependencies for ($($ty,)+) {
            fn keys(ids: &[Id]) -> Vec<TypeKey> {
                vec![$($ty::key(id_at(ids, $idx))),+]
            }

            fn resolve_all(container: &Container, ids: &[Id]) -> Self {
                ($($ty::resolve_from(container, id_at(ids, $idx)),)+)
            }
        }

        impl<T, F, $($ty),+> MethodFn<T, ($($ty,)+)> for F
        where
            F: Fn(&mut T, $($ty),+) + 'static,
        {
            fn invoke(&self, target: &mut T, ($($var,)+): ($($ty,)+)) {
                self(target, $($var),+)
            }
        }

        impl<T, F, $($ty),+> ConstructorFn<T, ($($ty,)+)> for F
        where
            F: Fn($($ty),+) -> Option<T> + 'static,
        {
            fn construct(&self, ($($var,)+): ($($ty,)+)) -> Option<T> {
                self($($var),+)
            }
        }
    };
}

impl_dependency_tuple!((A, a, 0));
impl_dependency_tuple!((A, a, 0), (B, b, 1));
impl_dependency_tuple!((A, a, 0), (B, b, 1), (C, c, 2));
impl_dependency_tuple!((A, a, 0), (B, b, 1), (C, c, 2), (D, d, 3));
impl_dependency_tuple!((A, a, 0), (B, b, 1), (C, c, 2), (D, d, 3), (E, e, 4));
impl_dependency_tuple!((A, a, 0), (B, b, 1), (C, c, 2), (D, d, 3), (E, e, 4), (G, g, 5));
impl_dependency_tuple!(
    (A, a, 0),
    (B, b, 1),
    (C, c, 2),
    (D, d, 3),
    (E, e, 4),
    (G, g, 5),
    (H, h, 6)
);
impl_dependency_tuple!(
    (A, a, 0),
    (B, b, 1),
    (C, c, 2),
    (D, d, 3),
    (E, e, 4),
    (G, g, 5),
    (H, h, 6),
    (I, i, 7)
);

/// Kinds of injection point, in dispatch order
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
pub enum InjectionKind {
    Field,
    Method,
    Trait,
}

/// The `(kind, target, ids)` triple describing one injection point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionDescriptor {
    pub kind: InjectionKind,
    pub target: &'static str,
    pub ids: Vec<Id>,
}

type Inject<T> = Box<dyn Fn(&mut T, &Container)>;

pub enum InjectionPoint<T> {
    /// Resolve one dependency and assign it to a member
    Field {
        member: &'static str,
        id: Id,
        inject: Inject<T>,
    },
    /// Resolve every parameter, then call the method once
    Method {
        method: &'static str,
        ids: Vec<Id>,
        inject: Inject<T>,
    },
    /// Custom handler for the exact type
    Trait { handler: Inject<T> },
}

impl<T: 'static> InjectionPoint<T> {
    pub fn kind(&self) -> InjectionKind {
        match self {
            InjectionPoint::Field { .. } => InjectionKind::Field,
            InjectionPoint::Method { .. } => InjectionKind::Method,
            InjectionPoint::Trait { .. } => InjectionKind::Trait,
        }
    }

    pub fn descriptor(&self) -> InjectionDescriptor {
        let (target, ids) = match self {
            InjectionPoint::Field { member, id, .. } => (*member, vec![*id]),
            InjectionPoint::Method { method, ids, .. } => (*method, ids.clone()),
            InjectionPoint::Trait { .. } => (std::any::type_name::<T>(), Vec::new()),
        };
        InjectionDescriptor {
            kind: self.kind(),
            target,
            ids,
        }
    }

    fn run(&self, target: &mut T, container: &Container) {
        match self {
            InjectionPoint::Field { inject, .. }
            | InjectionPoint::Method { inject, .. }
            | InjectionPoint::Trait { handler: inject } => inject(target, container),
        }
    }
}

impl<T: 'static> fmt::Debug for InjectionPoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptor = self.descriptor();
        f.debug_struct("InjectionPoint")
            .field("kind", &descriptor.kind)
            .field("target", &descriptor.target)
            .field("ids", &descriptor.ids)
            .finish()
    }
}

/// Ordered set of injection points declared by `T`
///
/// # Example
/// ```rust,ignore
/// fn injection_points() -> InjectionPoints<Self> {
///     InjectionPoints::new()
///         .field("printer", 1, |this: &mut Self, value| this.printer = value)
///         .method("set_pair", &[0, 2], Self::set_pair)
///         .handler(|this, container| this.ready = container.contains(&TypeKey::of::<Log>()))
/// }
/// ```
pub struct InjectionPoints<T> {
    points: Vec<InjectionPoint<T>>,
}

impl<T: 'static> Default for InjectionPoints<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> InjectionPoints<T> {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Declare a field injection point: resolve `(D, id)` and hand it to `assign`
    pub fn field<D, F>(mut self, member: &'static str, id: Id, assign: F) -> Self
    where
        D: Dependency,
        F: Fn(&mut T, D) + 'static,
    {
        self.points.push(InjectionPoint::Field {
            member,
            id,
            inject: Box::new(move |target, container| {
                assign(target, D::resolve_from(container, id))
            }),
        });
        self
    }

    /// Declare a method injection point; `ids` lines up with the parameters
    pub fn method<Args, F>(mut self, method: &'static str, ids: &[Id], f: F) -> Self
    where
        Args: Dependencies,
        F: MethodFn<T, Args>,
    {
        let declared: Vec<Id> = Args::keys(ids).iter().map(TypeKey::id).collect();
        let resolve_ids = declared.clone();
        self.points.push(InjectionPoint::Method {
            method,
            ids: declared,
            inject: Box::new(move |target, container| {
                let args = Args::resolve_all(container, &resolve_ids);
                f.invoke(target, args)
            }),
        });
        self
    }

    /// Set the custom handler, replacing any handler declared before
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut T, &Container) + 'static,
    {
        self.points.retain(|point| point.kind() != InjectionKind::Trait);
        self.points.push(InjectionPoint::Trait {
            handler: Box::new(handler),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InjectionPoint<T>> {
        self.points.iter()
    }

    /// Descriptors in dispatch order
    pub fn descriptors(&self) -> Vec<InjectionDescriptor> {
        self.ordered().map(InjectionPoint::descriptor).collect()
    }

    pub(crate) fn dispatch(&self, target: &mut T, container: &Container) {
        for point in self.ordered() {
            tracing::trace!(
                "Injecting {} {} into {}",
                point.kind(),
                point.descriptor().target,
                std::any::type_name::<T>()
            );
            point.run(target, container);
        }
    }

    fn ordered(&self) -> impl Iterator<Item = &InjectionPoint<T>> {
        InjectionKind::iter().flat_map(move |kind| {
            self.points
                .iter()
                .filter(move |point| point.kind() == kind)
        })
    }
}
