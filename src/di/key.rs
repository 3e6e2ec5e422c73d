use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Integer discriminator that tells apart several bindings of one type.
pub type Id = i32;

/// Identity of one binding slot: a type plus a discriminator.
///
/// Equality and hashing only look at the type identity and the discriminator;
/// the type name is carried along for log and error messages.
#[derive(Clone, Copy)]
pub struct TypeKey {
    type_id: TypeId,
    type_name: &'static str,
    id: Id,
}

impl TypeKey {
    /// Key for `T` with the default discriminator `0`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::with_id::<T>(0)
    }

    /// Key for `T` with an explicit discriminator
    pub fn with_id<T: ?Sized + 'static>(id: Id) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            id,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn id(&self) -> Id {
        self.id
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.id)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    trait Printer {}
    struct ConsolePrinter;

    #[test]
    fn test_default_discriminator_is_zero() {
        assert_eq!(TypeKey::of::<ConsolePrinter>(), TypeKey::with_id::<ConsolePrinter>(0));
        assert_eq!(TypeKey::of::<ConsolePrinter>().id(), 0);
    }

    #[test]
    fn test_discriminator_and_type_both_distinguish() {
        let keys: HashSet<TypeKey> = [
            TypeKey::of::<dyn Printer>(),
            TypeKey::with_id::<dyn Printer>(1),
            TypeKey::of::<ConsolePrinter>(),
            TypeKey::of::<dyn Printer>(),
        ]
        .into_iter()
        .collect();

        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_display_names_type_and_id() {
        let key = TypeKey::with_id::<ConsolePrinter>(2);
        let rendered = key.to_string();
        assert!(rendered.ends_with("ConsolePrinter#2"), "got {rendered}");
    }
}
