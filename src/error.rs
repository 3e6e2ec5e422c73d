use crate::di::TypeKey;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MeshjectError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshjectError {
    #[error("Binding already registered: {key}")]
    DuplicateBinding { key: TypeKey },

    #[error("Single scope conflict while binding {key}: {concrete} is already bound")]
    SingleConflict {
        key: TypeKey,
        concrete: &'static str,
    },

    #[error("Single scope requires the default discriminator: {key}")]
    SingleWithId { key: TypeKey },

    #[error("Dependency not found: {key}")]
    UnresolvedDependency { key: TypeKey },

    #[error("Circular dependency detected: {path}")]
    CycleDetected { key: TypeKey, path: String },

    #[error("Resolution depth {depth} exceeded while resolving {key}")]
    DepthExceeded { key: TypeKey, depth: usize },

    #[error("Failed to downcast binding: {key}")]
    DowncastFailed { key: TypeKey },
}

impl MeshjectError {
    /// The binding slot the error is about
    pub fn key(&self) -> TypeKey {
        match self {
            MeshjectError::DuplicateBinding { key }
            | MeshjectError::SingleConflict { key, .. }
            | MeshjectError::SingleWithId { key }
            | MeshjectError::UnresolvedDependency { key }
            | MeshjectError::CycleDetected { key, .. }
            | MeshjectError::DepthExceeded { key, .. }
            | MeshjectError::DowncastFailed { key } => *key,
        }
    }

    /// Whether the error was raised while registering a binding
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            MeshjectError::DuplicateBinding { .. }
                | MeshjectError::SingleConflict { .. }
                | MeshjectError::SingleWithId { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn test_key_and_phase() {
        let key = TypeKey::with_id::<Widget>(2);

        let registration = [
            MeshjectError::DuplicateBinding { key },
            MeshjectError::SingleConflict {
                key,
                concrete: "Widget",
            },
            MeshjectError::SingleWithId { key },
        ];
        let resolution = [
            MeshjectError::UnresolvedDependency { key },
            MeshjectError::CycleDetected {
                key,
                path: format!("{key} -> {key}"),
            },
            MeshjectError::DepthExceeded { key, depth: 3 },
            MeshjectError::DowncastFailed { key },
        ];

        for err in &registration {
            assert_eq!(err.key(), key);
            assert!(err.is_registration());
        }
        for err in &resolution {
            assert_eq!(err.key(), key);
            assert!(!err.is_registration());
        }
    }

    #[test]
    fn test_messages_name_the_key() {
        let err = MeshjectError::SingleWithId {
            key: TypeKey::with_id::<Widget>(4),
        };
        assert!(err.to_string().ends_with("Widget#4"));
    }
}
