//! Error types.

use std::fmt;

/// Errors reported by the host-side setup and validation surface.
///
/// The kernel itself has no error channel: a contract violation during a
/// dispatch (an object naming a mesh slot outside the registry, an
/// under-sized output buffer) produces garbage draw arguments or a device
/// fault, never a value of this type. These variants exist for the pieces
/// that run on the CPU before a dispatch is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawGenError {
    /// Failed to initialize the GPU context.
    InitializationFailed(String),
    /// Failed to create a GPU resource.
    ResourceCreationFailed(String),
    /// An object record names a mesh slot outside the registry.
    MeshIndexOutOfRange {
        /// Position of the offending record in the object table.
        object_index: usize,
        /// The out-of-range mesh index it carries.
        mesh_index: u32,
        /// Length of the mesh registry it was checked against.
        registry_len: usize,
    },
    /// The draw-argument buffer has fewer slots than the object table.
    OutputTooSmall {
        /// Slots required to cover the object table.
        required: usize,
        /// Slots actually available.
        actual: usize,
    },
}

impl fmt::Display for DrawGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitializationFailed(msg) => write!(f, "initialization failed: {msg}"),
            Self::ResourceCreationFailed(msg) => write!(f, "resource creation failed: {msg}"),
            Self::MeshIndexOutOfRange {
                object_index,
                mesh_index,
                registry_len,
            } => write!(
                f,
                "object {object_index} names mesh {mesh_index}, registry has {registry_len} slots"
            ),
            Self::OutputTooSmall { required, actual } => write!(
                f,
                "draw-argument buffer has {actual} slots, {required} required"
            ),
        }
    }
}

impl std::error::Error for DrawGenError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DrawGenError::InitializationFailed("no GPU found".to_string());
        assert_eq!(err.to_string(), "initialization failed: no GPU found");

        let err = DrawGenError::MeshIndexOutOfRange {
            object_index: 7,
            mesh_index: 40,
            registry_len: 3,
        };
        assert_eq!(err.to_string(), "object 7 names mesh 40, registry has 3 slots");

        let err = DrawGenError::OutputTooSmall {
            required: 4,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "draw-argument buffer has 2 slots, 4 required"
        );
    }
}
