//! Indexed indirect draw argument layout.

use crate::types::MeshDescriptor;

/// Arguments for an indexed indirect draw call.
///
/// This struct matches the GPU layout for `vkCmdDrawIndexedIndirect` /
/// `wgpu::DrawIndexedIndirect`. Byte-exact layout compatibility with that
/// native argument structure is a hard requirement: the generated buffer is
/// consumed directly by the indirect-draw issuing command, with no
/// translation step in between.
///
/// # Memory Layout
///
/// `#[repr(C)]`, 20 bytes, 4-byte aligned, field order fixed by the
/// drawing API.
///
/// # Example
///
/// ```
/// use drawgen::{DrawIndexedIndirectArgs, MeshDescriptor};
///
/// let mesh = MeshDescriptor::new(36, 12, 24);
/// let args = DrawIndexedIndirectArgs::for_mesh(&mesh);
/// assert_eq!(args.index_count, 12);
/// assert_eq!(args.first_index, 36);
/// assert_eq!(args.base_vertex, 24);
/// assert_eq!(args.instance_count, 1);
/// assert_eq!(args.first_instance, 0);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawIndexedIndirectArgs {
    /// Number of indices to draw.
    pub index_count: u32,
    /// Number of instances to draw.
    pub instance_count: u32,
    /// Index of the first index to draw.
    pub first_index: u32,
    /// Value added to each index before reading from the vertex buffer.
    pub base_vertex: i32,
    /// Instance ID of the first instance to draw.
    pub first_instance: u32,
}

impl DrawIndexedIndirectArgs {
    /// Size of the struct in bytes.
    ///
    /// Also the stride between consecutive entries in the draw-argument
    /// buffer for multi-draw indirect.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Build the draw arguments for one object referencing `mesh`.
    ///
    /// This is the whole per-object mapping: the mesh's index range and
    /// base vertex are copied through, the instance count is always 1 (the
    /// generator never batches object instances into one draw) and the
    /// first instance is always 0.
    pub fn for_mesh(mesh: &MeshDescriptor) -> Self {
        Self {
            index_count: mesh.index_count,
            instance_count: 1,
            first_index: mesh.index_offset,
            base_vertex: mesh.vertex_offset,
            first_instance: 0,
        }
    }
}

static_assertions::const_assert_eq!(std::mem::size_of::<DrawIndexedIndirectArgs>(), 20);
static_assertions::const_assert_eq!(std::mem::align_of::<DrawIndexedIndirectArgs>(), 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_offsets_match_indirect_layout() {
        assert_eq!(std::mem::offset_of!(DrawIndexedIndirectArgs, index_count), 0);
        assert_eq!(std::mem::offset_of!(DrawIndexedIndirectArgs, instance_count), 4);
        assert_eq!(std::mem::offset_of!(DrawIndexedIndirectArgs, first_index), 8);
        assert_eq!(std::mem::offset_of!(DrawIndexedIndirectArgs, base_vertex), 12);
        assert_eq!(std::mem::offset_of!(DrawIndexedIndirectArgs, first_instance), 16);
    }

    #[test]
    fn test_for_mesh_mapping() {
        let mesh = MeshDescriptor::new(100, 300, -5);
        let args = DrawIndexedIndirectArgs::for_mesh(&mesh);
        assert_eq!(
            args,
            DrawIndexedIndirectArgs {
                index_count: 300,
                instance_count: 1,
                first_index: 100,
                base_vertex: -5,
                first_instance: 0,
            }
        );
    }

    #[test]
    fn test_negative_base_vertex_bytes() {
        let mesh = MeshDescriptor::new(0, 3, -1);
        let args = DrawIndexedIndirectArgs::for_mesh(&mesh);
        let bytes = bytemuck::bytes_of(&args);
        assert_eq!(&bytes[12..16], &[0xFF, 0xFF, 0xFF, 0xFF]);
    }
}
