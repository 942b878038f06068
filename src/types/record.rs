//! Input record layouts: the object table and the mesh registry.

/// One entry of the object table.
///
/// The object table is a dense sequence of these records, one per
/// renderable object instance. The generator reads exactly one record per
/// invocation and never writes one.
///
/// # Memory Layout
///
/// `#[repr(C)]`, 8 bytes, 4-byte aligned. Matches the shader-side
/// `ObjectRecord` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectRecord {
    /// Opaque identifier of the object instance.
    ///
    /// Carried for downstream consumers; the generator itself never
    /// interprets it.
    pub object_handle: u32,
    /// Index into the mesh registry.
    ///
    /// Must address a valid registry slot at dispatch time. The kernel
    /// performs no bounds check on this field; an out-of-range value
    /// produces garbage draw arguments.
    pub mesh_index: u32,
}

impl ObjectRecord {
    /// Size of the record in bytes.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Create a new object record.
    pub fn new(object_handle: u32, mesh_index: u32) -> Self {
        Self {
            object_handle,
            mesh_index,
        }
    }
}

/// One entry of the mesh registry.
///
/// Describes where a mesh's geometry lives inside the shared index and
/// vertex buffers. Immutable for the duration of a dispatch.
///
/// # Memory Layout
///
/// `#[repr(C)]`, 16 bytes, 4-byte aligned, std430-compatible. The
/// `reserved` slot is layout padding only and must stay zero.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshDescriptor {
    /// Offset of the mesh's first index, in index-buffer elements.
    pub index_offset: u32,
    /// Number of indices comprising the mesh.
    pub index_count: u32,
    /// Base-vertex offset added to every index when fetching vertex data.
    pub vertex_offset: i32,
    /// Padding for host/device layout compatibility. Always zero.
    pub reserved: u32,
}

impl MeshDescriptor {
    /// Size of the descriptor in bytes.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Create a new mesh descriptor.
    pub fn new(index_offset: u32, index_count: u32, vertex_offset: i32) -> Self {
        Self {
            index_offset,
            index_count,
            vertex_offset,
            reserved: 0,
        }
    }
}

static_assertions::const_assert_eq!(std::mem::size_of::<ObjectRecord>(), 8);
static_assertions::const_assert_eq!(std::mem::align_of::<ObjectRecord>(), 4);
static_assertions::const_assert_eq!(std::mem::size_of::<MeshDescriptor>(), 16);
static_assertions::const_assert_eq!(std::mem::align_of::<MeshDescriptor>(), 4);
