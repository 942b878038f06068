//! Reference implementation of the draw-argument transform.
//!
//! This is the same per-index map the compute kernel performs, expressed
//! over slices. It exists as the semantic reference for the GPU path and
//! as a fallback for hosts without a usable adapter; the two paths must
//! produce byte-identical output for identical inputs.

use crate::error::DrawGenError;
use crate::types::{DrawIndexedIndirectArgs, MeshDescriptor, ObjectRecord};

/// Generate draw arguments for every covered object.
///
/// Position `i` of `out` is derived solely from `objects[i]` and
/// `meshes[objects[i].mesh_index]`. The covered range is
/// `0 .. min(objects.len(), out.len())`:
///
/// - when `out` is longer than the object table (the over-provisioned
///   dispatch shape), the trailing slots are left untouched;
/// - when `out` is shorter, the trailing objects are silently skipped,
///   mirroring an under-provisioned dispatch. Upholding
///   `out.len() >= objects.len()` is the caller's contract, checkable up
///   front with [`validate_inputs`].
///
/// # Panics
///
/// Panics if a covered object record names a mesh index outside `meshes`.
/// The kernel performs no bounds check on the mesh index either; there the
/// same contract violation yields garbage draw arguments instead of a
/// fault. Clamping or skipping here would hide upstream bugs, so the
/// violation is left loud.
pub fn generate_draw_args(
    objects: &[ObjectRecord],
    meshes: &[MeshDescriptor],
    out: &mut [DrawIndexedIndirectArgs],
) {
    let covered = objects.len().min(out.len());
    for (object, slot) in objects[..covered].iter().zip(&mut out[..covered]) {
        let mesh = &meshes[object.mesh_index as usize];
        *slot = DrawIndexedIndirectArgs::for_mesh(mesh);
    }
}

/// Check the caller contracts [`generate_draw_args`] and the kernel rely on.
///
/// Returns the first violation found: an output buffer with fewer slots
/// than the object table, or an object record naming a mesh slot outside
/// the registry. Reads nothing but lengths and mesh indices and writes
/// nothing; intended for debug and validation builds, never wired into the
/// transform itself.
pub fn validate_inputs(
    objects: &[ObjectRecord],
    meshes: &[MeshDescriptor],
    out: &[DrawIndexedIndirectArgs],
) -> Result<(), DrawGenError> {
    if out.len() < objects.len() {
        return Err(DrawGenError::OutputTooSmall {
            required: objects.len(),
            actual: out.len(),
        });
    }
    for (object_index, object) in objects.iter().enumerate() {
        if object.mesh_index as usize >= meshes.len() {
            return Err(DrawGenError::MeshIndexOutOfRange {
                object_index,
                mesh_index: object.mesh_index,
                registry_len: meshes.len(),
            });
        }
    }
    Ok(())
}
