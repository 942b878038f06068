//! The draw-argument generator core.
//!
//! One parallel invocation per object-table entry: read the object record,
//! dereference the mesh registry, write the indexed indirect draw
//! arguments at the same position in the output buffer. There is no
//! cross-invocation communication of any kind, which is the property that
//! lets the whole pass run as a single unsynchronized dispatch.
//!
//! Two interchangeable paths implement the transform:
//!
//! - [`generate_draw_args`] — the slice-based reference implementation;
//! - [`GpuDrawArgGenerator`] — the compute kernel (feature
//!   `wgpu-backend`).

mod cpu;
#[cfg(feature = "wgpu-backend")]
mod gpu;

pub use cpu::{generate_draw_args, validate_inputs};
#[cfg(feature = "wgpu-backend")]
pub use gpu::{
    GpuContext, GpuDrawArgGenerator, DRAW_ARGS_ENTRY_POINT, DRAW_ARGS_SHADER_SOURCE,
};

/// Invocations per workgroup of the kernel.
///
/// A tuning constant, not a semantic parameter: results do not depend on
/// how the dispatch is partitioned into groups.
pub const WORKGROUP_SIZE: u32 = 64;

/// Number of workgroups needed to cover `object_count` invocations.
///
/// Rounds up, so the last workgroup may carry invocations past the table
/// end; those bounds-check out inside the kernel.
pub fn workgroup_count(object_count: u32) -> u32 {
    object_count.div_ceil(WORKGROUP_SIZE)
}
