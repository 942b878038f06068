//! GPU-shared record layouts.
//!
//! Every type in this module is `#[repr(C)]` with explicit fixed-width
//! fields so the host-side and shader-side views of the three buffers are
//! byte-for-byte identical. Sizes and alignments are pinned with
//! compile-time assertions.

mod draw_args;
mod record;

pub use draw_args::DrawIndexedIndirectArgs;
pub use record::{MeshDescriptor, ObjectRecord};
