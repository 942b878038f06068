//! # drawgen
//!
//! GPU-driven indirect draw argument generation.
//!
//! ## Overview
//!
//! Instead of the CPU submitting one draw call per object, a single
//! compute dispatch turns the scene's object table into a buffer of
//! indexed indirect draw arguments, consumable directly by
//! `multi_draw_indexed_indirect`. One invocation per object reads its
//! record, resolves the referenced mesh in the mesh registry, and writes
//! the draw arguments at the same position in the output buffer — the
//! draw count, index ranges, and vertex offsets never round-trip through
//! the CPU, so upstream GPU passes (culling, LOD selection) can feed the
//! object table without readback.
//!
//! This crate provides:
//! - [`generator`] - the core: the compute kernel and its driver
//!   ([`GpuDrawArgGenerator`]), plus the slice-based reference transform
//!   ([`generate_draw_args`])
//! - [`types`] - the three GPU-shared record layouts
//! - [`ObjectTable`] / [`MeshRegistry`] - host-side owners of the two
//!   input buffers, with generational handles
//!
//! ## Contracts
//!
//! The kernel is a pure, stateless per-index transform with exactly one
//! bounds check (its own invocation index against the object table
//! length). Everything else is the caller's obligation, enforced before
//! dispatch, not inside it:
//!
//! - every object's `mesh_index` addresses a valid mesh registry slot;
//! - the draw-argument buffer has at least one slot per object;
//! - input buffers are not rewritten while the dispatch runs.
//!
//! Violations are not detected on the GPU path; they surface as garbage
//! draw arguments downstream. [`validate_inputs`] checks the first two on
//! host data for debug and validation builds.
//!
//! ## Example
//!
//! ```ignore
//! use drawgen::{GpuContext, GpuDrawArgGenerator, MeshRegistry, ObjectTable};
//!
//! let mut registry = MeshRegistry::new();
//! let cube = registry.register(0, 36, 0);
//!
//! let mut table = ObjectTable::new();
//! table.insert(cube.index());
//! table.insert(cube.index());
//!
//! let ctx = GpuContext::new_headless()?;
//! let generator = GpuDrawArgGenerator::new(ctx.device());
//!
//! let objects = ctx.create_object_buffer(table.records())?;
//! let meshes = ctx.create_mesh_buffer(registry.descriptors())?;
//! let draw_args = ctx.create_draw_arg_buffer(&vec![Default::default(); table.len()])?;
//!
//! let bind_group = generator.create_bind_group(ctx.device(), &objects, &draw_args, &meshes);
//! let mut encoder = ctx
//!     .device()
//!     .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
//! generator.encode(&mut encoder, &bind_group, table.len() as u32);
//! ctx.queue().submit([encoder.finish()]);
//! ```

pub mod error;
pub mod generator;
pub mod objects;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use error::DrawGenError;
pub use generator::{generate_draw_args, validate_inputs, workgroup_count, WORKGROUP_SIZE};
pub use objects::{ObjectHandle, ObjectTable};
pub use registry::{MeshHandle, MeshRegistry};
pub use types::{DrawIndexedIndirectArgs, MeshDescriptor, ObjectRecord};

#[cfg(feature = "wgpu-backend")]
pub use generator::{GpuContext, GpuDrawArgGenerator, DRAW_ARGS_SHADER_SOURCE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
