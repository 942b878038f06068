//! Common utilities for generator integration tests.
//!
//! The same test body runs against both implementations of the transform:
//! the slice-based reference and, when an adapter is available, the real
//! compute kernel with buffer readback.

use drawgen::{generate_draw_args, DrawIndexedIndirectArgs, MeshDescriptor, ObjectRecord};

#[cfg(feature = "wgpu-backend")]
use drawgen::{GpuContext, GpuDrawArgGenerator};

/// Recognizable fill for draw-argument buffers; any slot still holding it
/// after a run was never written.
pub const SENTINEL: DrawIndexedIndirectArgs = DrawIndexedIndirectArgs {
    index_count: u32::MAX,
    instance_count: u32::MAX,
    first_index: u32::MAX,
    base_vertex: -1,
    first_instance: u32::MAX,
};

/// Which implementation of the transform a test case runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Slice-based reference implementation.
    Cpu,
    /// Compute kernel via wgpu, with readback.
    Gpu,
}

/// Runs the transform in the selected mode.
pub struct Runner {
    #[cfg(feature = "wgpu-backend")]
    gpu: Option<GpuRunner>,
}

impl Runner {
    /// Create a runner for `mode`.
    ///
    /// Returns `None` when the mode is not available on this host (no
    /// adapter, or the backend feature is off).
    pub fn new(mode: Mode) -> Option<Self> {
        let _ = env_logger::builder().is_test(true).try_init();

        match mode {
            Mode::Cpu => Some(Self {
                #[cfg(feature = "wgpu-backend")]
                gpu: None,
            }),
            #[cfg(feature = "wgpu-backend")]
            Mode::Gpu => Some(Self {
                gpu: Some(GpuRunner::new()?),
            }),
            #[cfg(not(feature = "wgpu-backend"))]
            Mode::Gpu => None,
        }
    }

    /// Run the transform once over `initial` and return the resulting
    /// draw-argument buffer contents.
    pub fn generate(
        &self,
        objects: &[ObjectRecord],
        meshes: &[MeshDescriptor],
        initial: &[DrawIndexedIndirectArgs],
    ) -> Vec<DrawIndexedIndirectArgs> {
        self.generate_n(objects, meshes, initial, 1)
    }

    /// Run the transform `dispatches` times back to back over the same
    /// buffers, then return the buffer contents.
    pub fn generate_n(
        &self,
        objects: &[ObjectRecord],
        meshes: &[MeshDescriptor],
        initial: &[DrawIndexedIndirectArgs],
        dispatches: usize,
    ) -> Vec<DrawIndexedIndirectArgs> {
        #[cfg(feature = "wgpu-backend")]
        if let Some(gpu) = &self.gpu {
            return gpu.generate_n(objects, meshes, initial, dispatches);
        }

        let mut out = initial.to_vec();
        for _ in 0..dispatches {
            generate_draw_args(objects, meshes, &mut out);
        }
        out
    }
}

#[cfg(feature = "wgpu-backend")]
struct GpuRunner {
    ctx: GpuContext,
    generator: GpuDrawArgGenerator,
}

#[cfg(feature = "wgpu-backend")]
impl GpuRunner {
    fn new() -> Option<Self> {
        let ctx = GpuContext::new_headless().ok()?;
        let generator = GpuDrawArgGenerator::new(ctx.device());
        Some(Self { ctx, generator })
    }

    fn generate_n(
        &self,
        objects: &[ObjectRecord],
        meshes: &[MeshDescriptor],
        initial: &[DrawIndexedIndirectArgs],
        dispatches: usize,
    ) -> Vec<DrawIndexedIndirectArgs> {
        let device = self.ctx.device();

        let object_buffer = self
            .ctx
            .create_object_buffer(objects)
            .expect("object upload");
        let mesh_buffer = self.ctx.create_mesh_buffer(meshes).expect("mesh upload");
        let draw_args = self
            .ctx
            .create_draw_arg_buffer(initial)
            .expect("draw-arg buffer");

        let bind_group =
            self.generator
                .create_bind_group(device, &object_buffer, &draw_args, &mesh_buffer);

        let size = initial.len() as u64 * DrawIndexedIndirectArgs::SIZE;
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        for _ in 0..dispatches {
            self.generator
                .encode(&mut encoder, &bind_group, objects.len() as u32);
        }
        encoder.copy_buffer_to_buffer(&draw_args, 0, &readback, 0, size);
        self.ctx.queue().submit([encoder.finish()]);

        let slice = readback.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).ok();
        });
        let _ = device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .expect("map_async callback dropped")
            .expect("readback mapping failed");

        let data = slice.get_mapped_range();
        let out = bytemuck::cast_slice::<u8, DrawIndexedIndirectArgs>(&data).to_vec();
        drop(data);
        readback.unmap();
        out
    }
}
