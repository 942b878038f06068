//! wgpu compute path for draw-argument generation.
//!
//! [`GpuDrawArgGenerator`] wraps the compute pipeline built from the
//! kernel in `shaders/draw_args.wgsl` and records its dispatches.
//! [`GpuContext`] provides headless device bring-up plus buffer creation
//! helpers for tools and tests; an engine embedding the generator will
//! usually own its device already and only use the generator type.

use wgpu::util::DeviceExt;

use crate::error::DrawGenError;
use crate::generator::workgroup_count;
use crate::types::{DrawIndexedIndirectArgs, MeshDescriptor, ObjectRecord};

/// WGSL source of the draw-argument generation kernel.
pub const DRAW_ARGS_SHADER_SOURCE: &str = include_str!("../shaders/draw_args.wgsl");

/// Entry point name of the kernel.
pub const DRAW_ARGS_ENTRY_POINT: &str = "generate_draw_args";

// The kernel writes the native indexed indirect argument layout. wgpu's own
// view of that layout must agree, or the generated buffer cannot be fed to
// the indirect draw commands.
static_assertions::const_assert_eq!(
    std::mem::size_of::<DrawIndexedIndirectArgs>(),
    std::mem::size_of::<wgpu::util::DrawIndexedIndirectArgs>()
);

// ============================================================================
// Generator
// ============================================================================

/// The draw-argument generation pass.
///
/// Holds the compute pipeline and bind group layout; both are immutable
/// after creation, so one generator can record any number of dispatches
/// over any buffer set.
///
/// # Binding contract
///
/// | Binding | Buffer              | Access     |
/// |---------|---------------------|------------|
/// | 0       | object table        | read-only  |
/// | 1       | draw-argument buffer| read-write |
/// | 2       | mesh registry       | read-only  |
///
/// # Caller contracts
///
/// The kernel checks the invocation index against the object table length
/// and nothing else. The caller must guarantee, per dispatch:
///
/// - every object record's `mesh_index` addresses a valid mesh registry
///   slot (violations yield garbage draw arguments, not an error);
/// - the draw-argument buffer has at least one slot per object record;
/// - nothing else writes the draw-argument buffer, and nothing rewrites
///   the two input buffers, while the dispatch runs.
///
/// [`validate_inputs`](crate::generator::validate_inputs) can check the
/// first two on the host copies of the data before upload.
pub struct GpuDrawArgGenerator {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl GpuDrawArgGenerator {
    /// Create the generator, compiling the kernel on `device`.
    pub fn new(device: &wgpu::Device) -> Self {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("draw_args"),
            source: wgpu::ShaderSource::Wgsl(DRAW_ARGS_SHADER_SOURCE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_args"),
            entries: &[
                storage_buffer_entry(0, true),
                storage_buffer_entry(1, false),
                storage_buffer_entry(2, true),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("draw_args"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: DRAW_ARGS_ENTRY_POINT,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        log::debug!("Created draw-argument generator pipeline");

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    /// The bind group layout the generator's dispatches expect.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Bind one buffer set for dispatching.
    ///
    /// The object table and mesh registry buffers need
    /// [`wgpu::BufferUsages::STORAGE`]; the draw-argument buffer needs
    /// `STORAGE` here plus `INDIRECT` for the consuming draw stage.
    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        objects: &wgpu::Buffer,
        draw_args: &wgpu::Buffer,
        meshes: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_args"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: objects.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: draw_args.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: meshes.as_entire_binding(),
                },
            ],
        })
    }

    /// Record one generation dispatch into `encoder`.
    ///
    /// Dispatches enough workgroups of
    /// [`WORKGROUP_SIZE`](crate::generator::WORKGROUP_SIZE) invocations to
    /// cover `object_count` entries; the trailing invocations of the last
    /// workgroup bounds-check out inside the kernel. `object_count` of zero
    /// records an empty pass.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        bind_group: &wgpu::BindGroup,
        object_count: u32,
    ) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("draw_args"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.dispatch_workgroups(workgroup_count(object_count), 1, 1);
    }
}

fn storage_buffer_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

// ============================================================================
// Headless context
// ============================================================================

/// A headless device and queue for running the generator off-screen.
///
/// # Example
///
/// ```ignore
/// let ctx = GpuContext::new_headless()?;
/// let generator = GpuDrawArgGenerator::new(ctx.device());
/// ```
pub struct GpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl GpuContext {
    /// Bring up an adapter without a surface.
    ///
    /// # Errors
    ///
    /// Returns [`DrawGenError::InitializationFailed`] when no compatible
    /// adapter exists or device creation fails.
    pub fn new_headless() -> Result<Self, DrawGenError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: None,
        }))
        .ok_or_else(|| {
            DrawGenError::InitializationFailed("no compatible adapter".to_string())
        })?;

        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("drawgen"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|err| DrawGenError::InitializationFailed(err.to_string()))?;

        Ok(Self { device, queue })
    }

    /// The device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Upload an object table.
    ///
    /// # Errors
    ///
    /// Errors on an empty table: a zero-sized buffer cannot be bound, and
    /// an empty table needs no dispatch in the first place.
    pub fn create_object_buffer(
        &self,
        objects: &[ObjectRecord],
    ) -> Result<wgpu::Buffer, DrawGenError> {
        if objects.is_empty() {
            return Err(DrawGenError::ResourceCreationFailed(
                "object table is empty".to_string(),
            ));
        }
        Ok(self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("drawgen objects"),
                contents: bytemuck::cast_slice(objects),
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            }))
    }

    /// Upload a mesh registry.
    ///
    /// # Errors
    ///
    /// Errors on an empty registry (zero-sized buffers cannot be bound).
    pub fn create_mesh_buffer(
        &self,
        meshes: &[MeshDescriptor],
    ) -> Result<wgpu::Buffer, DrawGenError> {
        if meshes.is_empty() {
            return Err(DrawGenError::ResourceCreationFailed(
                "mesh registry is empty".to_string(),
            ));
        }
        Ok(self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("drawgen meshes"),
                contents: bytemuck::cast_slice(meshes),
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            }))
    }

    /// Create a draw-argument buffer with one slot per entry of `initial`
    /// (a sentinel fill, or zeroes).
    ///
    /// The buffer carries `INDIRECT` usage so the consuming draw stage can
    /// feed it to `multi_draw_indexed_indirect` unchanged, and `COPY_SRC`
    /// for readback.
    ///
    /// # Errors
    ///
    /// Errors when `initial` is empty.
    pub fn create_draw_arg_buffer(
        &self,
        initial: &[DrawIndexedIndirectArgs],
    ) -> Result<wgpu::Buffer, DrawGenError> {
        if initial.is_empty() {
            return Err(DrawGenError::ResourceCreationFailed(
                "draw-argument buffer needs at least one slot".to_string(),
            ));
        }
        Ok(self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("drawgen draw args"),
                contents: bytemuck::cast_slice(initial),
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::INDIRECT
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
            }))
    }
}

static_assertions::assert_impl_all!(GpuDrawArgGenerator: Send, Sync);
static_assertions::assert_impl_all!(GpuContext: Send, Sync);
