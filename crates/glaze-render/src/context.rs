use std::sync::Arc;

use crate::geom::Mat4;

/// Counters for the current recording window, used by the host for damage
/// heuristics and by tests to observe resource traffic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub buffers_created: u32,
    pub buffer_writes: u32,
    pub pipelines_created: u32,
}

/// Long-lived GPU handles shared by every node the host renders.
///
/// Absence of a `GpuContext` is the "no device available" state: the host
/// simply opens no recording window that frame and nodes stay untouched.
pub struct GpuContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    target_format: wgpu::TextureFormat,
    sample_count: u32,
}

impl GpuContext {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, target_format: wgpu::TextureFormat) -> Self {
        Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            target_format,
            sample_count: 1,
        }
    }

    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn device(&self) -> Arc<wgpu::Device> {
        self.device.clone()
    }

    pub fn queue(&self) -> Arc<wgpu::Queue> {
        self.queue.clone()
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Open the command-recording window for one frame. The returned context
    /// is the only token that permits GPU resource creation, and it expires
    /// with the borrow at the end of the frame.
    pub fn begin_frame(&self, projection: Mat4) -> RecordingContext<'_> {
        RecordingContext {
            gpu: self,
            projection,
            transform: Mat4::identity(),
            stats: FrameStats::default(),
        }
    }

    /// Acquire an adapter and device with no surface attached. Returns `None`
    /// when the host has no usable GPU.
    pub fn headless() -> Option<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: false,
            compatible_surface: None,
        }))?;
        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None))
                .ok()?;
        Some(Self::new(device, queue, wgpu::TextureFormat::Rgba8Unorm))
    }
}

/// Per-frame recording window handed to render nodes by the host.
///
/// Carries the projection matrix, the accumulated transform of the node
/// being rendered, and the resource-update batch (queue writes) that flushes
/// with this frame's command submission.
pub struct RecordingContext<'a> {
    gpu: &'a GpuContext,
    pub projection: Mat4,
    pub transform: Mat4,
    pub stats: FrameStats,
}

impl RecordingContext<'_> {
    pub fn device(&self) -> &wgpu::Device {
        &self.gpu.device
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.gpu.target_format
    }

    pub fn sample_count(&self) -> u32 {
        self.gpu.sample_count
    }

    pub fn create_buffer(
        &mut self,
        label: &str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        self.stats.buffers_created += 1;
        self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        })
    }

    /// Queue a buffer upload into this frame's resource-update batch.
    pub fn update_buffer(&mut self, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) {
        self.stats.buffer_writes += 1;
        self.gpu.queue.write_buffer(buffer, offset, data);
    }

    pub(crate) fn note_pipeline_created(&mut self) {
        self.stats.pipelines_created += 1;
    }
}
