// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The concrete implementation of the [`RenderingApi`] trait.

use super::frame::{FrameSlot, FrameSynchronizer};
use oriel_core::math::{LinearRgba, Vec2};
use oriel_core::platform::EngineWindow;
use oriel_core::renderer::{
    ColorVertex, CommandQueue, GraphicsDevice, PipelineHandle, PresentError, PrimitiveTopology,
    RenderError, RenderTargetId, RenderingApi, ResourceState, ScissorRect, SwapChain,
    SwapChainDescriptor, Viewport,
};
use std::sync::Arc;

/// Everything that must be torn down and recreated together on device loss.
#[derive(Debug)]
struct DeviceObjects {
    queue: Box<dyn CommandQueue>,
    swap_chain: Box<dyn SwapChain>,
    sync: FrameSynchronizer,
}

/// The concrete rendering backend driving an explicit command-list API.
///
/// Composes the swap chain, per-frame resources and the frame synchronizer
/// over a [`GraphicsDevice`], running the
/// `initialize → begin-frame → record → submit → present → advance` cycle
/// once per frame. The pipeline state object is pre-built and opaque,
/// supplied as a handle at construction.
#[derive(Debug)]
pub struct ExplicitBackend {
    device: Arc<dyn GraphicsDevice>,
    window: Box<dyn EngineWindow>,
    pipeline: PipelineHandle,
    frames_in_flight: usize,
    objects: Option<DeviceObjects>,
    viewport: Viewport,
    scissor: ScissorRect,
    back_buffer_index: u32,
    /// Whether the current frame recorded the Present → RenderTarget
    /// transition (and therefore owes the closing transition at present).
    target_open: bool,
    frames_presented: u64,
    rebuilds: u64,
}

impl ExplicitBackend {
    /// Creates an uninitialized backend over `device`, rendering to `window`
    /// with the pre-built `pipeline`.
    ///
    /// The backend is not usable until [`RenderingApi::initialize`] runs.
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        window: Box<dyn EngineWindow>,
        pipeline: PipelineHandle,
        frames_in_flight: usize,
    ) -> Self {
        let size = window.inner_size();
        Self {
            device,
            window,
            pipeline,
            frames_in_flight,
            objects: None,
            viewport: Viewport::from_extent(size),
            scissor: ScissorRect::from_extent(size),
            back_buffer_index: 0,
            target_open: false,
            frames_presented: 0,
            rebuilds: 0,
        }
    }

    /// Number of frames successfully presented since initialization.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Number of device-loss rebuilds performed.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// The frame synchronizer, once initialized. Exposed for inspection.
    pub fn frame_sync(&self) -> Option<&FrameSynchronizer> {
        self.objects.as_ref().map(|objects| &objects.sync)
    }

    /// Builds the device-dependent object bundle in explicit dependency
    /// order: queue and fence first, then the swap chain, then the per-slot
    /// allocator + recorder pairs.
    fn create_device_objects(&self) -> Result<DeviceObjects, RenderError> {
        let queue = self.device.create_queue()?;
        let fence = self.device.create_fence(0)?;
        let swap_chain = self.device.create_swap_chain(&SwapChainDescriptor {
            buffer_count: self.frames_in_flight,
            extent: self.window.inner_size(),
        })?;

        let mut slots = Vec::with_capacity(self.frames_in_flight);
        for _ in 0..self.frames_in_flight {
            let mut allocator = self.device.create_command_allocator()?;
            let recorder = self
                .device
                .create_command_recorder(allocator.as_mut(), self.pipeline)?;
            slots.push(FrameSlot::new(allocator, recorder));
        }

        Ok(DeviceObjects {
            queue,
            swap_chain,
            sync: FrameSynchronizer::new(fence, self.pipeline, slots),
        })
    }

    /// Tears down every device-dependent object and recreates the bundle.
    ///
    /// Called after a lost-device present; the old buffers are never retried.
    fn rebuild_device_objects(&mut self) -> Result<(), RenderError> {
        if let Some(old) = self.objects.take() {
            if let Err(err) = old.sync.wait_idle() {
                log::warn!("waiting for in-flight frames during rebuild failed: {err}");
            }
        }
        self.target_open = false;

        let objects = self.create_device_objects()?;
        self.back_buffer_index = objects.swap_chain.current_back_buffer_index();
        self.objects = Some(objects);
        self.rebuilds += 1;
        log::info!(
            "device-dependent objects rebuilt ({} rebuilds total)",
            self.rebuilds
        );
        Ok(())
    }
}

fn not_initialized() -> RenderError {
    RenderError::Internal("backend is not initialized".to_string())
}

/// Maps a screen-space rectangle (origin top-left, Y down, in pixels) to the
/// four triangle-strip vertices of its clip-space equivalent (origin center,
/// Y up): `ndc_x = 2*px/vw - 1`, `ndc_y = -(2*py/vh - 1)`.
fn rectangle_vertices(
    position: Vec2,
    size: Vec2,
    viewport: &Viewport,
    color: LinearRgba,
) -> [ColorVertex; 4] {
    let left = 2.0 * position.x / viewport.width - 1.0;
    let right = 2.0 * (position.x + size.x) / viewport.width - 1.0;
    let top = -(2.0 * position.y / viewport.height - 1.0);
    let bottom = -(2.0 * (position.y + size.y) / viewport.height - 1.0);
    let color = color.to_array();

    [
        ColorVertex {
            position: [left, top, 0.0],
            color,
        },
        ColorVertex {
            position: [right, top, 0.0],
            color,
        },
        ColorVertex {
            position: [left, bottom, 0.0],
            color,
        },
        ColorVertex {
            position: [right, bottom, 0.0],
            color,
        },
    ]
}

impl RenderingApi for ExplicitBackend {
    fn initialize(&mut self) -> Result<(), RenderError> {
        if self.objects.is_some() {
            return Err(RenderError::Internal(
                "backend is already initialized".to_string(),
            ));
        }

        let size = self.window.inner_size();
        self.viewport = Viewport::from_extent(size);
        self.scissor = ScissorRect::from_extent(size);

        let objects = self.create_device_objects()?;
        self.back_buffer_index = objects.swap_chain.current_back_buffer_index();
        self.objects = Some(objects);

        log::info!(
            "ExplicitBackend initialized: window '{}' ({}x{}), {} frames in flight",
            self.window.title(),
            size.width,
            size.height,
            self.frames_in_flight
        );
        Ok(())
    }

    fn clear(&mut self, color: LinearRgba) -> Result<(), RenderError> {
        let target = RenderTargetId(self.back_buffer_index);
        let viewport = self.viewport;
        let scissor = self.scissor;
        let open_target = !self.target_open;

        let objects = self.objects.as_mut().ok_or_else(not_initialized)?;
        objects.sync.begin_frame()?;
        let recorder = objects.sync.recorder_mut()?;
        if open_target {
            recorder.transition(target, ResourceState::Present, ResourceState::RenderTarget);
        }
        recorder.clear_target(target, color);
        recorder.set_viewport(viewport);
        recorder.set_scissor(scissor);

        self.target_open = true;
        Ok(())
    }

    fn draw_rectangle(
        &mut self,
        position: Vec2,
        size: Vec2,
        color: LinearRgba,
    ) -> Result<(), RenderError> {
        let vertices = rectangle_vertices(position, size, &self.viewport, color);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);

        // Transient upload buffer: the recorder captures its contents when
        // the bind is recorded, so it is not referenced after this call.
        let buffer = self.device.create_upload_buffer(bytes.len() as u64)?;
        self.device.write_buffer(buffer, 0, bytes)?;

        let objects = self.objects.as_mut().ok_or_else(not_initialized)?;
        objects.sync.begin_frame()?;
        let recorder = objects.sync.recorder_mut()?;
        recorder.set_primitive_topology(PrimitiveTopology::TriangleStrip);
        recorder.set_vertex_buffer(buffer, ColorVertex::STRIDE);
        recorder.draw(vertices.len() as u32, 1);

        self.device.destroy_buffer(buffer)?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let target = RenderTargetId(self.back_buffer_index);
        let close_target = self.target_open;

        let objects = self.objects.as_mut().ok_or_else(not_initialized)?;
        // A bare present still submits exactly once; the begin-frame wait
        // runs here if no recording is open yet.
        objects.sync.begin_frame()?;
        if close_target {
            let recorder = objects.sync.recorder_mut()?;
            recorder.transition(target, ResourceState::RenderTarget, ResourceState::Present);
        }
        self.target_open = false;

        let fence_value = objects.sync.submit(objects.queue.as_ref())?;

        match objects.swap_chain.present(1) {
            Ok(()) => {
                self.back_buffer_index = objects.swap_chain.current_back_buffer_index();
                objects.sync.advance();
                self.frames_presented += 1;
                log::trace!(
                    "frame {} presented (fence value {fence_value})",
                    self.frames_presented
                );
                Ok(())
            }
            Err(PresentError::DeviceLost(reason)) => {
                log::error!("present failed, device lost: {reason}");
                self.rebuild_device_objects()?;
                Err(RenderError::Present(PresentError::DeviceLost(reason)))
            }
            Err(err) => {
                log::error!("present failed, frame dropped: {err}");
                objects.sync.advance();
                Err(RenderError::Present(err))
            }
        }
    }

    fn process_messages(&mut self) -> bool {
        self.window.pump_events()
    }

    fn shutdown(&mut self) {
        if let Some(objects) = self.objects.take() {
            if let Err(err) = objects.sync.wait_idle() {
                log::warn!("waiting for in-flight frames during shutdown failed: {err}");
            }
        }
        log::info!(
            "ExplicitBackend shut down after {} presented frames",
            self.frames_presented
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rectangle_maps_to_exact_ndc_vertices() {
        let viewport = Viewport {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        };
        let vertices = rectangle_vertices(
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 100.0),
            &viewport,
            LinearRgba::RED,
        );

        let expected = [(-1.0, 1.0), (-0.75, 1.0), (-1.0, 0.6667), (-0.75, 0.6667)];
        for (vertex, (x, y)) in vertices.iter().zip(expected) {
            assert_relative_eq!(vertex.position[0], x, epsilon = 1e-4);
            assert_relative_eq!(vertex.position[1], y, epsilon = 1e-4);
            assert_relative_eq!(vertex.position[2], 0.0);
        }
    }

    #[test]
    fn centered_rectangle_is_symmetric_in_ndc() {
        let viewport = Viewport {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 400.0,
        };
        let vertices = rectangle_vertices(
            Vec2::new(100.0, 100.0),
            Vec2::new(200.0, 200.0),
            &viewport,
            LinearRgba::WHITE,
        );

        assert_relative_eq!(vertices[0].position[0], -0.5);
        assert_relative_eq!(vertices[0].position[1], 0.5);
        assert_relative_eq!(vertices[3].position[0], 0.5);
        assert_relative_eq!(vertices[3].position[1], -0.5);
    }
}
