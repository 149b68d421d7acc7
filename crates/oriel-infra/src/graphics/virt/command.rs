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

//! Command recording for the virtual device.

use super::device::DeviceShared;
use oriel_core::math::LinearRgba;
use oriel_core::renderer::{
    BufferId, CommandAllocator, CommandBufferId, CommandRecorder, PipelineHandle,
    PrimitiveTopology, RecordError, RenderTargetId, ResourceState, ScissorRect, Viewport,
};
use std::fmt;
use std::sync::Arc;

/// One recorded operation of a virtual command buffer.
///
/// The timeline thread plays these back in order against the device's
/// per-back-buffer shadow state.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// An explicit resource-state transition.
    Transition {
        /// The back buffer whose role changes.
        target: RenderTargetId,
        /// The state the resource is expected to be in.
        from: ResourceState,
        /// The state the resource moves to.
        to: ResourceState,
    },
    /// A clear of a back buffer to a solid color.
    ClearTarget {
        /// The back buffer to clear.
        target: RenderTargetId,
        /// The clear color.
        color: LinearRgba,
    },
    /// The viewport for subsequent draws.
    SetViewport(Viewport),
    /// The scissor rectangle for subsequent draws.
    SetScissor(ScissorRect),
    /// The primitive topology for subsequent draws.
    SetPrimitiveTopology(PrimitiveTopology),
    /// A vertex-buffer bind. The contents are captured at record time, which
    /// is what allows the transient upload buffer to be destroyed within the
    /// same recording call.
    SetVertexBuffer {
        /// The captured buffer contents.
        data: Vec<u8>,
        /// The vertex stride in bytes.
        stride: u32,
    },
    /// A non-indexed, instanced draw.
    Draw {
        /// Number of vertices per instance.
        vertex_count: u32,
        /// Number of instances.
        instance_count: u32,
    },
}

/// The allocator backing a [`VirtualCommandRecorder`].
///
/// The virtual device has no native backing store to reclaim; the allocator
/// tracks its reset count so tests can observe the recycling protocol.
#[derive(Debug, Default)]
pub struct VirtualCommandAllocator {
    resets: u64,
}

impl VirtualCommandAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of times this allocator has been reset.
    pub fn reset_count(&self) -> u64 {
        self.resets
    }
}

impl CommandAllocator for VirtualCommandAllocator {
    fn reset(&mut self) -> Result<(), RecordError> {
        self.resets += 1;
        Ok(())
    }
}

/// Records [`RenderOp`]s into a command buffer registered with the device.
pub struct VirtualCommandRecorder {
    shared: Arc<DeviceShared>,
    ops: Vec<RenderOp>,
    recording: bool,
    pipeline: PipelineHandle,
}

impl VirtualCommandRecorder {
    /// The recorder starts closed; `reset` opens it for recording.
    pub(crate) fn new(shared: Arc<DeviceShared>, pipeline: PipelineHandle) -> Self {
        Self {
            shared,
            ops: Vec::new(),
            recording: false,
            pipeline,
        }
    }

    fn record(&mut self, op: RenderOp) {
        if !self.recording {
            log::warn!("VirtualCommandRecorder: operation ignored, recorder is closed: {op:?}");
            return;
        }
        self.ops.push(op);
    }
}

impl fmt::Debug for VirtualCommandRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualCommandRecorder")
            .field("ops", &self.ops.len())
            .field("recording", &self.recording)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

impl CommandRecorder for VirtualCommandRecorder {
    fn reset(
        &mut self,
        allocator: &mut dyn CommandAllocator,
        pipeline: PipelineHandle,
    ) -> Result<(), RecordError> {
        if self.recording {
            return Err(RecordError::Backend(
                "recorder reset while still recording".to_string(),
            ));
        }
        // The allocator association is creation-scoped in the virtual device;
        // nothing to rebind here.
        let _ = allocator;
        self.ops.clear();
        self.recording = true;
        self.pipeline = pipeline;
        Ok(())
    }

    fn transition(&mut self, target: RenderTargetId, from: ResourceState, to: ResourceState) {
        self.record(RenderOp::Transition { target, from, to });
    }

    fn clear_target(&mut self, target: RenderTargetId, color: LinearRgba) {
        self.record(RenderOp::ClearTarget { target, color });
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.record(RenderOp::SetViewport(viewport));
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        self.record(RenderOp::SetScissor(rect));
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.record(RenderOp::SetPrimitiveTopology(topology));
    }

    fn set_vertex_buffer(&mut self, buffer: BufferId, stride: u32) {
        match self.shared.snapshot_buffer(buffer) {
            Some(data) => self.record(RenderOp::SetVertexBuffer { data, stride }),
            None => log::warn!("VirtualCommandRecorder: Vertex BufferId {buffer:?} not found."),
        }
    }

    fn draw(&mut self, vertex_count: u32, instance_count: u32) {
        self.record(RenderOp::Draw {
            vertex_count,
            instance_count,
        });
    }

    fn close(&mut self) -> Result<CommandBufferId, RecordError> {
        if !self.recording {
            return Err(RecordError::AlreadyClosed);
        }
        self.recording = false;
        Ok(self
            .shared
            .register_command_buffer(std::mem::take(&mut self.ops)))
    }

    fn is_recording(&self) -> bool {
        self.recording
    }
}
