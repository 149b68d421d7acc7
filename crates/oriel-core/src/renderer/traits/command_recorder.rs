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

use crate::math::LinearRgba;
use crate::renderer::api::{
    BufferId, CommandBufferId, PipelineHandle, PrimitiveTopology, RenderTargetId, ResourceState,
    ScissorRect, Viewport,
};
use crate::renderer::error::RecordError;
use std::fmt::Debug;

/// The backing store a command recorder records into.
///
/// An allocator may only be reset once the GPU has finished executing every
/// command buffer recorded against it; the frame synchronizer is responsible
/// for enforcing that through the fence protocol.
pub trait CommandAllocator: Send + Debug {
    /// Reclaims the memory of previously recorded commands.
    fn reset(&mut self) -> Result<(), RecordError>;
}

/// Records clear/draw/barrier commands into a replayable command buffer.
///
/// A recorder is bounded to one frame slot and alternates between a recording
/// and a closed state. Recording operations are purely CPU-side and never
/// block. [`close`](Self::close) seals the recorded sequence into a
/// [`CommandBufferId`] that can be submitted to the queue as a unit; the
/// recorder is then reopened for the next frame with [`reset`](Self::reset).
pub trait CommandRecorder: Send + Debug {
    /// Reopens the recorder for a new frame, recording against `allocator`
    /// with `pipeline` as the initial pipeline state.
    fn reset(
        &mut self,
        allocator: &mut dyn CommandAllocator,
        pipeline: PipelineHandle,
    ) -> Result<(), RecordError>;

    /// Records an explicit resource-state transition for `target`.
    ///
    /// Must precede any operation that assumes the `to` state.
    fn transition(&mut self, target: RenderTargetId, from: ResourceState, to: ResourceState);

    /// Records a clear of `target` to `color`.
    fn clear_target(&mut self, target: RenderTargetId, color: LinearRgba);

    /// Records the viewport for subsequent draws.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Records the scissor rectangle for subsequent draws.
    fn set_scissor(&mut self, rect: ScissorRect);

    /// Records the primitive topology for subsequent draws.
    fn set_primitive_topology(&mut self, topology: PrimitiveTopology);

    /// Binds `buffer` as the vertex source for subsequent draws.
    ///
    /// The buffer contents are captured when the bind is recorded; the caller
    /// may destroy the buffer as soon as this returns.
    fn set_vertex_buffer(&mut self, buffer: BufferId, stride: u32);

    /// Records a non-indexed, instanced draw.
    fn draw(&mut self, vertex_count: u32, instance_count: u32);

    /// Seals the recording and returns the submittable command buffer.
    ///
    /// Fails with [`RecordError::AlreadyClosed`] if the recorder is closed.
    fn close(&mut self) -> Result<CommandBufferId, RecordError>;

    /// Returns `true` while the recorder is open for recording.
    fn is_recording(&self) -> bool;
}
