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

use crate::renderer::api::{BufferId, PipelineHandle, SwapChainDescriptor};
use crate::renderer::error::DeviceError;
use crate::renderer::traits::{CommandAllocator, CommandQueue, CommandRecorder, Fence, SwapChain};
use std::fmt::Debug;

/// The connection to a graphics adapter.
///
/// One device exists per process lifetime; it creates every other
/// device-owned object (queue, fence, allocators, recorders, swap chain,
/// upload buffers), and the caller owns their disposal. Creation fails with
/// [`DeviceError::CreationFailed`] when no adapter is available.
pub trait GraphicsDevice: Send + Sync + Debug {
    /// Creates the command-submission queue.
    fn create_queue(&self) -> Result<Box<dyn CommandQueue>, DeviceError>;

    /// Creates a fence whose completed value starts at `initial_value`.
    fn create_fence(&self, initial_value: u64) -> Result<Box<dyn Fence>, DeviceError>;

    /// Creates a command allocator.
    fn create_command_allocator(&self) -> Result<Box<dyn CommandAllocator>, DeviceError>;

    /// Creates a command recorder bound to `allocator` with `initial_state`
    /// as its initial pipeline state.
    ///
    /// The recorder is returned closed; call
    /// [`CommandRecorder::reset`] to begin recording.
    fn create_command_recorder(
        &self,
        allocator: &mut dyn CommandAllocator,
        initial_state: PipelineHandle,
    ) -> Result<Box<dyn CommandRecorder>, DeviceError>;

    /// Creates a swap chain of presentable back buffers.
    fn create_swap_chain(
        &self,
        descriptor: &SwapChainDescriptor,
    ) -> Result<Box<dyn SwapChain>, DeviceError>;

    /// Creates an upload-visible buffer of `size` bytes.
    fn create_upload_buffer(&self, size: u64) -> Result<BufferId, DeviceError>;

    /// Writes `data` into `buffer` starting at `offset`.
    fn write_buffer(&self, buffer: BufferId, offset: u64, data: &[u8]) -> Result<(), DeviceError>;

    /// Destroys a buffer previously created with
    /// [`create_upload_buffer`](Self::create_upload_buffer).
    fn destroy_buffer(&self, buffer: BufferId) -> Result<(), DeviceError>;

    /// Returns the removal reason if the device has been lost, `None` while
    /// it is healthy.
    fn removal_reason(&self) -> Option<String>;
}
