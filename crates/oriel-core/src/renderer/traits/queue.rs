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

use crate::renderer::api::CommandBufferId;
use crate::renderer::error::DeviceError;
use crate::renderer::traits::Fence;
use std::fmt::Debug;

/// The device's command-submission queue.
///
/// Work enqueued here is executed by the GPU asynchronously relative to the
/// CPU, in the order it was queued. Only the engine thread submits in this
/// design, so no locking is required beyond the fence protocol itself.
pub trait CommandQueue: Send + Debug {
    /// Enqueues a closed command buffer for execution.
    fn execute(&self, command_buffer: CommandBufferId) -> Result<(), DeviceError>;

    /// Enqueues a fence signal that fires once all previously queued work has
    /// completed on the GPU timeline.
    fn signal(&self, fence: &dyn Fence, value: u64) -> Result<(), DeviceError>;
}
