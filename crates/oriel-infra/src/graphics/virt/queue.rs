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

//! The command-submission queue of the virtual device.

use super::device::{DeviceShared, TimelineTask};
use super::sync::VirtualFence;
use oriel_core::renderer::{CommandBufferId, CommandQueue, DeviceError, Fence};
use std::fmt;
use std::sync::Arc;

/// Feeds closed command buffers and fence signals to the timeline thread.
///
/// Tasks are processed strictly in submission order, so a signal enqueued
/// after a command buffer fires only once that buffer has executed.
pub struct VirtualQueue {
    shared: Arc<DeviceShared>,
}

impl VirtualQueue {
    pub(crate) fn new(shared: Arc<DeviceShared>) -> Self {
        Self { shared }
    }
}

impl fmt::Debug for VirtualQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualQueue")
            .field("shared", &self.shared)
            .finish()
    }
}

impl CommandQueue for VirtualQueue {
    fn execute(&self, command_buffer: CommandBufferId) -> Result<(), DeviceError> {
        let ops = self.shared.take_command_buffer(command_buffer).ok_or_else(|| {
            DeviceError::InvalidHandle(format!("unknown command buffer {command_buffer:?}"))
        })?;
        log::trace!(
            "VirtualQueue: executing command buffer {command_buffer:?} ({} ops)",
            ops.len()
        );
        self.shared.submit(TimelineTask::Execute(ops))
    }

    fn signal(&self, fence: &dyn Fence, value: u64) -> Result<(), DeviceError> {
        let fence = fence
            .as_any()
            .downcast_ref::<VirtualFence>()
            .ok_or_else(|| {
                DeviceError::InvalidHandle("fence was not created by this device".to_string())
            })?;
        self.shared.submit(TimelineTask::Signal {
            fence: fence.state(),
            value,
        })
    }
}
