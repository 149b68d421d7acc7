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

//! The virtual graphics device and its timeline thread.

use super::command::{RenderOp, VirtualCommandAllocator, VirtualCommandRecorder};
use super::queue::VirtualQueue;
use super::swapchain::VirtualSwapChain;
use super::sync::{FenceState, VirtualFence};
use oriel_core::math::LinearRgba;
use oriel_core::renderer::{
    BufferId, CommandAllocator, CommandBufferId, CommandQueue, CommandRecorder, DeviceError, Fence,
    GraphicsDevice, PipelineHandle, ResourceState, SwapChain, SwapChainDescriptor,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;

/// The observable state of one back buffer, maintained by the timeline thread
/// as it plays back executed command buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSnapshot {
    /// The resource state the buffer is currently in.
    pub state: ResourceState,
    /// The color of the last executed clear, if any.
    pub cleared_to: Option<LinearRgba>,
    /// Number of draws executed against this buffer.
    pub draws: u64,
}

impl TargetSnapshot {
    fn new() -> Self {
        Self {
            state: ResourceState::Present,
            cleared_to: None,
            draws: 0,
        }
    }
}

/// A task on the GPU timeline, processed strictly in submission order.
pub(crate) enum TimelineTask {
    Execute(Vec<RenderOp>),
    Signal { fence: Arc<FenceState>, value: u64 },
}

/// Pause gate for the timeline thread, used by tests to hold GPU completion
/// back deterministically.
#[derive(Debug, Default)]
struct TimelineGate {
    paused: Mutex<bool>,
    resumed: Condvar,
}

impl TimelineGate {
    fn set_paused(&self, paused: bool) {
        let mut guard = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = paused;
        if !paused {
            self.resumed.notify_all();
        }
    }

    fn wait_while_paused(&self) {
        let mut guard = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        while *guard {
            guard = self
                .resumed
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// State shared between the device facade, the objects it creates, and the
/// timeline thread.
pub(crate) struct DeviceShared {
    buffers: Mutex<HashMap<u64, Vec<u8>>>,
    command_buffers: Mutex<HashMap<u64, Vec<RenderOp>>>,
    next_buffer_id: AtomicU64,
    next_command_buffer_id: AtomicU64,
    removal_reason: Mutex<Option<String>>,
    targets: Arc<Mutex<Vec<TargetSnapshot>>>,
    sender: flume::Sender<TimelineTask>,
    gate: Arc<TimelineGate>,
}

impl DeviceShared {
    pub(crate) fn submit(&self, task: TimelineTask) -> Result<(), DeviceError> {
        self.sender
            .send(task)
            .map_err(|_| DeviceError::Lost("gpu timeline thread terminated".to_string()))
    }

    pub(crate) fn snapshot_buffer(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&buffer.0)
            .cloned()
    }

    pub(crate) fn register_command_buffer(&self, ops: Vec<RenderOp>) -> CommandBufferId {
        let id = self.next_command_buffer_id.fetch_add(1, Ordering::Relaxed);
        self.command_buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, ops);
        CommandBufferId(id)
    }

    pub(crate) fn take_command_buffer(&self, id: CommandBufferId) -> Option<Vec<RenderOp>> {
        self.command_buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id.0)
    }

    pub(crate) fn removal_reason(&self) -> Option<String> {
        self.removal_reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for DeviceShared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceShared")
            .field("removal_reason", &self.removal_reason())
            .finish_non_exhaustive()
    }
}

impl Drop for DeviceShared {
    fn drop(&mut self) {
        // Unblock a paused timeline so it can drain and exit once the channel
        // disconnects.
        self.gate.set_paused(false);
    }
}

fn timeline_worker(
    receiver: flume::Receiver<TimelineTask>,
    targets: Arc<Mutex<Vec<TargetSnapshot>>>,
    gate: Arc<TimelineGate>,
) {
    log::debug!("gpu timeline thread started");
    while let Ok(task) = receiver.recv() {
        gate.wait_while_paused();
        match task {
            TimelineTask::Execute(ops) => execute_ops(&targets, ops),
            TimelineTask::Signal { fence, value } => fence.signal(value),
        }
    }
    log::debug!("gpu timeline thread exiting");
}

/// Plays one command buffer back against the back-buffer shadow state,
/// validating that every recorded transition matches the resource's actual
/// state.
fn execute_ops(targets: &Mutex<Vec<TargetSnapshot>>, ops: Vec<RenderOp>) {
    let mut targets = targets.lock().unwrap_or_else(PoisonError::into_inner);
    let mut active_target: Option<usize> = None;

    for op in ops {
        match op {
            RenderOp::Transition { target, from, to } => {
                let index = target.0 as usize;
                match targets.get_mut(index) {
                    Some(t) => {
                        if t.state != from {
                            log::warn!(
                                "transition on back buffer {index} recorded from {:?} but its state is {:?}",
                                from,
                                t.state
                            );
                        }
                        t.state = to;
                        if to == ResourceState::RenderTarget {
                            active_target = Some(index);
                        } else if active_target == Some(index) {
                            active_target = None;
                        }
                    }
                    None => log::warn!("transition references unknown back buffer {index}"),
                }
            }
            RenderOp::ClearTarget { target, color } => {
                let index = target.0 as usize;
                match targets.get_mut(index) {
                    Some(t) => {
                        if t.state != ResourceState::RenderTarget {
                            log::warn!(
                                "clear of back buffer {index} while in state {:?}",
                                t.state
                            );
                        }
                        t.cleared_to = Some(color);
                    }
                    None => log::warn!("clear references unknown back buffer {index}"),
                }
            }
            RenderOp::Draw { .. } => match active_target {
                Some(index) => targets[index].draws += 1,
                None => log::warn!("draw executed with no render target bound"),
            },
            // Viewport, scissor, topology and vertex data shape real
            // rasterization only; they have no shadow-state effect.
            RenderOp::SetViewport(_)
            | RenderOp::SetScissor(_)
            | RenderOp::SetPrimitiveTopology(_)
            | RenderOp::SetVertexBuffer { .. } => {}
        }
    }
}

/// A software rendition of an explicit graphics device.
///
/// Command buffers are executed by a dedicated timeline thread in submission
/// order, asynchronously relative to the calling thread, and completion is
/// observed through queue-signaled fences — the same shape a hardware
/// command-list API exposes. Fault injection and timeline pause/resume make
/// the device-loss and frame-synchronization protocols testable.
pub struct VirtualGpuDevice {
    shared: Arc<DeviceShared>,
}

impl VirtualGpuDevice {
    /// Creates the device and starts its timeline thread.
    pub fn new() -> Result<Self, DeviceError> {
        let (sender, receiver) = flume::unbounded();
        let targets = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new(TimelineGate::default());

        thread::Builder::new()
            .name("oriel-gpu-timeline".to_string())
            .spawn({
                let targets = targets.clone();
                let gate = gate.clone();
                move || timeline_worker(receiver, targets, gate)
            })
            .map_err(|err| {
                DeviceError::CreationFailed(format!("failed to spawn gpu timeline thread: {err}"))
            })?;

        log::info!("VirtualGpuDevice created");

        Ok(Self {
            shared: Arc::new(DeviceShared {
                buffers: Mutex::new(HashMap::new()),
                command_buffers: Mutex::new(HashMap::new()),
                next_buffer_id: AtomicU64::new(1),
                next_command_buffer_id: AtomicU64::new(1),
                removal_reason: Mutex::new(None),
                targets,
                sender,
                gate,
            }),
        })
    }

    /// Marks the device as removed; subsequent presents fail with
    /// [`PresentError::DeviceLost`](oriel_core::renderer::PresentError::DeviceLost).
    ///
    /// The fault clears when a new swap chain is created, modeling the fresh
    /// device a hardware backend obtains while rebuilding after loss.
    pub fn inject_device_loss(&self, reason: &str) {
        log::warn!("VirtualGpuDevice: injecting device loss: {reason}");
        *self
            .shared
            .removal_reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(reason.to_string());
    }

    /// Holds the timeline thread before its next task, freezing fence
    /// completion.
    pub fn pause_timeline(&self) {
        self.shared.gate.set_paused(true);
    }

    /// Releases a paused timeline thread.
    pub fn resume_timeline(&self) {
        self.shared.gate.set_paused(false);
    }

    /// Blocks until every task submitted so far has been executed.
    ///
    /// Blocks indefinitely while the timeline is paused.
    pub fn wait_timeline_idle(&self) {
        let fence = Arc::new(FenceState::new(0));
        if self
            .shared
            .submit(TimelineTask::Signal {
                fence: fence.clone(),
                value: 1,
            })
            .is_ok()
        {
            fence.wait(1);
        }
    }

    /// Returns a copy of the per-back-buffer shadow state.
    pub fn target_snapshots(&self) -> Vec<TargetSnapshot> {
        self.shared
            .targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for VirtualGpuDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualGpuDevice")
            .field("shared", &self.shared)
            .finish()
    }
}

impl GraphicsDevice for VirtualGpuDevice {
    fn create_queue(&self) -> Result<Box<dyn CommandQueue>, DeviceError> {
        Ok(Box::new(VirtualQueue::new(self.shared.clone())))
    }

    fn create_fence(&self, initial_value: u64) -> Result<Box<dyn Fence>, DeviceError> {
        Ok(Box::new(VirtualFence::new(initial_value)))
    }

    fn create_command_allocator(&self) -> Result<Box<dyn CommandAllocator>, DeviceError> {
        Ok(Box::new(VirtualCommandAllocator::new()))
    }

    fn create_command_recorder(
        &self,
        _allocator: &mut dyn CommandAllocator,
        initial_state: PipelineHandle,
    ) -> Result<Box<dyn CommandRecorder>, DeviceError> {
        Ok(Box::new(VirtualCommandRecorder::new(
            self.shared.clone(),
            initial_state,
        )))
    }

    fn create_swap_chain(
        &self,
        descriptor: &SwapChainDescriptor,
    ) -> Result<Box<dyn SwapChain>, DeviceError> {
        {
            let mut targets = self
                .shared
                .targets
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            targets.clear();
            targets.resize_with(descriptor.buffer_count, TargetSnapshot::new);
        }
        *self
            .shared
            .removal_reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;

        log::info!(
            "VirtualGpuDevice: swap chain created ({} buffers, {}x{})",
            descriptor.buffer_count,
            descriptor.extent.width,
            descriptor.extent.height
        );

        Ok(Box::new(VirtualSwapChain::new(
            self.shared.clone(),
            descriptor.buffer_count,
        )))
    }

    fn create_upload_buffer(&self, size: u64) -> Result<BufferId, DeviceError> {
        let id = self.shared.next_buffer_id.fetch_add(1, Ordering::Relaxed);
        self.shared
            .buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, vec![0; size as usize]);
        Ok(BufferId(id))
    }

    fn write_buffer(&self, buffer: BufferId, offset: u64, data: &[u8]) -> Result<(), DeviceError> {
        let mut buffers = self
            .shared
            .buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let contents = buffers.get_mut(&buffer.0).ok_or_else(|| {
            DeviceError::InvalidHandle(format!("unknown buffer {buffer:?}"))
        })?;
        let offset = offset as usize;
        let end = offset
            .checked_add(data.len())
            .filter(|end| *end <= contents.len())
            .ok_or_else(|| {
                DeviceError::InvalidHandle(format!(
                    "write of {} bytes at offset {offset} exceeds buffer of {} bytes",
                    data.len(),
                    contents.len()
                ))
            })?;
        contents[offset..end].copy_from_slice(data);
        Ok(())
    }

    fn destroy_buffer(&self, buffer: BufferId) -> Result<(), DeviceError> {
        self.shared
            .buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&buffer.0)
            .map(|_| ())
            .ok_or_else(|| DeviceError::InvalidHandle(format!("unknown buffer {buffer:?}")))
    }

    fn removal_reason(&self) -> Option<String> {
        self.shared.removal_reason()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_buffers_are_created_written_and_destroyed() {
        let device = VirtualGpuDevice::new().unwrap();
        let buffer = device.create_upload_buffer(8).unwrap();
        device.write_buffer(buffer, 2, &[1, 2, 3]).unwrap();
        assert_eq!(
            device.shared.snapshot_buffer(buffer).unwrap(),
            vec![0, 0, 1, 2, 3, 0, 0, 0]
        );
        device.destroy_buffer(buffer).unwrap();
        assert!(device.destroy_buffer(buffer).is_err());
    }

    #[test]
    fn out_of_bounds_write_is_rejected() {
        let device = VirtualGpuDevice::new().unwrap();
        let buffer = device.create_upload_buffer(4).unwrap();
        assert!(device.write_buffer(buffer, 2, &[0; 4]).is_err());
    }

    #[test]
    fn swap_chain_creation_clears_an_injected_loss() {
        let device = VirtualGpuDevice::new().unwrap();
        device.inject_device_loss("driver hang");
        assert!(device.removal_reason().is_some());
        let descriptor = SwapChainDescriptor {
            buffer_count: 2,
            extent: oriel_core::math::Extent2D::new(640, 480),
        };
        let _swap_chain = device.create_swap_chain(&descriptor).unwrap();
        assert!(device.removal_reason().is_none());
        assert_eq!(device.target_snapshots().len(), 2);
    }
}
