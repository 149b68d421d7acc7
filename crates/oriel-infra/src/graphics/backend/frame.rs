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

//! Frame-in-flight resources and the fence-based recycling protocol.
//!
//! The CPU prepares frame N+1 while the GPU still executes frame N. Each
//! frame slot owns one command allocator + recorder pair and the fence
//! watermark of its last submission; the slot may only be reset for a new
//! recording once the GPU has signaled completion of that watermark. The wait
//! in [`FrameSynchronizer::begin_slot`] is the single correctness-critical
//! operation of the whole subsystem: without it, resetting an allocator still
//! referenced by an in-flight command list corrupts it.

use oriel_core::renderer::{
    CommandAllocator, CommandQueue, CommandRecorder, Fence, PipelineHandle, RenderError,
};

/// The lifecycle state of a frame slot.
///
/// A submitted slot retires implicitly: retirement is observed through the
/// fence watermark the next time the slot is begun, not through a separate
/// state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// The slot has never been submitted or its work is known complete.
    Idle,
    /// The slot's recorder is open and accumulating commands.
    Recording,
    /// The slot's command buffer has been submitted and may still be in
    /// flight on the GPU.
    Submitted,
}

/// Per-in-flight-frame state: one allocator + recorder pair and the fence
/// watermark of the slot's last submission (0 = never submitted).
#[derive(Debug)]
pub struct FrameSlot {
    allocator: Box<dyn CommandAllocator>,
    recorder: Box<dyn CommandRecorder>,
    fence_value: u64,
    state: SlotState,
}

impl FrameSlot {
    /// Creates an idle slot from its allocator and (closed) recorder.
    pub fn new(allocator: Box<dyn CommandAllocator>, recorder: Box<dyn CommandRecorder>) -> Self {
        Self {
            allocator,
            recorder,
            fence_value: 0,
            state: SlotState::Idle,
        }
    }
}

/// Enforces the fence protocol across a ring of frame slots.
///
/// Slots are reused round-robin. Fence values are assigned at submission
/// only, starting at 1 and strictly increasing; at most one submitted command
/// buffer is pending per slot at any time.
#[derive(Debug)]
pub struct FrameSynchronizer {
    fence: Box<dyn Fence>,
    pipeline: PipelineHandle,
    slots: Vec<FrameSlot>,
    next_value: u64,
    current: usize,
}

impl FrameSynchronizer {
    /// Creates a synchronizer over `slots` (typically 2) using `fence` to
    /// observe GPU completion.
    pub fn new(fence: Box<dyn Fence>, pipeline: PipelineHandle, slots: Vec<FrameSlot>) -> Self {
        log::info!(
            "FrameSynchronizer created with {} frames in flight",
            slots.len()
        );
        Self {
            fence,
            pipeline,
            slots,
            next_value: 1,
            current: 0,
        }
    }

    /// Index of the slot the next frame records into.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of frame slots in the ring.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The fence value the next submission will be assigned.
    pub fn next_fence_value(&self) -> u64 {
        self.next_value
    }

    /// The watermark of slot `index`'s last submission (0 = never submitted).
    pub fn last_submitted_value(&self, index: usize) -> u64 {
        self.slots[index].fence_value
    }

    /// The lifecycle state of slot `index`.
    pub fn slot_state(&self, index: usize) -> SlotState {
        self.slots[index].state
    }

    /// Whether the current slot has an open recording.
    pub fn is_recording(&self) -> bool {
        self.slots[self.current].state == SlotState::Recording
    }

    /// Begins a frame on the current slot. See [`begin_slot`](Self::begin_slot).
    pub fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.begin_slot(self.current)
    }

    /// Makes slot `index` safe to record into, blocking if necessary.
    ///
    /// If the slot's last submission has not retired — its watermark is
    /// greater than the fence's completed value — the calling thread blocks
    /// on exactly that watermark (never a newer value, to avoid
    /// over-waiting). Only then are the slot's allocator and recorder reset.
    /// A slot already in `Recording` is left untouched.
    pub fn begin_slot(&mut self, index: usize) -> Result<(), RenderError> {
        let (watermark, state) = {
            let slot = self.slot(index)?;
            (slot.fence_value, slot.state)
        };
        if state == SlotState::Recording {
            return Ok(());
        }

        if watermark > self.fence.completed_value() {
            log::trace!("frame slot {index} still in flight; waiting for fence value {watermark}");
            self.fence.wait(watermark)?;
        }

        let pipeline = self.pipeline;
        let slot = self.slot_mut(index)?;
        slot.allocator.reset()?;
        slot.recorder.reset(slot.allocator.as_mut(), pipeline)?;
        slot.state = SlotState::Recording;
        Ok(())
    }

    /// The open recorder of the current slot.
    pub fn recorder_mut(&mut self) -> Result<&mut dyn CommandRecorder, RenderError> {
        let current = self.current;
        let slot = self.slot_mut(current)?;
        if slot.state != SlotState::Recording {
            return Err(RenderError::Internal(
                "no frame is being recorded".to_string(),
            ));
        }
        Ok(slot.recorder.as_mut())
    }

    /// Submits the current slot. See [`submit_slot`](Self::submit_slot).
    pub fn submit(&mut self, queue: &dyn CommandQueue) -> Result<u64, RenderError> {
        self.submit_slot(self.current, queue)
    }

    /// Closes slot `index`'s command buffer, enqueues it, and signals the
    /// fence with the next value.
    ///
    /// This is the only place the fence counter advances. Returns the value
    /// assigned to this submission.
    pub fn submit_slot(
        &mut self,
        index: usize,
        queue: &dyn CommandQueue,
    ) -> Result<u64, RenderError> {
        let command_buffer = {
            let slot = self.slot_mut(index)?;
            if slot.state != SlotState::Recording {
                return Err(RenderError::Internal(
                    "frame slot has no open recording to submit".to_string(),
                ));
            }
            slot.recorder.close()?
        };

        queue.execute(command_buffer)?;
        let value = self.next_value;
        queue.signal(self.fence.as_ref(), value)?;
        self.next_value += 1;

        let slot = self.slot_mut(index)?;
        slot.fence_value = value;
        slot.state = SlotState::Submitted;
        log::trace!("frame slot {index} submitted with fence value {value}");
        Ok(value)
    }

    /// Advances the ring to the next slot.
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.slots.len();
    }

    /// Blocks until every submitted watermark has been observed complete.
    ///
    /// Used before destroying device-dependent objects (shutdown, device-loss
    /// rebuild) so no in-flight command buffer references them.
    pub fn wait_idle(&self) -> Result<(), RenderError> {
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.fence_value > 0 && self.fence.completed_value() < slot.fence_value {
                log::trace!(
                    "waiting for frame slot {index} (fence value {}) to retire",
                    slot.fence_value
                );
                self.fence.wait(slot.fence_value)?;
            }
        }
        Ok(())
    }

    fn slot(&self, index: usize) -> Result<&FrameSlot, RenderError> {
        self.slots
            .get(index)
            .ok_or_else(|| RenderError::Internal(format!("frame slot {index} out of range")))
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut FrameSlot, RenderError> {
        self.slots
            .get_mut(index)
            .ok_or_else(|| RenderError::Internal(format!("frame slot {index} out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oriel_core::math::LinearRgba;
    use oriel_core::renderer::{
        BufferId, CommandBufferId, DeviceError, PrimitiveTopology, RecordError, RenderTargetId,
        ResourceState, ScissorRect, Viewport,
    };
    use std::any::Any;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    /// Fence double whose completion the test controls. When
    /// `complete_on_wait` is set, a wait "retires" the awaited value, standing
    /// in for the GPU finishing during the block.
    #[derive(Debug, Default)]
    struct TestFenceInner {
        completed: AtomicU64,
        waits: Mutex<Vec<u64>>,
        complete_on_wait: bool,
    }

    #[derive(Debug)]
    struct TestFence {
        inner: Arc<TestFenceInner>,
    }

    impl Fence for TestFence {
        fn completed_value(&self) -> u64 {
            self.inner.completed.load(Ordering::SeqCst)
        }

        fn wait(&self, value: u64) -> Result<(), DeviceError> {
            self.inner.waits.lock().unwrap().push(value);
            if self.inner.complete_on_wait {
                self.inner.completed.fetch_max(value, Ordering::SeqCst);
                Ok(())
            } else if self.completed_value() >= value {
                Ok(())
            } else {
                Err(DeviceError::Lost(
                    "wait would block forever in this test".to_string(),
                ))
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug, Default)]
    struct TestQueueInner {
        executed: Mutex<Vec<CommandBufferId>>,
        signals: Mutex<Vec<u64>>,
    }

    #[derive(Debug)]
    struct TestQueue {
        inner: Arc<TestQueueInner>,
    }

    impl CommandQueue for TestQueue {
        fn execute(&self, command_buffer: CommandBufferId) -> Result<(), DeviceError> {
            self.inner.executed.lock().unwrap().push(command_buffer);
            Ok(())
        }

        fn signal(&self, _fence: &dyn Fence, value: u64) -> Result<(), DeviceError> {
            self.inner.signals.lock().unwrap().push(value);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct TestAllocator {
        resets: u64,
    }

    impl CommandAllocator for TestAllocator {
        fn reset(&mut self) -> Result<(), RecordError> {
            self.resets += 1;
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct TestRecorder {
        recording: bool,
        closes: u64,
    }

    impl CommandRecorder for TestRecorder {
        fn reset(
            &mut self,
            _allocator: &mut dyn CommandAllocator,
            _pipeline: PipelineHandle,
        ) -> Result<(), RecordError> {
            self.recording = true;
            Ok(())
        }
        fn transition(&mut self, _: RenderTargetId, _: ResourceState, _: ResourceState) {}
        fn clear_target(&mut self, _: RenderTargetId, _: LinearRgba) {}
        fn set_viewport(&mut self, _: Viewport) {}
        fn set_scissor(&mut self, _: ScissorRect) {}
        fn set_primitive_topology(&mut self, _: PrimitiveTopology) {}
        fn set_vertex_buffer(&mut self, _: BufferId, _: u32) {}
        fn draw(&mut self, _: u32, _: u32) {}

        fn close(&mut self) -> Result<CommandBufferId, RecordError> {
            if !self.recording {
                return Err(RecordError::AlreadyClosed);
            }
            self.recording = false;
            self.closes += 1;
            Ok(CommandBufferId(self.closes))
        }

        fn is_recording(&self) -> bool {
            self.recording
        }
    }

    fn synchronizer(
        slot_count: usize,
        complete_on_wait: bool,
    ) -> (FrameSynchronizer, Arc<TestFenceInner>, Arc<TestQueueInner>, TestQueue) {
        let fence_inner = Arc::new(TestFenceInner {
            complete_on_wait,
            ..Default::default()
        });
        let queue_inner = Arc::new(TestQueueInner::default());
        let slots = (0..slot_count)
            .map(|_| {
                FrameSlot::new(
                    Box::new(TestAllocator::default()),
                    Box::new(TestRecorder::default()),
                )
            })
            .collect();
        let sync = FrameSynchronizer::new(
            Box::new(TestFence {
                inner: fence_inner.clone(),
            }),
            PipelineHandle(7),
            slots,
        );
        let queue = TestQueue {
            inner: queue_inner.clone(),
        };
        (sync, fence_inner, queue_inner, queue)
    }

    #[test]
    fn fence_values_are_monotonic_from_one() {
        let (mut sync, fence, queue_inner, queue) = synchronizer(2, false);

        for expected in 1..=6u64 {
            sync.begin_frame().unwrap();
            let value = sync.submit(&queue).unwrap();
            assert_eq!(value, expected);
            // Retire the submission so the next reuse of this slot can begin.
            fence.completed.store(value, Ordering::SeqCst);
            sync.advance();
        }

        let signals = queue_inner.signals.lock().unwrap().clone();
        assert_eq!(signals, vec![1, 2, 3, 4, 5, 6]);
        assert!(signals.windows(2).all(|pair| pair[1] > pair[0]));
        assert_eq!(sync.next_fence_value(), 7);
    }

    #[test]
    fn begin_waits_on_exactly_the_slot_watermark() {
        let (mut sync, fence, _, queue) = synchronizer(2, true);

        sync.begin_slot(0).unwrap();
        let watermark = sync.submit_slot(0, &queue).unwrap();
        assert_eq!(sync.slot_state(0), SlotState::Submitted);

        // The GPU has not signaled; reusing slot 0 must wait on its watermark.
        sync.begin_slot(0).unwrap();
        assert_eq!(fence.waits.lock().unwrap().as_slice(), &[watermark]);
        assert_eq!(sync.slot_state(0), SlotState::Recording);
    }

    #[test]
    fn begin_does_not_wait_when_the_watermark_already_retired() {
        let (mut sync, fence, _, queue) = synchronizer(2, false);

        sync.begin_slot(0).unwrap();
        let watermark = sync.submit_slot(0, &queue).unwrap();
        fence.completed.store(watermark, Ordering::SeqCst);

        sync.begin_slot(0).unwrap();
        assert!(fence.waits.lock().unwrap().is_empty());
    }

    #[test]
    fn begin_is_a_no_op_while_recording() {
        let (mut sync, _, _, _) = synchronizer(2, false);
        sync.begin_slot(0).unwrap();
        sync.begin_slot(0).unwrap();
        assert_eq!(sync.slot_state(0), SlotState::Recording);
    }

    #[test]
    fn submit_without_an_open_recording_fails() {
        let (mut sync, _, _, queue) = synchronizer(2, false);
        assert!(matches!(
            sync.submit(&queue),
            Err(RenderError::Internal(_))
        ));
    }

    #[test]
    fn wait_idle_waits_on_every_pending_watermark() {
        let (mut sync, fence, _, queue) = synchronizer(2, true);

        sync.begin_slot(0).unwrap();
        sync.submit_slot(0, &queue).unwrap();
        sync.begin_slot(1).unwrap();
        sync.submit_slot(1, &queue).unwrap();

        sync.wait_idle().unwrap();
        // Slot 0's wait retires value 1; value 2 is still pending and waited on.
        assert_eq!(fence.waits.lock().unwrap().as_slice(), &[1, 2]);
    }

    #[test]
    fn advance_cycles_the_ring_round_robin() {
        let (mut sync, _, _, _) = synchronizer(2, false);
        assert_eq!(sync.current_index(), 0);
        sync.advance();
        assert_eq!(sync.current_index(), 1);
        sync.advance();
        assert_eq!(sync.current_index(), 0);
    }
}
