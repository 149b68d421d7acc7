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

//! The condvar-backed fence of the virtual device.

use oriel_core::renderer::{DeviceError, Fence};
use std::any::Any;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// Shared fence state: the completed value plus the condvar waiters block on.
#[derive(Debug)]
pub(crate) struct FenceState {
    value: Mutex<u64>,
    signaled: Condvar,
}

impl FenceState {
    pub(crate) fn new(initial_value: u64) -> Self {
        Self {
            value: Mutex::new(initial_value),
            signaled: Condvar::new(),
        }
    }

    pub(crate) fn completed(&self) -> u64 {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raises the completed value to `value`. The value is non-decreasing:
    /// a stale signal never rolls it back.
    pub(crate) fn signal(&self, value: u64) {
        let mut guard = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        if value > *guard {
            *guard = value;
            self.signaled.notify_all();
        }
    }

    pub(crate) fn wait(&self, value: u64) {
        let mut guard = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        while *guard < value {
            guard = self
                .signaled
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// The fence of the [`VirtualGpuDevice`](super::VirtualGpuDevice).
///
/// Completion values are raised by the timeline thread when it services a
/// queue signal; CPU-side waiters block on a condvar, not a spin loop.
#[derive(Debug)]
pub struct VirtualFence {
    state: Arc<FenceState>,
}

impl VirtualFence {
    pub(crate) fn new(initial_value: u64) -> Self {
        Self {
            state: Arc::new(FenceState::new(initial_value)),
        }
    }

    pub(crate) fn state(&self) -> Arc<FenceState> {
        self.state.clone()
    }
}

impl Fence for VirtualFence {
    fn completed_value(&self) -> u64 {
        self.state.completed()
    }

    fn wait(&self, value: u64) -> Result<(), DeviceError> {
        self.state.wait(value);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_value_is_non_decreasing() {
        let fence = VirtualFence::new(0);
        fence.state().signal(3);
        fence.state().signal(1);
        assert_eq!(fence.completed_value(), 3);
    }

    #[test]
    fn wait_returns_once_value_is_reached() {
        let fence = VirtualFence::new(0);
        let state = fence.state();
        let waiter = std::thread::spawn(move || {
            let fence = VirtualFence { state };
            fence.wait(2).unwrap();
            fence.completed_value()
        });
        fence.state().signal(2);
        assert!(waiter.join().unwrap() >= 2);
    }
}
