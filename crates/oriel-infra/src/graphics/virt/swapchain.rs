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

//! The swap chain of the virtual device.

use super::device::DeviceShared;
use oriel_core::renderer::{PresentError, SwapChain};
use std::fmt;
use std::sync::Arc;

/// Rotates the presentable back-buffer index and surfaces device loss.
///
/// Present checks the device's removal reason the way a hardware swap chain
/// surfaces the removed-device result code, so the backend can distinguish
/// loss from other failures and rebuild instead of retrying the same buffers.
pub struct VirtualSwapChain {
    shared: Arc<DeviceShared>,
    buffer_count: usize,
    current: u32,
    presented: u64,
}

impl VirtualSwapChain {
    pub(crate) fn new(shared: Arc<DeviceShared>, buffer_count: usize) -> Self {
        Self {
            shared,
            buffer_count,
            current: 0,
            presented: 0,
        }
    }

    /// Number of successful presents since creation.
    pub fn presented_count(&self) -> u64 {
        self.presented
    }
}

impl fmt::Debug for VirtualSwapChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualSwapChain")
            .field("buffer_count", &self.buffer_count)
            .field("current", &self.current)
            .field("presented", &self.presented)
            .finish()
    }
}

impl SwapChain for VirtualSwapChain {
    fn back_buffer_count(&self) -> usize {
        self.buffer_count
    }

    fn current_back_buffer_index(&self) -> u32 {
        self.current
    }

    fn present(&mut self, _sync_interval: u32) -> Result<(), PresentError> {
        if let Some(reason) = self.shared.removal_reason() {
            return Err(PresentError::DeviceLost(reason));
        }
        self.current = (self.current + 1) % self.buffer_count as u32;
        self.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::virt::VirtualGpuDevice;
    use oriel_core::math::Extent2D;
    use oriel_core::renderer::{GraphicsDevice, SwapChainDescriptor};

    #[test]
    fn present_rotates_the_back_buffer_index() {
        let device = VirtualGpuDevice::new().unwrap();
        let mut swap_chain = device
            .create_swap_chain(&SwapChainDescriptor {
                buffer_count: 2,
                extent: Extent2D::new(640, 480),
            })
            .unwrap();

        assert_eq!(swap_chain.current_back_buffer_index(), 0);
        swap_chain.present(1).unwrap();
        assert_eq!(swap_chain.current_back_buffer_index(), 1);
        swap_chain.present(1).unwrap();
        assert_eq!(swap_chain.current_back_buffer_index(), 0);
    }

    #[test]
    fn present_surfaces_device_loss() {
        let device = VirtualGpuDevice::new().unwrap();
        let mut swap_chain = device
            .create_swap_chain(&SwapChainDescriptor {
                buffer_count: 2,
                extent: Extent2D::new(640, 480),
            })
            .unwrap();

        device.inject_device_loss("test-induced removal");
        match swap_chain.present(1) {
            Err(PresentError::DeviceLost(reason)) => {
                assert_eq!(reason, "test-induced removal");
            }
            other => panic!("expected device loss, got {other:?}"),
        }
    }
}
