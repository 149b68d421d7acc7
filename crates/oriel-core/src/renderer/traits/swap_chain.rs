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

use crate::renderer::error::PresentError;
use std::fmt::Debug;

/// The rotating set of presentable back buffers managed jointly by the
/// application and the display subsystem.
pub trait SwapChain: Send + Debug {
    /// Returns the number of back buffers in the chain.
    fn back_buffer_count(&self) -> usize;

    /// Returns the index of the back buffer the backend must render into next.
    ///
    /// The index cycles among the buffers under GPU/OS control; callers must
    /// re-read it after each present rather than assume round-robin order.
    fn current_back_buffer_index(&self) -> u32;

    /// Submits the current back buffer to the display.
    ///
    /// `sync_interval` of 1 synchronizes the present with vertical blank.
    /// Fails with [`PresentError::DeviceLost`] when the underlying device was
    /// removed, in which case the caller must rebuild all device-dependent
    /// state before retrying — never retry the same buffers.
    fn present(&mut self, sync_interval: u32) -> Result<(), PresentError>;
}
