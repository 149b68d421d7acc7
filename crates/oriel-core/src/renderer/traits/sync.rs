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

use crate::renderer::error::DeviceError;
use std::any::Any;
use std::fmt::Debug;

/// A monotonic counter used to detect completion of GPU work relative to
/// CPU-issued submissions.
///
/// The CPU assigns the next value before submission (through
/// [`CommandQueue::signal`](crate::renderer::CommandQueue::signal)) and later
/// polls or waits until the GPU-reported completed value reaches it. The
/// completed value is non-decreasing.
pub trait Fence: Send + Sync + Debug {
    /// Returns the last value the GPU has signaled as complete.
    fn completed_value(&self) -> u64;

    /// Blocks the calling thread until the completed value reaches `value`.
    ///
    /// The wait is registered on exactly `value`, not a newer one, so a
    /// caller never over-waits past the submission it cares about.
    /// Implementations use an OS wait primitive, not a spin loop.
    fn wait(&self, value: u64) -> Result<(), DeviceError>;

    /// Returns the underlying trait object as `Any`, so a concrete queue can
    /// downcast a fence it is asked to signal.
    fn as_any(&self) -> &dyn Any;
}
