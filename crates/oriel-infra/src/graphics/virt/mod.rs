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

//! The virtual graphics device.
//!
//! This is a software rendition of an explicit command-list API: command
//! buffers are recorded as operation sequences, submitted to a dedicated
//! timeline thread that plays them back against per-back-buffer shadow state
//! in submission order, and completion is reported through queue-signaled
//! fences. Fault injection and timeline pause/resume make the device loss and
//! frame-synchronization paths fully testable without GPU hardware.

pub mod command;
pub mod device;
pub mod queue;
pub mod swapchain;
pub mod sync;

pub use command::{RenderOp, VirtualCommandAllocator, VirtualCommandRecorder};
pub use device::{TargetSnapshot, VirtualGpuDevice};
pub use queue::VirtualQueue;
pub use swapchain::VirtualSwapChain;
pub use sync::VirtualFence;
