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

//! The abstract contracts implemented by a concrete graphics backend.

pub mod command_recorder;
pub mod graphics_device;
pub mod queue;
pub mod rendering_api;
pub mod swap_chain;
pub mod sync;

pub use command_recorder::{CommandAllocator, CommandRecorder};
pub use graphics_device::GraphicsDevice;
pub use queue::CommandQueue;
pub use rendering_api::RenderingApi;
pub use swap_chain::SwapChain;
pub use sync::Fence;
