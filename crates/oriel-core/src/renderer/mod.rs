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

//! Provides the public, backend-agnostic rendering contracts for the engine.
//!
//! This module defines the "common language" for all rendering operations:
//! the abstract `traits` (like [`GraphicsDevice`]), the data types they speak
//! (like [`ResourceState`]), and the error hierarchy. The 'how' is handled by
//! a concrete backend implementation in the `oriel-infra` crate which
//! implements these traits; the rest of the engine goes through the
//! [`RenderingSystem`](system::RenderingSystem) facade without needing to
//! know the specifics of the underlying graphics API.

pub mod api;
pub mod error;
pub mod system;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::{
    BufferId, ColorVertex, CommandBufferId, PipelineHandle, PrimitiveTopology, RenderTargetId,
    ResourceState, ScissorRect, SwapChainDescriptor, Viewport,
};
pub use self::error::{DeviceError, PresentError, RecordError, RenderError};
pub use self::system::RenderingSystem;
pub use self::traits::{
    CommandAllocator, CommandQueue, CommandRecorder, Fence, GraphicsDevice, RenderingApi, SwapChain,
};
