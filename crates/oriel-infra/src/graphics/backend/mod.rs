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

//! The explicit rendering backend.
//!
//! [`ExplicitBackend`] drives any [`GraphicsDevice`](oriel_core::renderer::GraphicsDevice)
//! through the `initialize → begin-frame → record → submit → present → advance`
//! cycle, with [`FrameSynchronizer`] enforcing the fence protocol that keeps a
//! small ring of in-flight frames safe to recycle while CPU and GPU run
//! concurrently.

pub mod frame;
pub mod system;

pub use frame::{FrameSlot, FrameSynchronizer, SlotState};
pub use system::ExplicitBackend;
