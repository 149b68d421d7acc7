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

//! # Oriel Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! that define the engine's architecture.
//!
//! The crate defines the "common language" of the engine: math value types,
//! the platform window contract, the backend-agnostic rendering traits and
//! their error hierarchy, and the [`RenderingSystem`] facade the rest of the
//! engine talks to. Concrete implementations live in `oriel-infra`.

#![warn(missing_docs)]

pub mod math;
pub mod platform;
pub mod renderer;
pub mod utils;

pub use renderer::system::RenderingSystem;
pub use utils::timer::Stopwatch;
