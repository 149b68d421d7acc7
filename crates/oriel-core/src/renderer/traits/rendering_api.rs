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

use crate::math::{LinearRgba, Vec2};
use crate::renderer::error::RenderError;
use std::fmt::Debug;

/// The contract a concrete rendering backend fulfills.
///
/// A backend owns its window, device and frame-synchronization state, and is
/// bound once at startup to the [`RenderingSystem`](crate::renderer::RenderingSystem)
/// facade; there is no runtime backend switching.
pub trait RenderingApi: Send + Debug {
    /// Builds all device-dependent state (queue, fence, swap chain, frame
    /// resources). Failures here are fatal at startup and propagate to the
    /// caller.
    fn initialize(&mut self) -> Result<(), RenderError>;

    /// Begins the frame and records a clear of the current back buffer.
    ///
    /// Records the Present → RenderTarget transition followed by the clear,
    /// viewport, and scissor commands.
    fn clear(&mut self, color: LinearRgba) -> Result<(), RenderError>;

    /// Records a filled rectangle given in screen pixels (origin top-left,
    /// Y down) converted to normalized device coordinates.
    fn draw_rectangle(
        &mut self,
        position: Vec2,
        size: Vec2,
        color: LinearRgba,
    ) -> Result<(), RenderError>;

    /// Records the closing RenderTarget → Present transition, submits the
    /// frame's command buffer, and presents the swap chain.
    ///
    /// On device loss all device-dependent objects are torn down and
    /// recreated; the failure is surfaced as a non-fatal error (the frame is
    /// dropped, the loop continues).
    fn present(&mut self) -> Result<(), RenderError>;

    /// Pumps the platform event queue.
    ///
    /// Returns `false` exactly when the window has been closed, which is the
    /// sole external signal that terminates the engine loop.
    fn process_messages(&mut self) -> bool;

    /// Waits for in-flight GPU work to retire and releases device objects.
    fn shutdown(&mut self);
}
