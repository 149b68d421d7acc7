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

use crate::math::Extent2D;

/// A trait that abstracts the behavior of a window.
///
/// Any windowing backend can implement this trait to be compatible with the
/// engine; the rendering backend owns its window and pumps it once per tick.
pub trait EngineWindow: Send + std::fmt::Debug {
    /// Returns the window title.
    fn title(&self) -> &str;

    /// Returns the physical dimensions (width, height) of the window's inner area.
    fn inner_size(&self) -> Extent2D;

    /// Drains the platform event queue for this window.
    ///
    /// Returns `false` exactly when the window has been closed; this is the
    /// sole external signal that terminates the engine loop.
    fn pump_events(&mut self) -> bool;

    /// Asks the window to close. The next call to [`pump_events`](Self::pump_events)
    /// returns `false`.
    fn request_close(&mut self);
}
