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

//! A window stand-in with no OS surface.

use oriel_core::math::Extent2D;
use oriel_core::platform::EngineWindow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A fixed-size window without an OS message pump.
///
/// `pump_events` reports the close flag, which can be raised from the window
/// itself or from a [`WindowCloseHandle`] held elsewhere (a test, a demo's
/// frame counter).
#[derive(Debug)]
pub struct HeadlessWindow {
    title: String,
    size: Extent2D,
    close_requested: Arc<AtomicBool>,
}

/// Raises a [`HeadlessWindow`]'s close flag from outside the engine loop.
#[derive(Debug, Clone)]
pub struct WindowCloseHandle {
    close_requested: Arc<AtomicBool>,
}

impl WindowCloseHandle {
    /// Closes the window; the next event pump reports it closed.
    pub fn close(&self) {
        self.close_requested.store(true, Ordering::SeqCst);
    }
}

impl HeadlessWindow {
    /// Creates an open window of the given size.
    pub fn new(title: &str, size: Extent2D) -> Self {
        Self {
            title: title.to_string(),
            size,
            close_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a handle that can close this window from another owner.
    pub fn close_handle(&self) -> WindowCloseHandle {
        WindowCloseHandle {
            close_requested: self.close_requested.clone(),
        }
    }
}

impl EngineWindow for HeadlessWindow {
    fn title(&self) -> &str {
        &self.title
    }

    fn inner_size(&self) -> Extent2D {
        self.size
    }

    fn pump_events(&mut self) -> bool {
        !self.close_requested.load(Ordering::SeqCst)
    }

    fn request_close(&mut self) {
        self.close_requested.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pump_reports_closed_after_close_handle_fires() {
        let mut window = HeadlessWindow::new("test", Extent2D::new(640, 480));
        let handle = window.close_handle();
        assert!(window.pump_events());
        handle.close();
        assert!(!window.pump_events());
    }
}
