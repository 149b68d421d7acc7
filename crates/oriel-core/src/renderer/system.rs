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

//! The stable rendering facade the rest of the engine calls.

use crate::math::{LinearRgba, Vec2};
use crate::renderer::error::RenderError;
use crate::renderer::traits::RenderingApi;

/// Thin dispatcher holding at most one bound rendering backend.
///
/// Binding happens once at startup through [`set_api`](Self::set_api); every
/// operation fails with [`RenderError::NotBound`] until then. The check runs
/// on every call — using the facade unbound is a precondition violation, not
/// a recoverable runtime condition.
#[derive(Debug, Default)]
pub struct RenderingSystem {
    api: Option<Box<dyn RenderingApi>>,
}

impl RenderingSystem {
    /// Creates a facade with no backend bound.
    pub fn new() -> Self {
        Self { api: None }
    }

    /// Binds `api` as the active backend and initializes it.
    ///
    /// Initialization failures propagate to the caller: startup is expected
    /// to be fatal on failure.
    pub fn set_api(&mut self, mut api: Box<dyn RenderingApi>) -> Result<(), RenderError> {
        api.initialize()?;
        log::info!("RenderingSystem: backend bound and initialized.");
        self.api = Some(api);
        Ok(())
    }

    /// Returns `true` once a backend has been bound.
    pub fn is_bound(&self) -> bool {
        self.api.is_some()
    }

    fn api_mut(&mut self) -> Result<&mut dyn RenderingApi, RenderError> {
        match self.api.as_deref_mut() {
            Some(api) => Ok(api),
            None => Err(RenderError::NotBound),
        }
    }

    /// Clears the current back buffer to `color`.
    pub fn clear(&mut self, color: LinearRgba) -> Result<(), RenderError> {
        self.api_mut()?.clear(color)
    }

    /// Draws a filled rectangle given in screen pixels.
    pub fn draw_rectangle(
        &mut self,
        position: Vec2,
        size: Vec2,
        color: LinearRgba,
    ) -> Result<(), RenderError> {
        self.api_mut()?.draw_rectangle(position, size, color)
    }

    /// Submits the frame and presents the swap chain.
    pub fn present(&mut self) -> Result<(), RenderError> {
        self.api_mut()?.present()
    }

    /// Pumps the backend's window; `Ok(false)` means the window closed.
    pub fn process_messages(&mut self) -> Result<bool, RenderError> {
        Ok(self.api_mut()?.process_messages())
    }

    /// Shuts the bound backend down, if any.
    pub fn shutdown(&mut self) {
        if let Some(api) = self.api.as_mut() {
            api.shutdown();
            log::info!("RenderingSystem: backend shut down.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct RecordingApi {
        calls: Arc<Mutex<Vec<&'static str>>>,
        alive: bool,
    }

    impl RecordingApi {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl RenderingApi for RecordingApi {
        fn initialize(&mut self) -> Result<(), RenderError> {
            self.record("initialize");
            self.alive = true;
            Ok(())
        }

        fn clear(&mut self, _color: LinearRgba) -> Result<(), RenderError> {
            self.record("clear");
            Ok(())
        }

        fn draw_rectangle(
            &mut self,
            _position: Vec2,
            _size: Vec2,
            _color: LinearRgba,
        ) -> Result<(), RenderError> {
            self.record("draw_rectangle");
            Ok(())
        }

        fn present(&mut self) -> Result<(), RenderError> {
            self.record("present");
            Ok(())
        }

        fn process_messages(&mut self) -> bool {
            self.alive
        }

        fn shutdown(&mut self) {
            self.record("shutdown");
            self.alive = false;
        }
    }

    #[test]
    fn every_operation_fails_when_unbound() {
        let mut system = RenderingSystem::new();
        assert!(!system.is_bound());
        assert_eq!(
            system.clear(LinearRgba::BLACK),
            Err(RenderError::NotBound)
        );
        assert_eq!(
            system.draw_rectangle(Vec2::ZERO, Vec2::ONE, LinearRgba::RED),
            Err(RenderError::NotBound)
        );
        assert_eq!(system.present(), Err(RenderError::NotBound));
        assert_eq!(system.process_messages(), Err(RenderError::NotBound));
    }

    #[test]
    fn set_api_initializes_and_delegates() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let api = RecordingApi {
            calls: calls.clone(),
            alive: false,
        };

        let mut system = RenderingSystem::new();
        system.set_api(Box::new(api)).unwrap();
        assert!(system.is_bound());

        system.clear(LinearRgba::BLUE).unwrap();
        system
            .draw_rectangle(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), LinearRgba::RED)
            .unwrap();
        system.present().unwrap();
        assert!(system.process_messages().unwrap());
        system.shutdown();
        assert!(!system.process_messages().unwrap());

        assert_eq!(
            calls.lock().unwrap().as_slice(),
            &["initialize", "clear", "draw_rectangle", "present", "shutdown"]
        );
    }

    #[test]
    fn failed_initialization_leaves_facade_unbound() {
        #[derive(Debug)]
        struct FailingApi;

        impl RenderingApi for FailingApi {
            fn initialize(&mut self) -> Result<(), RenderError> {
                Err(RenderError::Internal("boom".to_string()))
            }
            fn clear(&mut self, _color: LinearRgba) -> Result<(), RenderError> {
                Ok(())
            }
            fn draw_rectangle(
                &mut self,
                _position: Vec2,
                _size: Vec2,
                _color: LinearRgba,
            ) -> Result<(), RenderError> {
                Ok(())
            }
            fn present(&mut self) -> Result<(), RenderError> {
                Ok(())
            }
            fn process_messages(&mut self) -> bool {
                true
            }
            fn shutdown(&mut self) {}
        }

        let mut system = RenderingSystem::new();
        assert!(system.set_api(Box::new(FailingApi)).is_err());
        assert!(!system.is_bound());
        assert_eq!(system.present(), Err(RenderError::NotBound));
    }
}
