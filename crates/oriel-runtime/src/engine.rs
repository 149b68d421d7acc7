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

//! The main engine structure, responsible for driving the tick loop.

use crate::config::EngineConfig;
use oriel_core::renderer::{RenderError, RenderingApi, RenderingSystem};
use oriel_core::Stopwatch;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// A per-tick hook. Failures are caught at the loop boundary and logged;
/// they never unwind past the loop.
pub type TickCallback = Box<dyn FnMut() -> anyhow::Result<()> + Send>;

/// Stops a running [`Engine`] loop from outside it.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Asks the loop to stop at the next tick boundary.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Drives the rendering facade once per tick at a fixed cadence.
///
/// Each tick pumps the backend's window first; a closed window stops the loop
/// before that tick's callbacks run. Update and render callbacks execute
/// inside a failure boundary: an error is logged and the loop continues to
/// the next tick rather than terminating the process.
pub struct Engine {
    rendering: Arc<Mutex<RenderingSystem>>,
    running: Arc<AtomicBool>,
    update_callback: Option<TickCallback>,
    render_callback: Option<TickCallback>,
    tick_interval: Duration,
}

impl Engine {
    /// Creates an engine paced by `config`'s target frame time.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rendering: Arc::new(Mutex::new(RenderingSystem::new())),
            running: Arc::new(AtomicBool::new(false)),
            update_callback: None,
            render_callback: None,
            tick_interval: Duration::from_millis(config.target_frame_time_ms),
        }
    }

    /// Binds and initializes the rendering backend.
    pub fn initialize(&mut self, api: Box<dyn RenderingApi>) -> Result<(), RenderError> {
        log::info!("Initializing engine...");
        self.rendering
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_api(api)?;
        log::info!("Engine initialized.");
        Ok(())
    }

    /// The shared rendering facade, for callbacks to draw through.
    pub fn rendering_system(&self) -> Arc<Mutex<RenderingSystem>> {
        self.rendering.clone()
    }

    /// Returns a handle that can stop the loop from outside.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            running: self.running.clone(),
        }
    }

    /// Registers the per-tick update hook. Last write wins.
    pub fn set_update_callback<F>(&mut self, callback: F)
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.update_callback = Some(Box::new(callback));
    }

    /// Registers the per-tick render hook. Last write wins.
    pub fn set_render_callback<F>(&mut self, callback: F)
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.render_callback = Some(Box::new(callback));
    }

    /// Runs the tick loop until the window closes or a
    /// [`ShutdownHandle`] stops it.
    ///
    /// Only a facade-level precondition failure (no backend bound) exits with
    /// an error; per-tick callback failures are logged and survived.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.running.store(true, Ordering::SeqCst);
        log::info!("Engine running. Close the window to quit.");

        let run_time = Stopwatch::new();
        let mut ticks: u64 = 0;

        while self.running.load(Ordering::SeqCst) {
            let keep_running = self
                .rendering
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .process_messages()?;
            if !keep_running {
                log::info!("window closed; stopping engine loop");
                break;
            }

            if let Some(update) = self.update_callback.as_mut() {
                if let Err(err) = update() {
                    log::error!("error during update tick: {err:#}");
                }
            }
            if let Some(render) = self.render_callback.as_mut() {
                if let Err(err) = render() {
                    log::error!("error during render tick: {err:#}");
                }
            }

            ticks += 1;
            thread::sleep(self.tick_interval);
        }

        self.running.store(false, Ordering::SeqCst);
        log::info!(
            "engine loop exited after {ticks} ticks in {:?}",
            run_time.elapsed()
        );
        Ok(())
    }

    /// Stops the loop and releases the bound backend.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.rendering
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .shutdown();
        log::info!("Engine shut down.");
    }
}
