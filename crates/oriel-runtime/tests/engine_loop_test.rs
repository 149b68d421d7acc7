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

//! Engine-loop boundary behavior with a scripted backend.

use anyhow::anyhow;
use oriel_core::math::{LinearRgba, Vec2};
use oriel_core::renderer::{RenderError, RenderingApi};
use oriel_runtime::{Engine, EngineConfig};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A backend whose window "closes" after a fixed number of message pumps.
#[derive(Debug)]
struct ScriptedApi {
    pumps_before_close: u64,
    pumps: Arc<AtomicU64>,
}

impl RenderingApi for ScriptedApi {
    fn initialize(&mut self) -> Result<(), RenderError> {
        Ok(())
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
        self.pumps.fetch_add(1, Ordering::SeqCst) + 1 < self.pumps_before_close
    }
    fn shutdown(&mut self) {}
}

fn fast_config() -> EngineConfig {
    EngineConfig {
        target_frame_time_ms: 1,
        ..EngineConfig::default()
    }
}

#[test]
fn window_close_stops_the_loop_before_that_ticks_callbacks() {
    let pumps = Arc::new(AtomicU64::new(0));
    let mut engine = Engine::new(&fast_config());
    engine
        .initialize(Box::new(ScriptedApi {
            pumps_before_close: 4,
            pumps: pumps.clone(),
        }))
        .unwrap();

    let updates = Arc::new(AtomicU64::new(0));
    let renders = Arc::new(AtomicU64::new(0));
    engine.set_update_callback({
        let updates = updates.clone();
        move || {
            updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });
    engine.set_render_callback({
        let renders = renders.clone();
        move || {
            renders.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    engine.run().unwrap();

    // The pump that returned false (tick 4) must not run callbacks.
    assert_eq!(pumps.load(Ordering::SeqCst), 4);
    assert_eq!(updates.load(Ordering::SeqCst), 3);
    assert_eq!(renders.load(Ordering::SeqCst), 3);
}

#[test]
fn callback_failures_are_contained_and_the_loop_continues() {
    let pumps = Arc::new(AtomicU64::new(0));
    let mut engine = Engine::new(&fast_config());
    engine
        .initialize(Box::new(ScriptedApi {
            pumps_before_close: 4,
            pumps,
        }))
        .unwrap();

    let attempts = Arc::new(AtomicU64::new(0));
    engine.set_render_callback({
        let attempts = attempts.clone();
        move || {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("simulated render failure"))
        }
    });

    // The loop survives every failing tick and exits through window close.
    engine.run().unwrap();
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[test]
fn last_registered_callback_wins() {
    let pumps = Arc::new(AtomicU64::new(0));
    let mut engine = Engine::new(&fast_config());
    engine
        .initialize(Box::new(ScriptedApi {
            pumps_before_close: 2,
            pumps,
        }))
        .unwrap();

    let first = Arc::new(AtomicU64::new(0));
    let second = Arc::new(AtomicU64::new(0));
    engine.set_update_callback({
        let first = first.clone();
        move || {
            first.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });
    engine.set_update_callback({
        let second = second.clone();
        move || {
            second.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    engine.run().unwrap();
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn shutdown_handle_stops_the_loop() {
    let pumps = Arc::new(AtomicU64::new(0));
    let mut engine = Engine::new(&fast_config());
    engine
        .initialize(Box::new(ScriptedApi {
            pumps_before_close: u64::MAX,
            pumps,
        }))
        .unwrap();

    let handle = engine.shutdown_handle();
    let ticks = Arc::new(AtomicU64::new(0));
    engine.set_update_callback({
        let ticks = ticks.clone();
        move || {
            if ticks.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                handle.stop();
            }
            Ok(())
        }
    });

    engine.run().unwrap();
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
}

#[test]
fn running_without_a_backend_is_a_precondition_error() {
    let mut engine = Engine::new(&fast_config());
    assert!(engine.run().is_err());
}
