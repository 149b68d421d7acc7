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

//! Demo runtime: a moving rectangle over a cleared background, rendered
//! through the explicit backend on the virtual device.

use anyhow::anyhow;
use oriel_core::math::{Extent2D, LinearRgba, Vec2};
use oriel_core::renderer::{GraphicsDevice, PipelineHandle};
use oriel_infra::{ExplicitBackend, HeadlessWindow, VirtualGpuDevice};
use oriel_runtime::{Engine, EngineConfig};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const DEMO_FRAMES: u64 = 240;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = EngineConfig::load(Path::new("oriel.json"))?;
    log::info!("starting with config: {config:?}");

    let device: Arc<dyn GraphicsDevice> = Arc::new(VirtualGpuDevice::new()?);
    let window = HeadlessWindow::new(
        &config.window_title,
        Extent2D::new(config.window_width, config.window_height),
    );
    let close_handle = window.close_handle();

    // The pipeline state object is pre-built and opaque to the engine.
    let backend = ExplicitBackend::new(
        device,
        Box::new(window),
        PipelineHandle(1),
        config.frames_in_flight,
    );

    let mut engine = Engine::new(&config);
    engine.initialize(Box::new(backend))?;

    let frame = Arc::new(AtomicU64::new(0));

    engine.set_update_callback({
        let frame = frame.clone();
        move || {
            if frame.fetch_add(1, Ordering::SeqCst) + 1 >= DEMO_FRAMES {
                close_handle.close();
            }
            Ok(())
        }
    });

    let rendering = engine.rendering_system();
    let viewport_width = config.window_width as f32;
    engine.set_render_callback({
        let frame = frame.clone();
        move || {
            let mut rendering = rendering
                .lock()
                .map_err(|_| anyhow!("rendering system mutex poisoned"))?;

            let t = frame.load(Ordering::SeqCst) as f32;
            let x = (t * 4.0) % (viewport_width - 100.0);

            rendering.clear(LinearRgba::new(0.39, 0.58, 0.93, 1.0))?;
            rendering.draw_rectangle(Vec2::new(x, 260.0), Vec2::new(100.0, 100.0), LinearRgba::RED)?;
            rendering.present()?;
            Ok(())
        }
    });

    engine.run()?;
    engine.shutdown();
    Ok(())
}
