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

//! Runtime configuration.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

/// Settings of the engine runtime, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Title of the window the backend creates.
    pub window_title: String,
    /// Width of the window in pixels.
    pub window_width: u32,
    /// Height of the window in pixels.
    pub window_height: u32,
    /// Number of frames in flight (and swap-chain back buffers).
    pub frames_in_flight: usize,
    /// Wall-clock pacing of the engine loop in milliseconds per tick.
    pub target_frame_time_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_title: "Oriel".to_string(),
            window_width: 1280,
            window_height: 720,
            frames_in_flight: 2,
            target_frame_time_ms: 16,
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from `path`.
    ///
    /// A missing file is not an error — defaults are used; a file that fails
    /// to parse is.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("parsing engine config at {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("no engine config at {}; using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => {
                Err(err).with_context(|| format!("reading engine config at {}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults_per_field() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "window_title": "Demo", "frames_in_flight": 3 }"#).unwrap();
        assert_eq!(config.window_title, "Demo");
        assert_eq!(config.frames_in_flight, 3);
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.target_frame_time_ms, 16);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = EngineConfig::load(Path::new("/nonexistent/oriel.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
