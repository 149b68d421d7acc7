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

//! A simple stopwatch for frame timing and loop pacing.

use std::time::{Duration, Instant};

/// Measures elapsed wall-clock time from a starting point.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Creates a stopwatch that starts measuring immediately.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Returns the time elapsed since the stopwatch was created or last reset.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns the elapsed time in whole milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed().as_millis()
    }

    /// Resets the starting point to now and returns the time that had elapsed.
    pub fn restart(&mut self) -> Duration {
        let elapsed = self.started.elapsed();
        self.started = Instant::now();
        elapsed
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_resets_the_origin() {
        let mut watch = Stopwatch::new();
        std::thread::sleep(Duration::from_millis(5));
        let first = watch.restart();
        assert!(first >= Duration::from_millis(5));
        assert!(watch.elapsed() < first);
    }
}
