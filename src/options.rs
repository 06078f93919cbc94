/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Per-compilation settings.

use serde::{Deserialize, Serialize};

/// Default bound on the combined depth of the deferred-operand stacks.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default validation tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Settings shared by every compilation in a session.
///
/// Deserialises from partial documents; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Maximum number of operands parked on the deferred stacks at once.
    pub max_depth: usize,
    /// Absolute validation tolerance, scaled by `max(1, |expected|)`.
    pub tolerance: f64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deferred-stack limit. Zero is raised to one.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Effective deferred-stack limit.
    pub fn depth_limit(&self) -> usize {
        self.max_depth.max(1)
    }

    /// Tolerance applied when comparing against `expected`.
    pub fn tolerance_for(&self, expected: f64) -> f64 {
        self.tolerance.abs() * expected.abs().max(1.0)
    }
}
