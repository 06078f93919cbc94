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

//! Sample-point self-consistency check.

use crate::compiler::CompiledExpr;
use crate::options::CompileOptions;
use std::fmt;
use tracing::warn;

/// Evaluated value disagrees with the caller's expectation.
///
/// Recoverable: the expression is still attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub name: String,
    pub expected: f64,
    pub evaluated: f64,
    /// Effective tolerance after scaling by `max(1, |expected|)`.
    pub tolerance: f64,
}

impl ValidationWarning {
    pub fn difference(&self) -> f64 {
        (self.evaluated - self.expected).abs()
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: evaluated {} at the sample point but expected {} (difference {:.3e}, tolerance {:.3e})",
            self.name,
            self.evaluated,
            self.expected,
            self.difference(),
            self.tolerance
        )
    }
}

/// Evaluates `compiled` at `sample` and compares with `expected`.
pub(super) fn check_sample(
    name: &str,
    compiled: &CompiledExpr,
    sample: &[f64],
    expected: Option<f64>,
    options: &CompileOptions,
) -> (Option<f64>, Option<ValidationWarning>) {
    let Some(evaluated) = compiled.evaluate(sample) else {
        return (None, None);
    };
    let Some(expected) = expected else {
        return (Some(evaluated), None);
    };

    let tolerance = options.tolerance_for(expected);
    // NaN on either side counts as a mismatch.
    if (evaluated - expected).abs() <= tolerance {
        return (Some(evaluated), None);
    }
    let warning = ValidationWarning {
        name: name.to_string(),
        expected,
        evaluated,
        tolerance,
    };
    warn!(
        constraint = name,
        expr = %compiled,
        expected,
        evaluated,
        "nonlinear expression does not match the expected sample value"
    );
    (Some(evaluated), Some(warning))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;

    fn x0_plus_one() -> CompiledExpr {
        compile([1.0, 0.0, 0.0, 1.0, 5.0], 1, &CompileOptions::default()).unwrap()
    }

    #[test]
    fn matching_value_yields_no_warning() {
        let (value, warning) = check_sample(
            "NonlinearExp0",
            &x0_plus_one(),
            &[2.0],
            Some(3.0 + 1e-12),
            &CompileOptions::default(),
        );
        assert_eq!(value, Some(3.0));
        assert!(warning.is_none());
    }

    #[test]
    fn mismatch_is_reported_with_scaled_tolerance() {
        let (value, warning) = check_sample(
            "NonlinearExp0",
            &x0_plus_one(),
            &[2.0],
            Some(4.0),
            &CompileOptions::default().with_tolerance(1e-3),
        );
        assert_eq!(value, Some(3.0));
        let warning = warning.expect("mismatch should warn");
        assert_eq!(warning.difference(), 1.0);
        assert!((warning.tolerance - 4e-3).abs() < 1e-15);
        assert!(warning.to_string().starts_with("NonlinearExp0: evaluated 3"));
    }

    #[test]
    fn nan_evaluation_is_a_mismatch() {
        let (_, warning) = check_sample(
            "NonlinearExp0",
            &x0_plus_one(),
            &[f64::NAN],
            Some(0.0),
            &CompileOptions::default(),
        );
        assert!(warning.is_some());
    }
}
