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

//! Wrapping compiled expressions into constraints or the objective.

use super::validate::check_sample;
use super::*;
use crate::compiler::compile;
use crate::options::CompileOptions;
use tracing::debug;

/// Name of the free variable carrying a nonlinear objective term.
pub const OBJECTIVE_AUX_NAME: &str = "nlobj";

impl Model {
    /// Compiles `stream` and attaches it with default [`CompileOptions`].
    pub fn add_nonlinear(
        &mut self,
        stream: impl AsRef<[f64]>,
        request: &NonlinearRequest,
    ) -> Result<AttachReport, AttachError> {
        self.add_nonlinear_with(stream, request, &CompileOptions::default())
    }

    /// Compiles `stream` and attaches it as a constraint or objective term.
    ///
    /// Every check runs before the model is touched, so on error neither the
    /// auxiliary variable nor the constraint is added.
    pub fn add_nonlinear_with(
        &mut self,
        stream: impl AsRef<[f64]>,
        request: &NonlinearRequest,
        options: &CompileOptions,
    ) -> Result<AttachReport, AttachError> {
        if let Target::Constraint { lhs, rhs } = request.target {
            if lhs.is_nan() || rhs.is_nan() || lhs > rhs {
                return Err(AttachError::InvalidBounds { lhs, rhs });
            }
        }
        let variable_count = self.variable_count();
        if let Some(sample) = &request.sample {
            if sample.len() != variable_count {
                return Err(AttachError::SampleDimension {
                    expected: variable_count,
                    found: sample.len(),
                });
            }
        }

        let compiled = compile(stream, variable_count, options)?;

        let name = match request.target {
            Target::Constraint { .. } => format!("NonlinearExp{}", request.id),
            Target::Objective => format!("NonlinearObj{}", request.id),
        };
        let (evaluated, warning) = match &request.sample {
            Some(sample) => check_sample(&name, &compiled, sample, request.expected, options),
            None => (None, None),
        };

        let (lhs, rhs, auxiliary) = match request.target {
            Target::Constraint { lhs, rhs } => (lhs, rhs, None),
            Target::Objective => {
                let aux = self.add_variable(
                    OBJECTIVE_AUX_NAME,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                    1.0,
                );
                (0.0, 0.0, Some(aux))
            }
        };

        let root = compiled.root();
        let constraint = self.constraints.len();
        self.constraints.push(NonlinearConstraint {
            name: name.clone(),
            graph: compiled.into_graph(),
            root,
            lhs,
            rhs,
            linear_terms: auxiliary.map(|aux| (aux, -1.0)).into_iter().collect(),
        });
        debug!(
            constraint = %name,
            lhs,
            rhs,
            auxiliary = auxiliary.map(|aux| aux.0),
            "attached nonlinear expression"
        );

        Ok(AttachReport {
            constraint,
            name,
            evaluated,
            auxiliary,
            warning,
        })
    }
}

/// Host entry point: compile one stream and attach it to `model`.
pub fn add_nonlinear_con(
    model: &mut Model,
    stream: impl AsRef<[f64]>,
    request: &NonlinearRequest,
    options: &CompileOptions,
) -> Result<AttachReport, AttachError> {
    model.add_nonlinear_with(stream, request, options)
}
