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

//! Solver model stand-in receiving compiled nonlinear expressions.
//!
//! The model owns a variable table, the linear objective implied by variable
//! objective coefficients and the list of attached nonlinear constraints.

mod attach;
mod errors;
mod result;
mod validate;

use crate::graph::{ExprGraph, NodeId};
use std::fmt;

pub use attach::{OBJECTIVE_AUX_NAME, add_nonlinear_con};
pub use errors::AttachError;
pub use result::AttachReport;
pub use validate::ValidationWarning;

/// Index into the model's variable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// One solver variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    /// Coefficient in the linear objective.
    pub objective: f64,
}

/// Where a compiled expression is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// `lhs <= expr <= rhs`; either side may be infinite.
    Constraint { lhs: f64, rhs: f64 },
    /// Added to the linear objective through a free auxiliary variable.
    Objective,
}

/// Everything the host passes alongside one instruction stream.
#[derive(Debug, Clone, PartialEq)]
pub struct NonlinearRequest {
    /// Expression identifier used in constraint names.
    pub id: usize,
    pub target: Target,
    /// Optional point (one value per model variable) to evaluate at.
    pub sample: Option<Vec<f64>>,
    /// Value the expression is expected to take at `sample`.
    pub expected: Option<f64>,
}

impl NonlinearRequest {
    pub fn constraint(id: usize, lhs: f64, rhs: f64) -> Self {
        Self {
            id,
            target: Target::Constraint { lhs, rhs },
            sample: None,
            expected: None,
        }
    }

    pub fn objective(id: usize) -> Self {
        Self {
            id,
            target: Target::Objective,
            sample: None,
            expected: None,
        }
    }

    /// Attaches a validation point and optionally the expected value there.
    pub fn with_sample(mut self, sample: Vec<f64>, expected: Option<f64>) -> Self {
        self.sample = Some(sample);
        self.expected = expected;
        self
    }
}

/// An attached nonlinear constraint:
/// `lhs <= graph(root) + sum(coef * var) <= rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct NonlinearConstraint {
    pub name: String,
    pub graph: ExprGraph,
    pub root: NodeId,
    pub lhs: f64,
    pub rhs: f64,
    pub linear_terms: Vec<(VarId, f64)>,
}

impl NonlinearConstraint {
    /// Constraint activity at `point`; `None` if a referenced variable has no
    /// value.
    pub fn activity(&self, point: &[f64]) -> Option<f64> {
        let mut value = self.graph.evaluate(self.root, point)?;
        for (var, coef) in &self.linear_terms {
            value += coef * point.get(var.0)?;
        }
        Some(value)
    }
}

/// Variable table plus attached nonlinear constraints.
#[derive(Debug, Clone, Default)]
pub struct Model {
    variables: Vec<Variable>,
    constraints: Vec<NonlinearConstraint>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable and returns its index.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        lower: f64,
        upper: f64,
        objective: f64,
    ) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable {
            name: name.into(),
            lower,
            upper,
            objective,
        });
        id
    }

    /// Adds `count` continuous variables named `x0..` with the given bounds.
    pub fn with_variables(count: usize, lower: f64, upper: f64) -> Self {
        let mut model = Self::new();
        for idx in 0..count {
            model.add_variable(format!("x{idx}"), lower, upper, 0.0);
        }
        model
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    pub fn constraints(&self) -> &[NonlinearConstraint] {
        &self.constraints
    }

    /// Looks up an attached constraint by name.
    pub fn constraint_by_name(&self, name: &str) -> Option<&NonlinearConstraint> {
        self.constraints.iter().find(|con| con.name == name)
    }

    /// Activity of constraint `index` at `point`, linear terms included.
    pub fn evaluate_constraint(&self, index: usize, point: &[f64]) -> Option<f64> {
        self.constraints.get(index)?.activity(point)
    }

    /// Linear objective value at `point`.
    pub fn objective_value(&self, point: &[f64]) -> Option<f64> {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, var)| var.objective != 0.0)
            .try_fold(0.0, |acc, (idx, var)| Some(acc + var.objective * point.get(idx)?))
    }
}
