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

//! Outcome of a successful attachment.

use super::{ValidationWarning, VarId};

/// What [`super::Model::add_nonlinear`] added to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachReport {
    /// Index of the new constraint.
    pub constraint: usize,
    /// Constraint name (`NonlinearExp{id}` or `NonlinearObj{id}`).
    pub name: String,
    /// Expression value at the sample point, when one was given.
    pub evaluated: Option<f64>,
    /// Auxiliary objective variable, for objective attachments.
    pub auxiliary: Option<VarId>,
    /// Recoverable validation mismatch.
    pub warning: Option<ValidationWarning>,
}

impl AttachReport {
    /// Returns whether the sample check passed or was not requested.
    pub fn is_consistent(&self) -> bool {
        self.warning.is_none()
    }
}
