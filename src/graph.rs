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

//! Append-only expression graph handed to the downstream solver.
//!
//! Nodes live in a single arena and reference their children by [`NodeId`].
//! Children are always created before their parents, so every graph is a DAG
//! by construction and can be evaluated in one forward sweep.

use std::collections::BTreeSet;
use std::fmt;

/// Stable reference to a node inside one [`ExprGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena position of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Two-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Power with a constant exponent (`^`).
    Pow,
}

impl BinaryOp {
    /// Returns whether operand order is irrelevant for this operator.
    pub fn is_commutative(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Mul)
    }

    /// Infix symbol used when rendering graphs.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }

    fn spaced_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => " + ",
            BinaryOp::Sub => " - ",
            BinaryOp::Mul => " * ",
            BinaryOp::Div => " / ",
            BinaryOp::Pow => " ^ ",
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => pow(lhs, rhs),
        }
    }
}

/// Single-operand functions supported by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `x^2`.
    Square,
    /// Square root.
    Sqrt,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Log,
    /// Absolute value.
    Abs,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
}

impl UnaryOp {
    /// Function name used when rendering graphs.
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Square => "square",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
            UnaryOp::Abs => "abs",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
        }
    }

    fn apply(self, value: f64) -> f64 {
        // Domain violations (log of a negative, ...) propagate as NaN; the
        // solver owns domain handling.
        match self {
            UnaryOp::Square => value * value,
            UnaryOp::Sqrt => value.sqrt(),
            UnaryOp::Exp => value.exp(),
            UnaryOp::Log => value.ln(),
            UnaryOp::Abs => value.abs(),
            UnaryOp::Sin => value.sin(),
            UnaryOp::Cos => value.cos(),
        }
    }
}

/// Integral exponents go through `powi` so negative bases keep their sign.
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent.abs() <= i32::MAX as f64 {
        base.powi(exponent as i32)
    } else {
        base.powf(exponent)
    }
}

/// Expression graph node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Leaf wrapping solver variable `index`. One leaf exists per occurrence.
    Variable { index: usize },
    /// Constant leaf.
    Constant(f64),
    /// Function applied to one child.
    Unary { op: UnaryOp, child: NodeId },
    /// Operator applied to two children.
    ///
    /// The logical first operand is `lhs`, unless `flip` is set, in which case
    /// it is `rhs`.
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
        flip: bool,
    },
}

impl Node {
    fn children(&self) -> [Option<NodeId>; 2] {
        match self {
            Node::Variable { .. } | Node::Constant(_) => [None, None],
            Node::Unary { child, .. } => [Some(*child), None],
            Node::Binary { lhs, rhs, .. } => [Some(*lhs), Some(*rhs)],
        }
    }
}

/// Append-only node arena.
///
/// Nodes are never mutated after construction, so a [`NodeId`] handed out by
/// one of the `build_*` methods stays valid for the lifetime of the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprGraph {
    nodes: Vec<Node>,
}

impl ExprGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Appends a variable leaf for solver variable `index`.
    pub fn build_leaf(&mut self, index: usize) -> NodeId {
        self.push(Node::Variable { index })
    }

    /// Appends a constant leaf.
    pub fn build_const(&mut self, value: f64) -> NodeId {
        self.push(Node::Constant(value))
    }

    /// Appends a function node over `child`.
    pub fn build_unary(&mut self, op: UnaryOp, child: NodeId) -> NodeId {
        self.push(Node::Unary { op, child })
    }

    /// Appends an operator node. `flip` marks `rhs` as the logical first operand.
    pub fn build_binary(&mut self, op: BinaryOp, lhs: NodeId, rhs: NodeId, flip: bool) -> NodeId {
        self.push(Node::Binary { op, lhs, rhs, flip })
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        for child in node.children().into_iter().flatten() {
            debug_assert!(
                child < id,
                "node {id} references {child}, which is not an earlier node"
            );
        }
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the most recently built node.
    pub fn root(&self) -> Option<NodeId> {
        self.nodes.len().checked_sub(1).map(NodeId)
    }

    /// Returns the node stored at `id`.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Iterates nodes in construction order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(idx, node)| (NodeId(idx), node))
    }

    /// Returns the children of a binary node in logical order.
    pub fn operands(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        match self.node(id)? {
            Node::Binary {
                lhs, rhs, flip, ..
            } => Some(if *flip { (*rhs, *lhs) } else { (*lhs, *rhs) }),
            _ => None,
        }
    }

    /// Distinct solver variable indices referenced by the graph, ascending.
    pub fn variables(&self) -> Vec<usize> {
        let mut out = BTreeSet::new();
        for node in &self.nodes {
            if let Node::Variable { index } = node {
                out.insert(*index);
            }
        }
        out.into_iter().collect()
    }

    /// Number of variable leaves (occurrences, not distinct variables).
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Variable { .. }))
            .count()
    }

    /// Evaluates node `id` at `point` (indexed by solver variable).
    ///
    /// Only nodes reachable from `id` are evaluated. Returns `None` when `id`
    /// is not in the graph or a referenced variable has no value in `point`.
    pub fn evaluate(&self, id: NodeId, point: &[f64]) -> Option<f64> {
        let reachable = self.reachable(id)?;
        // Children precede parents, so one forward sweep is bottom-up.
        let mut values = vec![0.0; id.0 + 1];
        for (idx, node) in self.nodes[..=id.0].iter().enumerate() {
            if !reachable[idx] {
                continue;
            }
            values[idx] = match node {
                Node::Variable { index } => *point.get(*index)?,
                Node::Constant(value) => *value,
                Node::Unary { op, child } => op.apply(values[child.0]),
                Node::Binary {
                    op,
                    lhs,
                    rhs,
                    flip,
                } => {
                    let (lhs, rhs) = (values[lhs.0], values[rhs.0]);
                    if *flip {
                        op.apply(rhs, lhs)
                    } else {
                        op.apply(lhs, rhs)
                    }
                }
            };
        }
        values.pop()
    }

    /// Marks the subtree of `id` with one backward sweep.
    fn reachable(&self, id: NodeId) -> Option<Vec<bool>> {
        if id.0 >= self.nodes.len() {
            return None;
        }
        let mut marks = vec![false; id.0 + 1];
        marks[id.0] = true;
        for idx in (0..=id.0).rev() {
            if !marks[idx] {
                continue;
            }
            for child in self.nodes[idx].children().into_iter().flatten() {
                // Children always precede their parent.
                *marks.get_mut(child.0)? = true;
            }
        }
        Some(marks)
    }

    /// Renders node `id` as fully parenthesised infix text.
    ///
    /// Uses an explicit work stack, so nesting depth is bounded only by
    /// memory.
    pub fn render(&self, id: NodeId) -> String {
        enum Step {
            Visit(NodeId),
            Text(&'static str),
        }

        let mut out = String::new();
        let mut work = vec![Step::Visit(id)];
        while let Some(step) = work.pop() {
            let id = match step {
                Step::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Step::Visit(id) => id,
            };
            match self.node(id) {
                None => out.push_str("<dangling>"),
                Some(Node::Variable { index }) => out.push_str(&format!("x{index}")),
                Some(Node::Constant(value)) => out.push_str(&format!("{value}")),
                Some(Node::Unary { op, child }) => {
                    out.push_str(op.name());
                    out.push('(');
                    work.push(Step::Text(")"));
                    work.push(Step::Visit(*child));
                }
                Some(Node::Binary { op, .. }) => {
                    let Some((first, second)) = self.operands(id) else {
                        continue;
                    };
                    out.push('(');
                    work.push(Step::Text(")"));
                    work.push(Step::Visit(second));
                    work.push(Step::Text(op.spaced_symbol()));
                    work.push(Step::Visit(first));
                }
            }
        }
        out
    }

    /// Compares two graphs node by node; constants are compared bitwise.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .zip(&other.nodes)
                .all(|(a, b)| match (a, b) {
                    (Node::Constant(x), Node::Constant(y)) => x.to_bits() == y.to_bits(),
                    _ => a == b,
                })
    }
}

impl fmt::Display for ExprGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => f.write_str(&self.render(root)),
            None => f.write_str("<empty>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_flipped_binary_in_logical_order() {
        let mut graph = ExprGraph::new();
        let x = graph.build_leaf(0);
        let y = graph.build_leaf(1);
        let diff = graph.build_binary(BinaryOp::Sub, x, y, true);

        assert_eq!(graph.evaluate(diff, &[1.0, 5.0]), Some(4.0));
        assert_eq!(graph.operands(diff), Some((y, x)));
        assert_eq!(graph.to_string(), "(x1 - x0)");
    }

    #[test]
    fn evaluates_functions_bottom_up() {
        let mut graph = ExprGraph::new();
        let x = graph.build_leaf(0);
        let s = graph.build_unary(UnaryOp::Sin, x);
        let two = graph.build_const(2.0);
        let root = graph.build_binary(BinaryOp::Pow, s, two, false);

        let value = graph.evaluate(root, &[0.5]).unwrap();
        assert!((value - 0.5f64.sin().powi(2)).abs() < 1e-12);
        assert_eq!(graph.to_string(), "(sin(x0) ^ 2)");
    }

    #[test]
    fn integral_power_keeps_sign_of_negative_base() {
        let mut graph = ExprGraph::new();
        let x = graph.build_leaf(0);
        let three = graph.build_const(3.0);
        let root = graph.build_binary(BinaryOp::Pow, x, three, false);
        assert_eq!(graph.evaluate(root, &[-2.0]), Some(-8.0));
    }

    #[test]
    fn missing_variable_value_yields_none() {
        let mut graph = ExprGraph::new();
        let x = graph.build_leaf(3);
        assert_eq!(graph.evaluate(x, &[1.0]), None);
        assert_eq!(graph.evaluate(NodeId(7), &[1.0; 4]), None);
    }

    #[test]
    fn evaluation_skips_nodes_outside_the_subtree() {
        let mut graph = ExprGraph::new();
        let stray = graph.build_leaf(5);
        let two = graph.build_const(2.0);
        let x = graph.build_leaf(0);
        let root = graph.build_binary(BinaryOp::Mul, two, x, false);

        assert_eq!(graph.evaluate(two, &[]), Some(2.0));
        assert_eq!(graph.evaluate(root, &[4.0]), Some(8.0));
        assert_eq!(graph.evaluate(stray, &[4.0]), None);
    }

    #[test]
    fn renders_deeply_nested_sums_without_recursion() {
        let mut graph = ExprGraph::new();
        let mut acc = graph.build_leaf(0);
        for _ in 0..200_000 {
            let leaf = graph.build_leaf(0);
            acc = graph.build_binary(BinaryOp::Add, acc, leaf, false);
        }
        let text = graph.render(acc);
        assert!(text.contains("((x0 + x0) + x0)"));
        assert!(text.ends_with(" + x0) + x0) + x0)"));
        assert_eq!(text.matches('(').count(), 200_000);
        assert_eq!(graph.evaluate(acc, &[1.0]), Some(200_001.0));
    }

    #[test]
    fn lists_distinct_variables_and_counts_occurrences() {
        let mut graph = ExprGraph::new();
        let a = graph.build_leaf(2);
        let b = graph.build_leaf(0);
        let c = graph.build_leaf(2);
        let ab = graph.build_binary(BinaryOp::Mul, a, b, false);
        graph.build_binary(BinaryOp::Add, ab, c, false);

        assert_eq!(graph.variables(), vec![0, 2]);
        assert_eq!(graph.leaf_count(), 3);
    }

    #[test]
    fn structural_equality_is_bitwise_on_constants() {
        let mut a = ExprGraph::new();
        a.build_const(f64::NAN);
        let mut b = ExprGraph::new();
        b.build_const(f64::NAN);
        assert!(a.structurally_eq(&b));

        let mut c = ExprGraph::new();
        c.build_const(0.0);
        let mut d = ExprGraph::new();
        d.build_const(-0.0);
        assert!(!c.structurally_eq(&d));
    }
}
