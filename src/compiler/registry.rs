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

//! One leaf per variable occurrence.

use super::*;

/// Builds variable leaves and checks indices against the solver table.
#[derive(Debug, Clone)]
pub(super) struct VariableRegistry {
    count: usize,
    leaves: Vec<NodeId>,
}

impl VariableRegistry {
    pub(super) fn new(count: usize, capacity: usize) -> Self {
        Self {
            count,
            leaves: Vec::with_capacity(capacity),
        }
    }

    /// Instantiates a fresh leaf for `index`. Repeated indices are not
    /// deduplicated.
    pub(super) fn register(
        &mut self,
        graph: &mut ExprGraph,
        position: usize,
        index: usize,
    ) -> Result<NodeId, CompileError> {
        if index >= self.count {
            return Err(CompileError::IndexOutOfRange {
                position,
                index: index as f64,
                count: self.count,
            });
        }
        let leaf = graph.build_leaf(index);
        self.leaves.push(leaf);
        Ok(leaf)
    }

    pub(super) fn into_leaves(self) -> Vec<NodeId> {
        self.leaves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    #[test]
    fn repeated_indices_get_distinct_leaves() {
        let mut graph = ExprGraph::new();
        let mut registry = VariableRegistry::new(2, 2);
        let first = registry.register(&mut graph, 0, 1).unwrap();
        let second = registry.register(&mut graph, 2, 1).unwrap();

        assert_ne!(first, second);
        assert_eq!(graph.node(first), Some(&Node::Variable { index: 1 }));
        assert_eq!(graph.node(second), Some(&Node::Variable { index: 1 }));
        assert_eq!(registry.into_leaves(), vec![first, second]);
    }

    #[test]
    fn index_past_the_table_is_rejected() {
        let mut graph = ExprGraph::new();
        let mut registry = VariableRegistry::new(2, 1);
        let err = registry.register(&mut graph, 6, 2).unwrap_err();
        assert_eq!(
            err,
            CompileError::IndexOutOfRange {
                position: 6,
                index: 2.0,
                count: 2
            }
        );
        assert!(graph.is_empty());
    }
}
