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

//! Property-based tests for stream compilation.

use proptest::prelude::*;

use crate::{BinaryOp, CompileOptions, InstructionStream, compile, parse_listing};

// Finite values keep equality checks exact.
fn finite() -> impl Strategy<Value = f64> {
    -1.0e6f64..1.0e6f64
}

fn point(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(finite(), len)
}

proptest! {
    #[test]
    fn constant_streams_evaluate_to_their_value(c in any::<f64>().prop_filter("not NaN", |v| !v.is_nan()), x in point(3)) {
        let expr = compile([0.0, c], 3, &CompileOptions::default()).unwrap();
        prop_assert_eq!(expr.evaluate(&x), Some(c));
    }

    #[test]
    fn variable_streams_select_their_coordinate(index in 0usize..8, x in point(8)) {
        let stream = InstructionStream::new().var(index);
        let expr = compile(&stream, 8, &CompileOptions::default()).unwrap();
        prop_assert_eq!(expr.evaluate(&x), Some(x[index]));
    }

    #[test]
    fn left_fold_sums_match_iterator_sum(x in prop::collection::vec(finite(), 2..40)) {
        let mut stream = InstructionStream::new().var(0);
        for idx in 1..x.len() {
            stream = stream.var(idx).binary(BinaryOp::Add);
        }
        let expr = compile(&stream, x.len(), &CompileOptions::default()).unwrap();
        let expected = x.iter().skip(1).fold(x[0], |acc, v| acc + v);
        prop_assert_eq!(expr.evaluate(&x), Some(expected));
        prop_assert_eq!(expr.leaves().len(), x.len());
    }

    #[test]
    fn postfix_differences_nest_to_the_right(x in prop::collection::vec(finite(), 2..40)) {
        // VAR 0 .. VAR n followed by n SUBs parks every leading operand.
        let n = x.len() - 1;
        let mut stream = InstructionStream::new();
        for idx in 0..=n {
            stream = stream.var(idx);
        }
        for _ in 0..n {
            stream = stream.binary(BinaryOp::Sub);
        }
        let expr = compile(&stream, x.len(), &CompileOptions::default()).unwrap();
        let expected = x[..n].iter().rev().fold(x[n], |acc, v| v - acc);
        prop_assert_eq!(expr.evaluate(&x), Some(expected));
    }

    #[test]
    fn compiling_twice_gives_equivalent_graphs(
        consts in prop::collection::vec(finite(), 1..10),
    ) {
        let mut stream = InstructionStream::new().var(0);
        for (idx, c) in consts.iter().enumerate() {
            let op = if idx % 2 == 0 { BinaryOp::Mul } else { BinaryOp::Sub };
            stream = stream.num(*c).var(idx % 3).binary(BinaryOp::Add).binary(op);
        }
        let options = CompileOptions::default();
        let first = compile(&stream, 3, &options).unwrap();
        let second = compile(&stream, 3, &options).unwrap();
        prop_assert!(first.graph().structurally_eq(second.graph()));
        prop_assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn listings_render_and_parse_back(
        consts in prop::collection::vec(finite(), 1..10),
        indices in prop::collection::vec(0usize..50, 1..10),
    ) {
        let mut stream = InstructionStream::new();
        for c in &consts {
            stream = stream.num(*c);
        }
        for idx in &indices {
            stream = stream.var(*idx).binary(BinaryOp::Div);
        }
        let parsed = parse_listing(&stream.listing()).unwrap();
        prop_assert_eq!(parsed, stream);
    }
}
