//! Property-based tests for threading, matching and specs.
//!
//! These use proptest to generate random trees and values and verify:
//! 1. Thread nesting order and broadcast distribution
//! 2. Parallel threading's length requirement
//! 3. Conditional threading's literal base cases
//! 4. The matcher's length guard and `find`'s agreement with `matches`
//! 5. Non-short-circuiting `and` traces, vacuous collection specs and
//!    generator output conformance

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use hyt::expand::policy::{broadcast, cond_thread, parallel, thread, thread_first};
use hyt::expand::Position;
use hyt::ir::build::{call, call0, int, seq, sym};
use hyt::patterns::{find, linearize, matches, subtrees};
use hyt::spec::{and, coll_of, dict_of, named, pred, FunctionValue};
use hyt::{Expr, ExprError, SpecEnv, Value};
use proptest::prelude::*;

// -- Strategies --

fn symbol() -> impl Strategy<Value = Expr> {
    "[a-e]".prop_map(|name| sym(&name))
}

fn leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![symbol(), (0i64..4).prop_map(int)]
}

/// Random trees of calls and sequences over a small alphabet, so that
/// matches happen often.
fn tree() -> impl Strategy<Value = Expr> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            ("[f-h]", prop::collection::vec(inner.clone(), 0..4))
                .prop_map(|(op, args)| call(&op, args)),
            prop::collection::vec(inner, 0..4).prop_map(|items| seq(items)),
        ]
    })
}

fn env() -> SpecEnv {
    let env = SpecEnv::new();
    env.define_many([
        ("even", pred("even?", |v| v.as_int().is_some_and(|n| n % 2 == 0))),
        ("positive", pred("pos?", |v| v.as_int().is_some_and(|n| n > 0))),
    ])
    .unwrap();
    env
}

// -- Threading --

proptest! {
    #[test]
    fn thread_first_nests_in_application_order(x in symbol(), ops in prop::collection::vec("[f-k]", 1..6)) {
        let forms: Vec<Expr> = ops.iter().map(|op| sym(op)).collect();
        let mut expected = x.clone();
        for op in &ops {
            expected = call(op, [expected]);
        }
        prop_assert_eq!(thread_first(&x, &forms).unwrap(), expected);
    }

    #[test]
    fn broadcast_distributes_over_branches(branches in prop::collection::vec(leaf(), 0..6), op in "[f-k]") {
        let f = sym(&op);
        let expected = seq(
            branches
                .iter()
                .map(|branch| thread(branch, &f, Position::First).unwrap()),
        );
        prop_assert_eq!(broadcast(&seq(branches), &f, Position::First).unwrap(), expected);
    }

    #[test]
    fn parallel_requires_equal_lengths(m in 1usize..6, n in 1usize..6) {
        let branches = seq((0..m).map(|i| sym(&format!("x{i}"))));
        let forms = seq((0..n).map(|i| call0(&format!("f{i}"))));
        match parallel(&branches, &forms, Position::First) {
            Ok(out) => {
                prop_assert_eq!(m, n);
                prop_assert_eq!(out.items().map(<[Expr]>::len), Some(m));
            }
            Err(err) => {
                prop_assert_ne!(m, n);
                prop_assert_eq!(err, ExprError::dimension_mismatch(n, m));
            }
        }
    }

    #[test]
    fn broadcast_sequences_require_equal_lengths(m in 1usize..6, n in 1usize..6) {
        let branches = seq((0..m).map(|i| sym(&format!("x{i}"))));
        let forms = seq((0..n).map(|i| call0(&format!("f{i}"))));
        match broadcast(&branches, &forms, Position::Last) {
            Ok(out) => {
                prop_assert_eq!(m, n);
                prop_assert_eq!(out.items().map(<[Expr]>::len), Some(m));
            }
            Err(err) => {
                prop_assert_ne!(m, n);
                prop_assert_eq!(err, ExprError::dimension_mismatch(n, m));
            }
        }
    }

    #[test]
    fn conditional_literal_base_cases(x in tree(), op in "[f-k]") {
        let f = call0(&op);
        prop_assert_eq!(
            cond_thread(&x, &[Expr::bool(true), f.clone()], Position::First).unwrap(),
            thread_first(&x, std::slice::from_ref(&f)).unwrap()
        );
        prop_assert_eq!(
            cond_thread(&x, &[Expr::bool(false), f], Position::First).unwrap(),
            x
        );
    }
}

// -- Matching --

proptest! {
    #[test]
    fn longer_patterns_never_match(expr in tree(), pattern in tree()) {
        prop_assume!(linearize(&pattern).len() > linearize(&expr).len());
        prop_assert!(!matches(&expr, &pattern));
    }

    #[test]
    fn every_tree_matches_itself(expr in tree()) {
        prop_assert!(matches(&expr, &expr));
    }

    #[test]
    fn find_agrees_with_matches(expr in tree(), pattern in tree()) {
        let expected: Vec<Expr> = subtrees(&expr)
            .filter(|node| matches(node, &pattern))
            .cloned()
            .collect();
        prop_assert_eq!(find(&expr, &pattern, None), expected);
    }

    #[test]
    fn find_limit_takes_a_prefix(expr in tree(), pattern in tree(), limit in 0usize..4) {
        let all = find(&expr, &pattern, None);
        let bounded = find(&expr, &pattern, Some(limit));
        prop_assert_eq!(&bounded[..], &all[..all.len().min(limit)]);
    }
}

// -- Specs --

proptest! {
    #[test]
    fn and_traces_every_operand(n in -50i64..50) {
        let env = env();
        let trace = env
            .explain(&and([named("even"), named("positive")]), &Value::int(n))
            .unwrap();
        prop_assert_eq!(trace.len(), 2);
        prop_assert_eq!(&*trace.entries()[0].spec, "even");
        prop_assert_eq!(&*trace.entries()[1].spec, "positive");
    }

    #[test]
    fn gen_output_is_valid(n in -1000i64..1000) {
        let env = env();
        env.define_gen(
            "even",
            FunctionValue::new("double", |args| {
                Value::int(args.first().and_then(Value::as_int).unwrap_or(0) * 2)
            }),
        );
        let value = env.generate("even", &[Value::int(n)]).unwrap();
        prop_assert!(env.valid(&named("even"), &value).unwrap());
    }
}

#[test]
fn collection_specs_are_vacuously_true() {
    let env = env();
    let never = pred("never", |_| false);
    assert!(env.valid(&coll_of(never.clone()), &Value::list(vec![])).unwrap());
    assert!(env.valid(&coll_of(never.clone()), &Value::tuple(vec![])).unwrap());
    assert!(env.valid(&dict_of(never.clone(), never), &Value::map(vec![])).unwrap());
}
