use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyt_expand::Expander;
use hyt_ir::build::{call, call0, int, sym, typed};
use pretty_assertions::assert_eq;

use super::*;
use crate::spec::{and, cat, coll_of, dict_of, keys, modules, named, nand, or, parameters, pattern, pred, FnSpec};
use crate::value::{HasNamedSubfields, Subcollection};

fn is_int() -> Spec {
    pred("int?", |v| v.as_int().is_some())
}

fn env() -> SpecEnv {
    let env = SpecEnv::new();
    env.define_many([
        ("even", pred("even?", |v| v.as_int().is_some_and(|n| n % 2 == 0))),
        ("positive", pred("pos?", |v| v.as_int().is_some_and(|n| n > 0))),
        ("int", is_int()),
    ])
    .unwrap();
    env
}

fn ints(values: &[i64]) -> Value {
    Value::list(values.iter().copied().map(Value::int).collect())
}

#[derive(Debug)]
struct Block {
    modules: Vec<(Arc<str>, Value)>,
    parameters: Option<Vec<(Arc<str>, Value)>>,
}

impl HasNamedSubfields for Block {
    fn type_name(&self) -> &str {
        "Block"
    }

    fn list_fields(&self) -> Vec<Arc<str>> {
        self.modules.iter().map(|(name, _)| name.clone()).collect()
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        self.modules
            .iter()
            .find(|(field, _)| &**field == name)
            .map(|(_, value)| value.clone())
    }

    fn subcollection(&self, collection: Subcollection) -> Option<Vec<(Arc<str>, Value)>> {
        match collection {
            Subcollection::Modules => Some(self.modules.clone()),
            Subcollection::Parameters => self.parameters.clone(),
        }
    }
}

fn block(parameters: Option<Vec<(Arc<str>, Value)>>) -> Value {
    Value::object(Block {
        modules: vec![(Arc::from("encoder"), Value::int(4))],
        parameters,
    })
}

// valid / conform / explain

#[test]
fn named_spec_valid_and_conform() {
    let env = env();
    let even = named(":even");
    assert!(env.valid(&even, &Value::int(4)).unwrap());
    assert_eq!(env.conform(&even, &Value::int(4)).unwrap(), Value::int(4));

    let err = env.conform(&even, &Value::int(3)).unwrap_err();
    assert_eq!(err.trace().unwrap().lines(), vec!["Failed :even, Found: 3"]);
    assert_eq!(err.to_string(), "Failed :even, Found: 3");
}

#[test]
fn valid_leaves_no_trace() {
    let env = env();
    let spec = and([named("even"), coll_of(named("positive"))]);
    for n in 0..1_000 {
        env.valid(&spec, &Value::int(n)).unwrap();
        env.valid(&named("even"), &ints(&[n, n + 1])).unwrap();
    }
    assert!(env.trace().is_empty());
}

#[test]
fn diagnostic_checks_leave_no_trace_on_any_exit() {
    let env = env();
    env.conform(&named("even"), &Value::int(4)).unwrap();
    assert!(env.trace().is_empty());

    env.conform(&named("even"), &Value::int(3)).unwrap_err();
    assert!(env.trace().is_empty());

    env.explain(&named("even"), &Value::int(3)).unwrap();
    assert!(env.trace().is_empty());

    // `:even` is recorded before the unknown name aborts the check.
    let broken = and([named("even"), named("missing")]);
    assert!(matches!(
        env.conform(&broken, &Value::int(2)),
        Err(SpecError::UnknownSpec { .. })
    ));
    assert!(env.explain(&broken, &Value::int(2)).is_err());
    assert!(env.trace().is_empty());
}

#[test]
fn search_leaves_no_trace() {
    let env = env();
    let tree = call("f", [int(1), call("g", [int(2)])]);
    assert_eq!(env.search(&named("even"), &tree).count(), 0);
    assert!(env.trace().is_empty());
}

#[test]
fn and_records_every_operand() {
    let env = env();
    let spec = and([named("even"), named("positive")]);
    let trace = env.explain(&spec, &Value::int(3)).unwrap();
    assert_eq!(
        trace.lines(),
        vec!["Failed :even, Found: 3", "Passed :positive, Found: 3"]
    );
    assert!(!env.valid(&spec, &Value::int(3)).unwrap());
    assert!(env.valid(&spec, &Value::int(4)).unwrap());
}

#[test]
fn or_and_nand_combine_results() {
    let env = env();
    let either = or([named("even"), named("positive")]);
    assert!(env.valid(&either, &Value::int(3)).unwrap());
    assert!(!env.valid(&either, &Value::int(-3)).unwrap());
    assert_eq!(env.explain(&either, &Value::int(2)).unwrap().len(), 2);

    let not_both = nand([named("even"), named("positive")]);
    assert!(env.valid(&not_both, &Value::int(3)).unwrap());
    assert!(!env.valid(&not_both, &Value::int(2)).unwrap());
}

#[test]
fn empty_combinators() {
    let env = env();
    let v = Value::Nil;
    assert!(env.valid(&and([]), &v).unwrap());
    assert!(!env.valid(&or([]), &v).unwrap());
    assert!(!env.valid(&nand([]), &v).unwrap());
}

#[test]
fn nested_named_specs_trace_inner_first() {
    let env = env();
    env.define("evens", coll_of(named("even"))).unwrap();
    let err = env.conform(&named("evens"), &ints(&[2, 3, 4])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Passed :even, Found: 2\nFailed :even, Found: 3\nFailed :evens, Found: [2 3 4]"
    );
}

#[test]
fn explain_succeeds_on_pass() {
    let env = env();
    let trace = env.explain(&named("even"), &Value::int(2)).unwrap();
    assert_eq!(trace.lines(), vec!["Passed :even, Found: 2"]);
}

#[test]
fn unknown_spec_is_an_error() {
    let env = env();
    let err = env.valid(&named("odd"), &Value::int(1)).unwrap_err();
    assert_eq!(err, SpecError::unknown("odd"));
    assert!(env.explain(&and([named("odd")]), &Value::int(1)).is_err());
}

// collection specs

#[test]
fn coll_of_and_dict_of_are_vacuously_true() {
    let env = env();
    assert!(env.valid(&coll_of(named("even")), &Value::list(vec![])).unwrap());
    assert!(env
        .valid(&dict_of(named("even"), named("even")), &Value::map(vec![]))
        .unwrap());
}

#[test]
fn coll_of_checks_every_element() {
    let env = env();
    let spec = coll_of(named("even"));
    assert!(env.valid(&spec, &ints(&[2, 4])).unwrap());
    assert!(!env.valid(&spec, &ints(&[2, 3])).unwrap());
    assert!(env.valid(&spec, &Value::tuple(vec![Value::int(8)])).unwrap());
    assert!(!env.valid(&spec, &Value::int(2)).unwrap());
}

#[test]
fn dict_of_checks_keys_and_values() {
    let env = env();
    let spec = dict_of(pred("kw?", |v| matches!(v, Value::Keyword(_))), named("int"));
    let good = Value::map(vec![(Value::keyword("a"), Value::int(1))]);
    let bad_key = Value::map(vec![(Value::string("a"), Value::int(1))]);
    let bad_value = Value::map(vec![(Value::keyword("a"), Value::string("1"))]);
    assert!(env.valid(&spec, &good).unwrap());
    assert!(!env.valid(&spec, &bad_key).unwrap());
    assert!(!env.valid(&spec, &bad_value).unwrap());
    assert!(!env.valid(&spec, &ints(&[1])).unwrap());
}

#[test]
fn keys_requires_every_field() {
    let env = env();
    let spec = keys([("x", named("int")), ("y", named("positive"))]);
    let point = Value::record("Point", [("x", Value::int(-1)), ("y", Value::int(2))]);
    let flat = Value::record("Point", [("x", Value::int(1))]);
    assert!(env.valid(&spec, &point).unwrap());
    assert!(!env.valid(&spec, &flat).unwrap());

    let map = Value::map(vec![
        (Value::keyword("x"), Value::int(0)),
        (Value::keyword("y"), Value::int(5)),
    ]);
    assert!(env.valid(&spec, &map).unwrap());
    assert!(!env.valid(&spec, &Value::int(1)).unwrap());
}

#[test]
fn cat_matches_positions_and_length() {
    let env = env();
    let spec = cat([named("even"), named("positive")]);
    assert!(env.valid(&spec, &ints(&[2, 3])).unwrap());
    assert!(!env.valid(&spec, &ints(&[3, 2])).unwrap());
    assert!(!env.valid(&spec, &ints(&[2])).unwrap());
    assert!(!env.valid(&spec, &ints(&[2, 3, 4])).unwrap());
    assert!(!env.valid(&spec, &Value::map(vec![])).unwrap());
}

#[test]
fn modules_and_parameters_read_subcollections() {
    let env = env();
    let with_params = block(Some(vec![(Arc::from("weight"), Value::int(2))]));
    assert!(env.valid(&modules([("encoder", named("even"))]), &with_params).unwrap());
    assert!(!env.valid(&modules([("decoder", named("even"))]), &with_params).unwrap());
    assert!(env.valid(&parameters([("weight", named("even"))]), &with_params).unwrap());
    assert!(!env.valid(&parameters([("weight", named("even"))]), &block(None)).unwrap());
}

#[test]
fn modules_fail_closed_on_plain_values() {
    let env = env();
    let record = Value::record("Block", [("encoder", Value::int(4))]);
    assert!(!env.valid(&modules([("encoder", named("even"))]), &record).unwrap());
    assert!(!env.valid(&parameters([]), &Value::Nil).unwrap());
}

// assert / describe

#[test]
fn assert_respects_the_switch() {
    let env = env();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let spec = pred("never", move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
        false
    });

    env.set_check_asserts(false);
    env.assert(&spec, &Value::Nil).unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), 0);

    env.set_check_asserts(true);
    assert!(env.assert(&spec, &Value::Nil).is_err());
    assert_eq!(calls.load(Ordering::Relaxed), 1);
    env.assert(&named("even"), &Value::int(2)).unwrap();
}

#[test]
fn describe_renders_registered_form() {
    let env = env();
    env.define("evens", coll_of(named("even"))).unwrap();
    env.define("alias", named("evens")).unwrap();
    assert_eq!(env.describe(&named("alias")).unwrap(), "(coll-of :even)");
    assert_eq!(env.describe(&cat([is_int()])).unwrap(), "(cat int?)");
    assert!(env.describe(&named("missing")).is_err());
}

// generation

#[test]
fn generate_requires_a_generator() {
    let env = env();
    let err = env.generate("even", &[]).unwrap_err();
    assert_eq!(
        err,
        SpecError::GeneratorNotDefined {
            name: Arc::from("even")
        }
    );
}

#[test]
fn generated_values_conform_to_the_data_spec() {
    let env = env();
    env.define_gen(
        "even",
        FunctionValue::new("double", |args| {
            Value::int(args.first().and_then(Value::as_int).unwrap_or(0) * 2)
        }),
    );
    for n in [-3, 0, 7] {
        let value = env.generate(":even", &[Value::int(n)]).unwrap();
        assert!(env.valid(&named("even"), &value).unwrap());
    }
}

#[test]
fn generator_output_is_checked() {
    let env = env();
    env.define_gen("even", FunctionValue::new("seven", |_| Value::int(7)));
    let err = env.generate("even", &[]).unwrap_err();
    assert_eq!(err.to_string(), "Failed :even, Found: 7");
}

#[test]
fn generator_without_data_spec_is_unchecked() {
    let env = env();
    env.define_gen("anything", FunctionValue::new("seven", |_| Value::int(7)));
    assert_eq!(env.generate("anything", &[]).unwrap(), Value::int(7));
}

// function specs

fn add() -> FunctionValue {
    FunctionValue::new("add", |args| {
        Value::int(args.iter().filter_map(Value::as_int).sum())
    })
}

#[test]
fn checked_calls() {
    let env = env();
    env.define_fn("add", FnSpec::new(cat([named("int"), named("int")])).returns(named("even")));

    assert!(env.valid_call("add", &[Value::int(1), Value::int(2)]).unwrap());
    assert!(!env.valid_call("add", &[Value::int(1)]).unwrap());
    assert_eq!(
        env.conform_call("add", &[Value::int(1), Value::int(1)]).unwrap(),
        vec![Value::int(1), Value::int(1)]
    );

    assert_eq!(env.call(&add(), &[Value::int(1), Value::int(3)]).unwrap(), Value::int(4));
    let err = env.call(&add(), &[Value::int(1), Value::int(2)]).unwrap_err();
    assert_eq!(err.to_string(), "Failed :even, Found: 3");
    let err = env.call(&add(), &[Value::string("1"), Value::int(2)]).unwrap_err();
    assert_eq!(err.to_string(), "Failed :int, Found: \"1\"");
}

#[test]
fn calls_without_function_spec_fail() {
    let env = env();
    assert_eq!(
        env.valid_call("add", &[]).unwrap_err(),
        SpecError::unknown("add")
    );
    assert!(env.call(&add(), &[]).is_err());
}

// trees

fn model() -> Expr {
    call(
        "seq",
        [
            call("sigmoid", [call("linear", [sym("a"), sym("b")])]),
            call("relu", [sym("x")]),
            call("sigmoid", [sym("y")]),
        ],
    )
}

#[test]
fn search_yields_matching_subtrees_lazily() {
    let env = env();
    let expander = Expander::new();
    let spec = pattern(&expander, &call("sigmoid", [typed("models")])).unwrap();
    let hits: Vec<Expr> = env.search(&spec, &model()).collect::<SpecResult<_>>().unwrap();
    assert_eq!(
        hits,
        vec![
            call("sigmoid", [call("linear", [sym("a"), sym("b")])]),
            call("sigmoid", [sym("y")]),
        ]
    );

    let tree = model();
    let mut lazy = env.search(&spec, &tree);
    assert!(lazy.next().is_some());
}

#[test]
fn search_with_named_specs() {
    let env = env();
    env.define("symbol", pred("symbol?", |v| v.as_expr().is_some_and(|e| e.as_symbol().is_some())))
        .unwrap();
    let tree = call("f", [sym("x"), int(1)]);
    let hits: Vec<Expr> = env
        .search(&named("symbol"), &tree)
        .collect::<SpecResult<_>>()
        .unwrap();
    assert_eq!(hits, vec![sym("f"), sym("x")]);
}

#[test]
fn search_reports_unknown_specs() {
    let env = env();
    let tree = sym("x");
    let first = env.search(&named("missing"), &tree).next();
    assert!(matches!(first, Some(Err(SpecError::UnknownSpec { .. }))));
}

#[test]
fn replace_rewrites_innermost_first() {
    let env = env();
    let expander = Expander::new();
    let spec = pattern(&expander, &call("sigmoid", [typed("Symbol")])).unwrap();
    let tree = call("sigmoid", [call("sigmoid", [sym("x")])]);
    let out = env.replace(&spec, &tree, &sym("s")).unwrap();
    assert_eq!(out, sym("s"));

    let out = env.replace(&spec, &model(), &call0("act")).unwrap();
    assert_eq!(
        out,
        call(
            "seq",
            [
                call("sigmoid", [call("linear", [sym("a"), sym("b")])]),
                call("relu", [sym("x")]),
                call0("act"),
            ],
        )
    );
}

#[test]
fn pattern_specs_reject_non_expressions() {
    let env = env();
    let spec = pattern(&Expander::new(), &typed("models")).unwrap();
    assert!(env.valid(&spec, &Value::expr(sym("x"))).unwrap());
    assert!(!env.valid(&spec, &Value::int(1)).unwrap());
}
