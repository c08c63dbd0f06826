use pretty_assertions::assert_eq;

use super::*;

#[test]
fn supplied_values_win_over_defaults() {
    let components = [
        ComponentSpec::required("encoder"),
        ComponentSpec::with_default("dropout", Value::float(0.1)),
    ];
    let bound = bind_components(
        &components,
        &[("dropout", Value::float(0.5)), ("encoder", Value::string("linear"))],
    )
    .unwrap();
    assert_eq!(
        bound,
        vec![
            (Arc::<str>::from("encoder"), Value::string("linear")),
            (Arc::<str>::from("dropout"), Value::float(0.5)),
        ]
    );
}

#[test]
fn defaults_fill_missing_components() {
    let components = [ComponentSpec::with_default("dropout", Value::float(0.1))];
    let bound = bind_components(&components, &[]).unwrap();
    assert_eq!(bound[0].1, Value::float(0.1));
}

#[test]
fn missing_required_component_fails() {
    let components = [
        ComponentSpec::required("encoder"),
        ComponentSpec::required("decoder"),
    ];
    let err = bind_components(&components, &[("encoder", Value::Nil)]).unwrap_err();
    assert_eq!(
        err,
        SpecError::MissingComponent {
            name: Arc::from("decoder")
        }
    );
    assert_eq!(err.to_string(), "missing component `decoder` with no default");
}

#[test]
fn undeclared_components_are_ignored() {
    let bound = bind_components(&[], &[("extra", Value::int(1))]).unwrap();
    assert!(bound.is_empty());
}
