use hyt_ir::build::sym;

use super::*;

struct Identity;

impl MacroDefinition for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn expand(&self, expander: &Expander, operands: &[Expr]) -> ExprResult {
        match operands {
            [only] => expander.expand(only),
            _ => Err(ExprError::malformed("identity takes one form")),
        }
    }
}

#[test]
fn registry_has_all_thread_macros() {
    let registry = MacroRegistry::new();
    assert_eq!(registry.len(), 10);
    for name in [
        "->", "->>", "*->", "*->>", "|->", "|->>", "set->", "set->>", "cond->", "cond->>",
    ] {
        let definition = registry.get(name);
        assert!(definition.is_some(), "missing {name}");
        assert_eq!(definition.map(MacroDefinition::name), Some(name));
    }
    assert!(registry.get("-->").is_none());
}

#[test]
fn thread_macro_policies() {
    let registry = MacroRegistry::new();
    assert_eq!(
        MacroRegistry::builtin("*->>").map(|m| (m.policy(), m.position())),
        Some((Policy::Broadcast, Position::Last))
    );
    assert_eq!(
        MacroRegistry::builtin("cond->").map(|m| (m.policy(), m.position())),
        Some((Policy::Conditional, Position::First))
    );
    assert!(registry.contains("set->"));
}

#[test]
fn user_macros_register_and_unregister() {
    let mut registry = MacroRegistry::new();
    registry.register(Arc::new(Identity));
    assert!(registry.contains("identity"));
    assert_eq!(registry.len(), 11);

    let expander = Expander::new();
    let expanded = registry
        .get("identity")
        .map(|definition| definition.expand(&expander, &[sym("x")]));
    assert_eq!(expanded, Some(Ok(sym("x"))));

    assert!(registry.unregister("identity"));
    assert!(!registry.unregister("identity"));
    assert!(!registry.unregister("->"));
    assert!(registry.contains("->"));
}
