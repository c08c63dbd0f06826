//! Hyt - threading macros, tree search and runtime specs.
//!
//! This crate re-exports the workspace crates under one roof:
//!
//! | Module       | Crate          | Provides |
//! |--------------|----------------|----------|
//! | [`ir`]       | `hyt_ir`       | expression trees and builders |
//! | [`expand`]   | `hyt_expand`   | the expander and the thread macros |
//! | [`patterns`] | `hyt_patterns` | linearize, match, find, refactor |
//! | [`spec`]     | `hyt_spec`     | values, specs, the spec environment |
//!
//! and adds the process-level pieces: [`init_tracing`] and [`Config`].
//!
//! ```
//! use hyt::ir::build::{call, call0, sym, typed};
//! use hyt::{expand::Expander, patterns::matches};
//!
//! let model = call("->", [sym("x"), call0("linear"), call0("sigmoid")]);
//! let model = Expander::new().expand(&model).unwrap();
//! assert!(matches(&model, &call("sigmoid", [typed("models")])));
//! ```

use std::sync::Once;

mod config;

pub use config::{Config, ConfigError, CHECK_ASSERTS_VAR, FIND_LIMIT_VAR};

pub use hyt_expand as expand;
pub use hyt_ir as ir;
pub use hyt_patterns as patterns;
pub use hyt_spec as spec;

pub use hyt_expand::Expander;
pub use hyt_ir::{Expr, ExprError};
pub use hyt_spec::{Spec, SpecEnv, SpecError, Value};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debugging.
///
/// Call this at the start of a program or test to enable tracing output.
/// Uses `RUST_LOG` for filtering (e.g. `RUST_LOG=hyt_expand=debug`).
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
