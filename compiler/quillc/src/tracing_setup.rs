//! Tracing subscriber for the driver. Library crates only emit events.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber, once. Nothing is installed unless `RUST_LOG`
/// is set; `QUILL_LOG_TREE=1` selects the indented span tree.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let tree = std::env::var("QUILL_LOG_TREE").is_ok_and(|v| v == "1");

        let flat = (!tree).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
        });
        let nested = tree.then(|| {
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_indent_lines(true)
        });

        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(flat)
            .with(nested)
            .init();
    });
}
