pub mod build_info;
pub mod paths;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "propflow_core=info";

/// Installs the global tracing subscriber. `RUST_LOG` directives take precedence
/// over the crate default; repeated calls are ignored.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        // A subscriber may already be installed by an embedding application.
        let _ = fmt().with_env_filter(filter).with_target(false).try_init();
    });
}
