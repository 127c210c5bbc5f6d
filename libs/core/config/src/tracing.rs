use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, Layer, Registry, prelude::*};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install color-eyre for the binary's top-level error reports.
///
/// A second install is ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Levels used when `RUST_LOG` is unset
fn default_directives(environment: &Environment) -> &'static str {
    match environment {
        Environment::Production => "info,tower_http=info,mongodb=warn",
        Environment::Development => "debug,tower_http=debug,mongodb=info",
    }
}

fn output_layer(environment: &Environment) -> BoxedLayer {
    let layer = tracing_subscriber::fmt::layer().with_target(false);
    match environment {
        Environment::Production => layer.json().flatten_event(true).boxed(),
        Environment::Development => layer
            .with_file(false)
            .with_line_number(false)
            .pretty()
            .boxed(),
    }
}

/// Install the global subscriber.
///
/// Production writes flattened JSON lines, development pretty-prints. Both
/// carry `tracing_error::ErrorLayer` so `eyre` reports include span traces.
/// Later calls leave the first subscriber in place, which keeps tests that
/// initialize tracing independent of each other.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));

    let installed = tracing_subscriber::registry()
        .with(output_layer(environment))
        .with(tracing_error::ErrorLayer::default())
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!(?environment, "Tracing initialized");
    } else {
        debug!("Tracing already initialized");
    }
}
