use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr so events never interleave with prompts.
///
/// Only warnings are emitted unless `verbose` is set. `RUST_LOG` directives
/// are applied on top.
pub fn init_logging(verbose: bool) {
    let directive = if verbose { "inkcal=debug" } else { "inkcal=warn" };

    let filter = match directive.parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();
}
