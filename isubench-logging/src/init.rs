use anyhow::Result;
use isubench_config::{LogFormat, LoggingConfig};
use tracing::Metadata;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::audience::CONTESTANT;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging from configuration, routing each audience to its stream
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(config.level.as_str())
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Use try_init to avoid panic if global subscriber already set
    if tracing_subscriber::registry()
        .with(audience_layers(config))
        .with(env_filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Initialize simple tracing for basic console output
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

fn is_contestant(meta: &Metadata<'_>) -> bool {
    meta.target() == CONTESTANT
}

fn is_operator(meta: &Metadata<'_>) -> bool {
    !is_contestant(meta)
}

fn contestant_layer(format: LogFormat) -> BoxedLayer {
    let layer = fmt::layer().with_writer(std::io::stdout);
    match format {
        LogFormat::Json => layer.json().with_filter(filter_fn(is_contestant)).boxed(),
        LogFormat::Compact => layer
            .compact()
            .with_target(false)
            .with_filter(filter_fn(is_contestant))
            .boxed(),
        LogFormat::Text => layer.with_target(false).with_filter(filter_fn(is_contestant)).boxed(),
    }
}

fn operator_layer(format: LogFormat) -> BoxedLayer {
    let layer = fmt::layer().with_writer(std::io::stderr);
    match format {
        LogFormat::Json => layer.json().with_filter(filter_fn(is_operator)).boxed(),
        LogFormat::Compact => layer.compact().with_filter(filter_fn(is_operator)).boxed(),
        LogFormat::Text => layer.with_thread_ids(true).with_filter(filter_fn(is_operator)).boxed(),
    }
}

/// stdout for the contestant, stderr for the operator when enabled
fn audience_layers(config: &LoggingConfig) -> Vec<BoxedLayer> {
    let mut layers = vec![contestant_layer(config.format)];
    if config.operator_log {
        layers.push(operator_layer(config.format));
    }
    layers
}
