use std::path::Path;

use anyhow::Context;
use clap::Parser;
use datacheck::{
    settings,
    trace::{get_subscriber, init_subscriber, stdout, TraceSettings},
    Application, Settings,
};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file, layered under the environment
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    settings::load_env_file(Path::new(".env")).context("failed to load .env file")?;

    let settings = Settings::load(cli.config.as_deref()).context("failed to load configuration")?;

    let subscriber = get_subscriber(TraceSettings {
        level: settings.log.level,
        writer: stdout(),
        endpoint: settings.log.endpoint.as_deref(),
        namespace: settings.log.namespace.as_deref(),
    })?;
    init_subscriber(subscriber)?;

    let application = Application::build(settings)
        .await
        .context("failed to build application")?;
    application.run_until_stopped().await?;

    opentelemetry::global::shutdown_tracer_provider();
    Ok(())
}
