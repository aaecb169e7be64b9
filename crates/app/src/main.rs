use backend::HttpBackend;
use clap::Parser;
use engine::Engine;
use settings::{BackendKind, Settings};

use crate::{
    cli::Cli,
    error::{AppError, Result},
};

mod cli;
mod commands;
mod error;
mod local;
mod settings;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(&cli.global)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "tally={level},engine={level},backend={level}",
            level = settings.level
        ))
        .init();

    match settings.backend {
        BackendKind::Hosted => {
            tracing::debug!(base_url = %settings.base_url, "using hosted backend");
            if settings.project_id.is_empty() || settings.public_key.is_empty() {
                return Err(AppError::InvalidInput(
                    "hosted backend needs TALLY_PROJECT_ID and TALLY_PUBLIC_KEY".to_string(),
                ));
            }
            let backend = HttpBackend::builder()
                .base_url(&settings.base_url)
                .project(&settings.project_id, &settings.public_key)
                .build()?;
            let engine = Engine::builder().backend(backend).build()?;
            commands::run(&engine, cli.command).await
        }
        BackendKind::Local => {
            tracing::debug!(path = %settings.state_path.display(), "using local store");
            let store = local::open(&settings.state_path)?;
            let engine = Engine::builder().backend(store).build()?;
            let result = commands::run(&engine, cli.command).await;
            local::close(engine.backend(), &settings.state_path)?;
            result
        }
    }
}
