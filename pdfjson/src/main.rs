//! The pdfjson binary converts a folder of PDFs to JSON with Google Gemini.

use clap::Parser;
use gemini_adapter::{GeminiClient, GeminiConfig};
use pdfjson::credentials::{load_credentials, resolve_key_file};
use pdfjson::{
    AppError, BatchDriver, BatchJob, BatchSummary, Cli, PdfTextReader, TemplateChoice,
    EXIT_CONFIG_ERROR,
};
use pdfjson_extraction::prelude::*;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(summary) => ExitCode::from(summary.exit_code()),
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

async fn run(cli: Cli) -> Result<BatchSummary, AppError> {
    let template = match cli.template_choice()? {
        TemplateChoice::Freeform => {
            tracing::info!("No template: the model will choose the JSON structure");
            None
        }
        TemplateChoice::File(path) => {
            let template = Template::load(&path)?;
            tracing::info!("Using JSON structure from template {}", path.display());
            Some(template)
        }
    };

    let key_file = resolve_key_file(cli.api_key_file.as_deref())?;
    let credentials = load_credentials(key_file.as_deref(), cli.api.as_deref())?;

    tracing::info!("Initializing Gemini client for model '{}'...", cli.model_name);
    let gemini = GeminiClient::new(
        GeminiConfig::default()
            .with_base_url(cli.base_url.clone())
            .with_timeout(cli.timeout()),
    )?;
    let controller = RotationController::new(
        RotationConfig::default().with_transient_retries(cli.transient_retries),
    );
    let driver = BatchDriver::new(GeminiExtractionClient::new(gemini), PdfTextReader)
        .with_controller(controller);

    let job = BatchJob {
        input_dir: cli.input_pdf,
        output_dir: cli.output_json,
        template,
        credentials,
        model: cli.model_name,
    };
    driver.run(&job).await
}
