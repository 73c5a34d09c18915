//! Command-line interface.

use clap::Parser;
use gemini_adapter::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Convert the PDF files in a folder to JSON with Google Gemini.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder containing the PDF files to process
    #[arg(long = "inputPDF", default_value = "input")]
    pub input_pdf: PathBuf,

    /// Folder where the JSON files are written
    #[arg(long = "outputJSON", default_value = "output")]
    pub output_json: PathBuf,

    /// .json or .txt file holding the JSON structure the model must fill
    #[arg(long = "json-template")]
    pub json_template: Option<PathBuf>,

    /// Let the model choose the JSON structure instead of using a template
    #[arg(long = "no-json-template")]
    pub no_json_template: bool,

    /// One or more Gemini API keys, comma-separated (api_key.txt takes precedence)
    #[arg(long)]
    pub api: Option<String>,

    /// File with one API key per line (default: api_key.txt next to the executable)
    #[arg(long = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// Gemini model to use
    #[arg(long = "model-name", default_value = DEFAULT_MODEL)]
    pub model_name: String,

    /// Per-request timeout in seconds
    #[arg(long = "timeout-secs", default_value_t = 120)]
    pub timeout_secs: u64,

    /// Same-key retries after a network error before moving to the next key
    #[arg(long = "transient-retries", default_value_t = 0)]
    pub transient_retries: usize,

    /// API base URL
    #[arg(long = "base-url", default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// How the prompt's JSON structure is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateChoice {
    /// The model infers the structure.
    Freeform,
    /// The structure is read from this file.
    File(PathBuf),
}

impl Cli {
    /// Resolves `--json-template` / `--no-json-template`.
    ///
    /// `--no-json-template` wins when both are given.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when neither flag is given.
    pub fn template_choice(&self) -> Result<TemplateChoice, AppError> {
        match (&self.json_template, self.no_json_template) {
            (Some(path), true) => {
                tracing::warn!(
                    template = %path.display(),
                    "--no-json-template is set; ignoring --json-template"
                );
                Ok(TemplateChoice::Freeform)
            }
            (None, true) => Ok(TemplateChoice::Freeform),
            (Some(path), false) => Ok(TemplateChoice::File(path.clone())),
            (None, false) => Err(AppError::Config(
                "No JSON template given. Use --json-template <file> or --no-json-template".into(),
            )),
        }
    }

    /// The per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
