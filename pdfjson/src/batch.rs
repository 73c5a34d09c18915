//! Folder-level driver: one extraction per PDF, one JSON file per success.

use pdfjson_extraction::prelude::*;
use pdfjson_extraction::build_instruction;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::errors::AppError;
use crate::output::{write_atomic, write_json_atomic};
use crate::reader::{DocumentReader, ReadError};
use crate::{EXIT_DOCUMENT_FAILED, EXIT_OK};

/// Why one document produced no output.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The PDF text could not be extracted.
    #[error(transparent)]
    Unreadable(#[from] ReadError),

    /// Rotation ended without a JSON result.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// An earlier input in the same run already maps to this output file.
    #[error("{} would overwrite the output of {}", .output.display(), .first.display())]
    DuplicateOutput {
        /// The shared output path.
        output: PathBuf,
        /// The input that claimed it first.
        first: PathBuf,
    },

    /// The JSON result could not be saved.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Everything one run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Folder scanned for `.pdf` files.
    pub input_dir: PathBuf,
    /// Folder receiving `<name>.json` files; created if missing.
    pub output_dir: PathBuf,
    /// Shape the model must fill, or `None` for a model-chosen structure.
    pub template: Option<Template>,
    /// Keys to rotate through, shared read-only by every document.
    pub credentials: Credentials,
    /// Model identifier.
    pub model: String,
}

/// A document that was skipped.
#[derive(Debug)]
pub struct FailedDocument {
    /// The input PDF.
    pub input: PathBuf,
    /// What went wrong.
    pub error: DocumentError,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Output files written, in processing order.
    pub written: Vec<PathBuf>,
    /// Documents that produced no output.
    pub failed: Vec<FailedDocument>,
}

impl BatchSummary {
    /// Number of documents processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    /// `0` when every document succeeded, `1` otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.failed.is_empty() {
            EXIT_OK
        } else {
            EXIT_DOCUMENT_FAILED
        }
    }

    /// Logs the final succeeded / failed report.
    pub fn log(&self) {
        tracing::info!(
            "Done: {} succeeded, {} failed, {} total",
            self.written.len(),
            self.failed.len(),
            self.total()
        );
        for failed in &self.failed {
            tracing::warn!("Skipped {}: {}", file_name(&failed.input), failed.error);
        }
    }
}

/// Sequential batch driver.
pub struct BatchDriver<C, R> {
    client: C,
    reader: R,
    controller: RotationController,
}

impl<C: ExtractionClient, R: DocumentReader> BatchDriver<C, R> {
    /// Creates a driver with the default rotation policy.
    pub fn new(client: C, reader: R) -> Self {
        Self {
            client,
            reader,
            controller: RotationController::default(),
        }
    }

    /// Replaces the rotation controller.
    #[must_use]
    pub fn with_controller(mut self, controller: RotationController) -> Self {
        self.controller = controller;
        self
    }

    /// Processes every PDF in `job.input_dir`, in file-name order.
    ///
    /// A failing document is logged and skipped; the batch continues.
    ///
    /// # Errors
    ///
    /// Returns `AppError` only for problems that prevent the batch from
    /// starting: a missing input folder or an uncreatable output folder.
    pub async fn run(&self, job: &BatchJob) -> Result<BatchSummary, AppError> {
        if !job.input_dir.is_dir() {
            return Err(AppError::Config(format!(
                "Input folder '{}' does not exist",
                job.input_dir.display()
            )));
        }
        std::fs::create_dir_all(&job.output_dir)?;

        let pdfs = list_pdfs(&job.input_dir)?;
        let mut summary = BatchSummary::default();
        if pdfs.is_empty() {
            tracing::info!("No PDF files found in '{}'", job.input_dir.display());
            summary.log();
            return Ok(summary);
        }

        tracing::info!(
            model = %job.model,
            keys = job.credentials.len(),
            templated = job.template.is_some(),
            "Found {} PDF file(s) to process",
            pdfs.len()
        );

        // `a.pdf` and `a.PDF` both map to `a.json`; the first one wins
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();
        for (n, pdf) in pdfs.into_iter().enumerate() {
            tracing::info!("[{}] Processing {}", n + 1, file_name(&pdf));
            let stem = output_stem(&pdf);
            let outcome = match claimed.get(&stem).cloned() {
                Some(first) => Err(DocumentError::DuplicateOutput {
                    output: job.output_dir.join(format!("{stem}.json")),
                    first,
                }),
                None => {
                    claimed.insert(stem.clone(), pdf.clone());
                    self.process(&pdf, &stem, job).await
                }
            };
            match outcome {
                Ok(written) => {
                    tracing::info!("Saved {}", written.display());
                    summary.written.push(written);
                }
                Err(error) => {
                    tracing::error!("Failed {}: {error}", file_name(&pdf));
                    summary.failed.push(FailedDocument { input: pdf, error });
                }
            }
        }

        summary.log();
        Ok(summary)
    }

    async fn process(
        &self,
        pdf: &Path,
        stem: &str,
        job: &BatchJob,
    ) -> Result<PathBuf, DocumentError> {
        let json_path = job.output_dir.join(format!("{stem}.json"));

        let text = self.reader.read_text(pdf)?;
        if text.trim().is_empty() {
            tracing::warn!(
                "{} has no extractable text (scanned image?); sending it anyway",
                file_name(pdf)
            );
        }

        let instruction = build_instruction(&text, job.template.as_ref());
        match self
            .controller
            .run(&self.client, &job.credentials, &instruction, &job.model)
            .await
        {
            Ok((value, metrics)) => {
                tracing::debug!(
                    attempts = metrics.total_attempts,
                    keys_tried = metrics.credentials_tried,
                    wall_ms = u64::try_from(metrics.wall_time.as_millis()).unwrap_or(u64::MAX),
                    est_input_tokens = metrics.estimated_input_tokens,
                    est_output_tokens = metrics.estimated_output_tokens,
                    "Extraction metrics"
                );
                write_json_atomic(&json_path, &value).map_err(|source| DocumentError::Write {
                    path: json_path.clone(),
                    source,
                })?;
                Ok(json_path)
            }
            Err(error) => {
                if let Some(raw) = error.raw_output() {
                    let error_path = job.output_dir.join(format!("{stem}.json.error.txt"));
                    match write_atomic(&error_path, raw.as_bytes()) {
                        Ok(()) => tracing::info!("Raw model reply saved to {}", error_path.display()),
                        Err(e) => tracing::warn!("Could not save raw reply: {e}"),
                    }
                }
                Err(error.into())
            }
        }
    }
}

/// PDF files directly inside `dir`, sorted by file name.
///
/// The `.pdf` extension is matched case-insensitively.
pub fn list_pdfs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

fn output_stem(pdf: &Path) -> String {
    pdf.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
