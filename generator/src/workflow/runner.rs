use crate::discovery::finder::{Candidate, FileFinder};
use crate::discovery::project::discover_project_name;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use sigmacore::chip::ChipModel;
use sigmacore::prelude::{DocumentSlot, ExportBundle, SourceDocument};
use sigmacore::telemetry::{GenerationMetrics, LogManager};
use sigmacore::{generate, Diagnostic, DiagnosticKind, GenerationError, GenerationRequest};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What a run produced, in a form suitable for `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub project: String,
    pub chip: ChipModel,
    pub output: PathBuf,
    pub metrics: GenerationMetrics,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub enum RunOutcome {
    Generated(RunSummary),
    Aborted(Vec<Diagnostic>),
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the banner timestamp in the given zone.
pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn read_document(path: &Path) -> anyhow::Result<SourceDocument> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(SourceDocument::new(
        path.display().to_string(),
        String::from_utf8_lossy(&bytes).into_owned(),
    ))
}

fn display_all(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|path| path.display().to_string()).collect()
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    fn load_slot(&self, candidate: Candidate) -> DocumentSlot {
        let load = |path: &Path| read_document(path).map_err(|err| format!("{:#}", err));
        match candidate {
            Candidate::Unique(path) => match load(&path) {
                Ok(document) => DocumentSlot::Loaded(document),
                Err(reason) => DocumentSlot::Unreadable(reason),
            },
            Candidate::Preferred { chosen, all } => match load(&chosen) {
                Ok(document) => DocumentSlot::Resolved {
                    document,
                    candidates: display_all(&all),
                },
                Err(reason) => DocumentSlot::Unreadable(reason),
            },
            Candidate::Ambiguous(all) => DocumentSlot::Ambiguous(display_all(&all)),
            Candidate::Missing => DocumentSlot::NotFound,
        }
    }

    /// Finds and loads the four export documents plus the project name.
    pub fn locate(&self) -> anyhow::Result<(String, ExportBundle)> {
        let root = self.config.input_dir.as_path();
        let finder = FileFinder::new(
            root,
            &self.config.export_dir_name,
            &self.config.excluded_dir_name,
        )
        .with_context(|| format!("scanning project directory {}", root.display()))?;

        let project_name = match &self.config.project_name {
            Some(name) => name.clone(),
            None => discover_project_name(finder.listing(), root, &self.config.excluded_dir_name),
        };

        let patterns = &self.config.patterns;
        let slot = |pattern: &str| self.load_slot(finder.find(pattern));
        let bundle = ExportBundle {
            parameter: slot(&patterns.parameter),
            program: slot(&patterns.program),
            eeprom_program: slot(&patterns.eeprom_program),
            eeprom_hex: slot(&patterns.eeprom_hex),
        };
        Ok((project_name, bundle))
    }

    pub fn execute(&self) -> anyhow::Result<RunOutcome> {
        let logger = LogManager::new();
        let (project_name, documents) = self.locate()?;
        let mut diagnostics = Vec::new();
        log::info!("project name: {}", project_name);

        let timestamp = self
            .config
            .timestamp
            .clone()
            .unwrap_or_else(|| format_timestamp(&Local::now()));

        let request = GenerationRequest {
            project_name: project_name.clone(),
            timestamp,
            documents,
        };
        let report = match generate(&request) {
            Ok(report) => report,
            Err(GenerationError::Aborted {
                diagnostics: fatal,
            }) => {
                diagnostics.extend(fatal);
                logger.record_all(&diagnostics);
                return Ok(RunOutcome::Aborted(diagnostics));
            }
            Err(err) => return Err(err).context("assembling header"),
        };
        diagnostics.extend(report.diagnostics);

        let output = self.config.output_path();
        if let Err(err) = write_output(&output, &report.document.text) {
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::PersistenceFailure,
                format!("{:#}", err),
            ));
            logger.record_all(&diagnostics);
            return Ok(RunOutcome::Aborted(diagnostics));
        }
        logger.record_all(&diagnostics);

        Ok(RunOutcome::Generated(RunSummary {
            project: project_name,
            chip: report.document.chip,
            output,
            metrics: report.document.metrics,
            diagnostics,
        }))
    }
}

fn write_output(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}
