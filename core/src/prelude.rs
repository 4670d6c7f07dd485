use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chip::ChipProfile;

/// Role an export document plays in a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    Parameter,
    Program,
    EepromProgram,
    EepromHex,
}

impl DocumentRole {
    pub fn is_required(self) -> bool {
        matches!(self, DocumentRole::Parameter | DocumentRole::Program)
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentRole::Parameter => "parameter file",
            DocumentRole::Program => "program file",
            DocumentRole::EepromProgram => "EEPROM program file",
            DocumentRole::EepromHex => "EEPROM hex file",
        }
    }
}

/// Raw text of one loaded export artifact.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    origin: String,
    text: String,
}

impl SourceDocument {
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Outcome of locating one document, as handed over by the file finder.
#[derive(Debug, Clone)]
pub enum DocumentSlot {
    Loaded(SourceDocument),
    /// Several candidates existed; one was picked by preference.
    Resolved {
        document: SourceDocument,
        candidates: Vec<String>,
    },
    NotFound,
    /// Located but could not be read; carries the reason.
    Unreadable(String),
    Ambiguous(Vec<String>),
}

impl DocumentSlot {
    pub fn document(&self) -> Option<&SourceDocument> {
        match self {
            DocumentSlot::Loaded(document) | DocumentSlot::Resolved { document, .. } => {
                Some(document)
            }
            DocumentSlot::NotFound | DocumentSlot::Unreadable(_) | DocumentSlot::Ambiguous(_) => None,
        }
    }
}

/// The four export documents of one project.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub parameter: DocumentSlot,
    pub program: DocumentSlot,
    pub eeprom_program: DocumentSlot,
    pub eeprom_hex: DocumentSlot,
}

impl ExportBundle {
    pub fn slots(&self) -> [(DocumentRole, &DocumentSlot); 4] {
        [
            (DocumentRole::Parameter, &self.parameter),
            (DocumentRole::Program, &self.program),
            (DocumentRole::EepromProgram, &self.eeprom_program),
            (DocumentRole::EepromHex, &self.eeprom_hex),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn is_fatal(self) -> bool {
        self == Severity::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MissingRequiredDocument,
    AmbiguousCandidate,
    InvalidDocumentContent,
    UnrecognizedChip,
    NonStandardAddressValue,
    OptionalDocumentAbsent,
    PersistenceFailure,
    /// Informational progress note, never fatal.
    Note,
}

/// A single entry of the diagnostics list surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Note, Severity::Info, message)
    }

    pub fn is_fatal(&self) -> bool {
        self.severity.is_fatal()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// Value produced by a pure extraction together with the diagnostics it raised.
#[derive(Debug, Clone)]
pub struct Extraction<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Extraction<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }
}

/// Input shared by every extraction stage.
#[derive(Debug, Clone, Copy)]
pub struct StageInput<'a> {
    pub parameter: &'a str,
    pub program: &'a str,
    pub eeprom_program: Option<&'a str>,
    pub eeprom_hex: Option<&'a str>,
    pub profile: &'a ChipProfile,
}

/// Fragment produced by a stage, one output line per entry.
#[derive(Debug, Clone, Default)]
pub struct StageOutput {
    pub lines: Vec<String>,
    pub metadata: StageMetadata,
}

impl StageOutput {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Bookkeeping used for chaining stages and telemetry.
#[derive(Debug, Clone, Default)]
pub struct StageMetadata {
    pub diagnostics: Vec<Diagnostic>,
    pub notes: Vec<String>,
    pub blocks_opened: usize,
    pub blocks_closed: usize,
    pub data_lines: usize,
    pub symbol_count: usize,
}

/// Stage-level failure.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Fatal outcome of a generation run.
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("generation aborted with {} fatal diagnostic(s)", count_fatal(.diagnostics))]
    Aborted { diagnostics: Vec<Diagnostic> },
    #[error("stage `{stage}` failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: StageError,
    },
}

impl GenerationError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            GenerationError::Aborted { diagnostics } => diagnostics,
            GenerationError::Stage { .. } => &[],
        }
    }
}

fn count_fatal(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|diag| diag.is_fatal()).count()
}

/// Trait implemented by every extractor feeding the header assembler.
pub trait ExtractionStage {
    fn name(&self) -> &'static str;
    fn execute(&self, input: &StageInput<'_>) -> StageResult<StageOutput>;
}
