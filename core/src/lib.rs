//! Extraction and assembly core for the SigmaDSP parameter generator.
//!
//! Turns SigmaStudio export headers (parameter, program and optional EEPROM
//! exports) into a single `SigmaDSP_parameters.h` for the SigmaDSP driver.
//! Everything here is a pure transform over in-memory text; locating,
//! reading and writing files is left to the caller.

pub mod assemble;
pub mod chip;
pub mod extract;
pub mod prelude;
pub mod telemetry;
pub mod text;

pub use assemble::{generate, GenerationReport, GenerationRequest};
pub use prelude::{Diagnostic, DiagnosticKind, ExtractionStage, GenerationError, Severity};
