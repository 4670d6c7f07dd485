use log::debug;

use crate::chip::profile::{ChipModel, ChipProfile, PROFILES};
use crate::prelude::{Diagnostic, DiagnosticKind, Extraction};

/// Classifies export text into one of the supported chip profiles.
pub struct ChipDetector;

impl ChipDetector {
    /// Scans the concatenated parameter and program exports.
    pub fn detect(parameter: &str, program: &str) -> Extraction<&'static ChipProfile> {
        let combined = format!("{}\n{}", parameter, program);
        Self::detect_in(&combined)
    }

    pub fn detect_in(text: &str) -> Extraction<&'static ChipProfile> {
        let matched: Vec<&'static ChipProfile> = PROFILES
            .iter()
            .filter(|profile| {
                profile
                    .signatures
                    .iter()
                    .any(|signature| text.contains(signature))
            })
            .collect();

        let Some(selected) = matched.first().copied() else {
            let fallback = ChipModel::DEFAULT.profile();
            return Extraction::with_diagnostics(
                fallback,
                vec![Diagnostic::warning(
                    DiagnosticKind::UnrecognizedChip,
                    format!("no specific chip detected, defaulting to {}", fallback.name),
                )],
            );
        };

        let mut diagnostics = Vec::new();
        if matched.len() > 1 {
            let names: Vec<&str> = matched.iter().map(|profile| profile.name).collect();
            diagnostics.push(Diagnostic::warning(
                DiagnosticKind::Note,
                format!(
                    "multiple chips detected ({}), using {}",
                    names.join(", "),
                    selected.name
                ),
            ));
        }
        debug!("chip detected: {}", selected.name);
        diagnostics.push(Diagnostic::note(format!("{} chip detected", selected.name)));
        Extraction::with_diagnostics(selected, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::Severity;

    #[test]
    fn each_signature_selects_its_profile() {
        for profile in PROFILES.iter() {
            for signature in profile.signatures {
                let text = format!("/* Description: {} export */", signature);
                let result = ChipDetector::detect_in(&text);
                assert_eq!(result.value.model, profile.model, "signature {}", signature);
                assert!(result
                    .diagnostics
                    .iter()
                    .all(|diag| diag.severity != Severity::Warning));
            }
        }
    }

    #[test]
    fn unknown_text_falls_back_with_warning() {
        let result = ChipDetector::detect("#define FOO_COUNT 1", "#define BAR 2");
        assert_eq!(result.value.model, ChipModel::Adau1701);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnrecognizedChip);
        assert!(!result.diagnostics[0].is_fatal());
    }

    #[test]
    fn ambiguous_text_prefers_earliest_profile() {
        let result = ChipDetector::detect("ADAU1701 params", "ADAU1452 program");
        assert_eq!(result.value.model, ChipModel::Adau1452);
        assert!(result
            .diagnostics
            .iter()
            .any(|diag| diag.severity == Severity::Warning && diag.message.contains("ADAU1701")));
        assert!(result
            .diagnostics
            .iter()
            .all(|diag| diag.kind != DiagnosticKind::UnrecognizedChip));
    }

    #[test]
    fn signature_may_come_from_program_export_alone() {
        let result = ChipDetector::detect("", "* Description: ADAU1702 program data.");
        assert_eq!(result.value.model, ChipModel::Adau1702);
    }
}
