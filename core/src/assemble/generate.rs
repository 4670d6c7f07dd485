//! Whole-run entry point: document checks, chip detection, assembly.

use log::debug;

use crate::assemble::header::{guard_name, GeneratedDocument, HeaderAssembler, INCLUDE_DIRECTIVE};
use crate::chip::ChipDetector;
use crate::prelude::{
    Diagnostic, DiagnosticKind, DocumentRole, DocumentSlot, ExportBundle, GenerationError,
    Severity, StageInput,
};

/// Shortest trimmed text accepted as a real export.
pub const MIN_DOCUMENT_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub project_name: String,
    pub timestamp: String,
    pub documents: ExportBundle,
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub document: GeneratedDocument,
    pub diagnostics: Vec<Diagnostic>,
}

fn check_slot(role: DocumentRole, slot: &DocumentSlot, diagnostics: &mut Vec<Diagnostic>) {
    match slot {
        DocumentSlot::Loaded(_) => {}
        DocumentSlot::Resolved {
            document,
            candidates,
        } => diagnostics.push(Diagnostic::warning(
            DiagnosticKind::AmbiguousCandidate,
            format!(
                "multiple candidates for the {} ({}), using {}",
                role.label(),
                candidates.join(", "),
                document.origin()
            ),
        )),
        DocumentSlot::Ambiguous(candidates) => diagnostics.push(Diagnostic::error(
            DiagnosticKind::AmbiguousCandidate,
            format!(
                "multiple candidates for the {}: {}",
                role.label(),
                candidates.join(", ")
            ),
        )),
        DocumentSlot::NotFound if role.is_required() => diagnostics.push(Diagnostic::error(
            DiagnosticKind::MissingRequiredDocument,
            format!("{} not found", role.label()),
        )),
        DocumentSlot::NotFound => diagnostics.push(Diagnostic::warning(
            DiagnosticKind::OptionalDocumentAbsent,
            format!("{} not found, EEPROM output will be unavailable", role.label()),
        )),
        DocumentSlot::Unreadable(reason) if role.is_required() => {
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::MissingRequiredDocument,
                format!("unable to read {}: {}", role.label(), reason),
            ))
        }
        DocumentSlot::Unreadable(reason) => diagnostics.push(Diagnostic::warning(
            DiagnosticKind::OptionalDocumentAbsent,
            format!(
                "unable to read {}: {}, EEPROM output will be unavailable",
                role.label(),
                reason
            ),
        )),
    }
}

/// Minimal well-formedness check for a required export.
pub fn validate_content(role: DocumentRole, text: &str) -> Option<Diagnostic> {
    if text.trim().len() < MIN_DOCUMENT_LEN {
        return Some(Diagnostic::error(
            DiagnosticKind::InvalidDocumentContent,
            format!("invalid or empty {}", role.label()),
        ));
    }
    if !text.contains("#define") {
        return Some(Diagnostic::error(
            DiagnosticKind::InvalidDocumentContent,
            format!("{} doesn't contain expected #define statements", role.label()),
        ));
    }
    None
}

fn check_generated(text: &str, project_name: &str) -> Vec<Diagnostic> {
    let guard = guard_name(project_name);
    [
        format!("#ifndef {}", guard),
        format!("#define {}", guard),
        INCLUDE_DIRECTIVE.to_string(),
    ]
    .into_iter()
    .filter(|section| !text.contains(section.as_str()))
    .map(|section| {
        Diagnostic::new(
            DiagnosticKind::Note,
            Severity::Warning,
            format!("generated file missing expected section: {}", section),
        )
    })
    .collect()
}

fn abort_if_fatal(diagnostics: Vec<Diagnostic>) -> Result<Vec<Diagnostic>, GenerationError> {
    if diagnostics.iter().any(Diagnostic::is_fatal) {
        Err(GenerationError::Aborted { diagnostics })
    } else {
        Ok(diagnostics)
    }
}

/// Produces the header for one project, or the fatal diagnostics that stopped it.
pub fn generate(request: &GenerationRequest) -> Result<GenerationReport, GenerationError> {
    let mut diagnostics = Vec::new();
    for (role, slot) in request.documents.slots() {
        check_slot(role, slot, &mut diagnostics);
    }
    let mut diagnostics = abort_if_fatal(diagnostics)?;

    let parameter = request.documents.parameter.document().map(|doc| doc.text());
    let program = request.documents.program.document().map(|doc| doc.text());
    let (Some(parameter), Some(program)) = (parameter, program) else {
        return Err(GenerationError::Aborted { diagnostics });
    };
    diagnostics.extend(validate_content(DocumentRole::Parameter, parameter));
    diagnostics.extend(validate_content(DocumentRole::Program, program));
    let mut diagnostics = abort_if_fatal(diagnostics)?;

    let detection = ChipDetector::detect(parameter, program);
    diagnostics.extend(detection.diagnostics);
    let profile = detection.value;
    debug!("assembling header for {} on {}", request.project_name, profile.name);

    let input = StageInput {
        parameter,
        program,
        eeprom_program: request.documents.eeprom_program.document().map(|doc| doc.text()),
        eeprom_hex: request.documents.eeprom_hex.document().map(|doc| doc.text()),
        profile,
    };
    let (document, stage_diagnostics) =
        HeaderAssembler::new().assemble(&request.project_name, &request.timestamp, &input)?;
    diagnostics.extend(stage_diagnostics);
    diagnostics.extend(check_generated(&document.text, &request.project_name));

    Ok(GenerationReport {
        document,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::ChipModel;
    use crate::prelude::SourceDocument;

    const PARAM_EXPORT: &str = "\
/*
 * File:           export/Demo_IC_1_PARAM.h
 * Description:    Demo:IC 1 parameter RAM definitions.
 */
#ifndef __DEMO_IC_1_PARAM_H__
#define __DEMO_IC_1_PARAM_H__

/* Module Single 1 - Single Volume*/
#define MOD_SINGLE1_COUNT                              1
#define MOD_SINGLE1_DEVICE                             \"IC1\"
#define MOD_SINGLE1_GAIN1940ALGNS1_ADDR                0
#define MOD_SINGLE1_GAIN1940ALGNS1_FIXPT               0x00800000
#define MOD_SINGLE1_GAIN1940ALGNS1_TYPE                SIGMASTUDIOTYPE_FIXPOINT

#endif
";

    const PROGRAM_EXPORT: &str = "\
/*
 * File:           export/Demo_IC_1.h
 * Description:    Demo:IC 1 program data for the ADAU1452.
 */
#ifndef __DEMO_IC_1_H__
#define __DEMO_IC_1_H__

#include \"SigmaStudioFW.h\"

#define DEVICE_ARCHITECTURE_IC_1                  \"ADAU145x\"
#define DEVICE_ADDR_IC_1                          0x76

/* DSP Program Data */
#define PROGRAM_SIZE_IC_1 8
#define PROGRAM_ADDR_IC_1 49152
ADI_REG_TYPE Program_Data_IC_1[PROGRAM_SIZE_IC_1] = {
0x00, 0x00, 0x00, 0x00,
0xC0, 0x00, 0x00, 0x01,
};

/* DSP Parameter (Coefficient) Data */
#define PARAM_SIZE_IC_1 4
#define PARAM_ADDR_IC_1 0
ADI_REG_TYPE Param_Data_IC_1[PARAM_SIZE_IC_1] = {
0x00, 0x80, 0x00, 0x00
};

/* DSP Ram Data */
0x00, 0x00, 0x00, 0x01
};

/* Register Default - IC 1.Hibernate */
0x00, 0x01

#endif
";

    fn loaded(origin: &str, text: &str) -> DocumentSlot {
        DocumentSlot::Loaded(SourceDocument::new(origin, text))
    }

    fn request(bundle: ExportBundle) -> GenerationRequest {
        GenerationRequest {
            project_name: "Demo Project".to_string(),
            timestamp: "2025-09-25 18:02:28".to_string(),
            documents: bundle,
        }
    }

    fn full_bundle() -> ExportBundle {
        ExportBundle {
            parameter: loaded("export/Demo_IC_1_PARAM.h", PARAM_EXPORT),
            program: loaded("export/Demo_IC_1.h", PROGRAM_EXPORT),
            eeprom_program: loaded(
                "export/Demo_IC_2.h",
                "#define DEVICE_ADDR_IC_2                          0xA0\n",
            ),
            eeprom_hex: loaded("export/E2Prom.hex", "0x01, 0x02, 0x03,\n0x04\n"),
        }
    }

    #[test]
    fn end_to_end_header_for_adau1452() {
        let report = generate(&request(full_bundle())).unwrap();
        let text = &report.document.text;
        assert_eq!(report.document.chip, ChipModel::Adau1452);

        let expected_order = [
            "#ifndef SIGMADSP_PARAMETERS_DEMO_PROJECT_H",
            "#include <SigmaDSP.h>",
            "/* 7-bit i2c addresses */",
            "#define DSP_I2C_ADDRESS 0x3B",
            "#define EEPROM_I2C_ADDRESS 0x50",
            "#define SIGMASTUDIOTYPE_SPECIAL(x) (x)",
            "/* Module Single 1 - Single Volume*/",
            "const uint8_t PROGMEM DSP_eeprom_firmware[4] = {",
            "#define PROGRAM_REGSIZE 4",
            "const uint8_t PROGMEM DSP_program_data[PROGRAM_SIZE] = {",
            "const uint8_t PROGMEM DSP_parameter_data[PARAMETER_SIZE] = {",
            "/* DSP Ram Data */",
            "const uint8_t PROGMEM DSP_ram_data[] = {",
            "#endif",
        ];
        let mut cursor = 0;
        for needle in expected_order {
            let found = text[cursor..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing or out of order: {}", needle));
            cursor += found + needle.len();
        }

        assert!(text.contains("0xC0, 0x00, 0x00, 0x01,\n};"));
        assert!(!text.contains("\n\n\n"));
        assert!(!text.contains("MOD_SINGLE1_DEVICE"));
        assert!(report.diagnostics.iter().all(|diag| !diag.is_fatal()));
        assert_eq!(report.document.metrics.eeprom_bytes, 4);
        assert_eq!(report.document.metrics.blocks_emitted, 3);
    }

    #[test]
    fn missing_required_document_aborts() {
        let mut bundle = full_bundle();
        bundle.program = DocumentSlot::NotFound;
        let err = generate(&request(bundle)).unwrap_err();
        assert!(err
            .diagnostics()
            .iter()
            .any(|diag| diag.kind == DiagnosticKind::MissingRequiredDocument));
    }

    #[test]
    fn unresolved_ambiguity_aborts_but_resolved_one_warns() {
        let mut bundle = full_bundle();
        bundle.parameter = DocumentSlot::Ambiguous(vec!["a/X_IC_1_PARAM.h".into(), "b/X_IC_1_PARAM.h".into()]);
        let err = generate(&request(bundle)).unwrap_err();
        assert_eq!(err.diagnostics()[0].kind, DiagnosticKind::AmbiguousCandidate);

        let mut bundle = full_bundle();
        bundle.parameter = DocumentSlot::Resolved {
            document: SourceDocument::new("export/Demo_IC_1_PARAM.h", PARAM_EXPORT),
            candidates: vec!["export/Demo_IC_1_PARAM.h".into(), "export/old/Demo_IC_1_PARAM.h".into()],
        };
        let report = generate(&request(bundle)).unwrap();
        assert!(report.diagnostics.iter().any(|diag| {
            diag.kind == DiagnosticKind::AmbiguousCandidate && diag.severity == Severity::Warning
        }));
    }

    #[test]
    fn invalid_content_aborts() {
        let mut bundle = full_bundle();
        bundle.parameter = loaded("export/Demo_IC_1_PARAM.h", "/* nothing useful here */");
        let err = generate(&request(bundle)).unwrap_err();
        assert!(err
            .diagnostics()
            .iter()
            .any(|diag| diag.kind == DiagnosticKind::InvalidDocumentContent));

        assert!(validate_content(DocumentRole::Program, "   ").is_some());
    }

    #[test]
    fn absent_optional_documents_omit_eeprom_sections() {
        let mut bundle = full_bundle();
        bundle.eeprom_program = DocumentSlot::NotFound;
        bundle.eeprom_hex = DocumentSlot::NotFound;
        let report = generate(&request(bundle)).unwrap();
        assert!(!report.document.text.contains("EEPROM_I2C_ADDRESS"));
        assert!(!report.document.text.contains("DSP_eeprom_firmware"));
        let absent = report
            .diagnostics
            .iter()
            .filter(|diag| diag.kind == DiagnosticKind::OptionalDocumentAbsent)
            .count();
        assert_eq!(absent, 2);
    }

    #[test]
    fn unknown_chip_falls_back_without_failing() {
        let mut bundle = full_bundle();
        bundle.program = loaded(
            "export/Demo_IC_1.h",
            "#define DEVICE_ADDR_IC_1 0x68\n#define PROGRAM_SIZE_IC_1 0\n",
        );
        let report = generate(&request(bundle)).unwrap();
        assert_eq!(report.document.chip, ChipModel::Adau1701);
        assert!(report
            .diagnostics
            .iter()
            .any(|diag| diag.kind == DiagnosticKind::UnrecognizedChip));
    }
}
