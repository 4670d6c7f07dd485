use serde::{Deserialize, Serialize};

use crate::assemble::normalize::normalize;
use crate::chip::{ChipModel, ChipProfile};
use crate::extract::{
    AddressStage, EepromFirmwareStage, ParameterStage, ProgramDataStage, RamDataStage,
};
use crate::prelude::{
    Diagnostic, ExtractionStage, GenerationError, StageInput, StageOutput, StageResult,
};
use crate::telemetry::GenerationMetrics;

pub const INCLUDE_DIRECTIVE: &str = "#include <SigmaDSP.h>";
pub const GUARD_PREFIX: &str = "SIGMADSP_PARAMETERS_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionRole {
    GuardOpen,
    Addresses,
    MacroCompat,
    Parameters,
    EepromFirmware,
    ProgramData,
    RamData,
    GuardClose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSection {
    pub role: SectionRole,
    pub text: String,
}

/// The finished header, assembled once per run.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub project_name: String,
    pub chip: ChipModel,
    pub sections: Vec<DocumentSection>,
    pub text: String,
    pub metrics: GenerationMetrics,
}

/// Upper-cases the project name and replaces anything not alphanumeric.
pub fn guard_name(project_name: &str) -> String {
    let sanitized: String = project_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}_H", GUARD_PREFIX, sanitized)
}

fn guard_open(project_name: &str, chip: &str, timestamp: &str) -> String {
    let guard = guard_name(project_name);
    let include = INCLUDE_DIRECTIVE;
    format!(
        "/*
 * SigmaDSP Parameter File
 * Generated by sigmagen
 *
 * Project: {project_name}
 * Chip: {chip}
 * Generated: {timestamp}
 *
 * This file contains DSP program data, parameters, and initialization data
 * for use with the SigmaDSP Arduino library.
 */

#ifndef {guard}
#define {guard}

{include}
"
    )
}

/// Fixed readout macro expected by the driver.
pub struct MacroCompatStage;

impl ExtractionStage for MacroCompatStage {
    fn name(&self) -> &'static str {
        "macro-compat"
    }

    fn execute(&self, _input: &StageInput<'_>) -> StageResult<StageOutput> {
        Ok(StageOutput {
            lines: vec![
                "// Define readout macro as empty".to_string(),
                "#define SIGMASTUDIOTYPE_SPECIAL(x) (x)".to_string(),
                String::new(),
            ],
            ..Default::default()
        })
    }
}

fn boxed(
    role: SectionRole,
    stage: impl ExtractionStage + 'static,
) -> (SectionRole, Box<dyn ExtractionStage>) {
    (role, Box::new(stage))
}

/// Composes the header from the extraction stages in a fixed order.
pub struct HeaderAssembler {
    stages: Vec<(SectionRole, Box<dyn ExtractionStage>)>,
}

impl HeaderAssembler {
    pub fn new() -> Self {
        Self {
            stages: vec![
                boxed(SectionRole::Addresses, AddressStage),
                boxed(SectionRole::MacroCompat, MacroCompatStage),
                boxed(SectionRole::Parameters, ParameterStage),
                boxed(SectionRole::EepromFirmware, EepromFirmwareStage),
                boxed(SectionRole::ProgramData, ProgramDataStage),
                boxed(SectionRole::RamData, RamDataStage),
            ],
        }
    }

    /// Runs every stage and returns the document plus the stage diagnostics.
    pub fn assemble(
        &self,
        project_name: &str,
        timestamp: &str,
        input: &StageInput<'_>,
    ) -> Result<(GeneratedDocument, Vec<Diagnostic>), GenerationError> {
        let profile: &ChipProfile = input.profile;
        let mut metrics = GenerationMetrics::new();
        let mut diagnostics = Vec::new();
        let mut sections = vec![DocumentSection {
            role: SectionRole::GuardOpen,
            text: guard_open(project_name, profile.name, timestamp),
        }];

        for (role, stage) in &self.stages {
            let output = stage
                .execute(input)
                .map_err(|source| GenerationError::Stage {
                    stage: stage.name(),
                    source,
                })?;
            match role {
                SectionRole::Addresses => metrics.record_addresses(&output.metadata),
                SectionRole::Parameters => metrics.record_parameters(&output.metadata),
                SectionRole::EepromFirmware => metrics.record_eeprom(&output.metadata),
                SectionRole::ProgramData | SectionRole::RamData => {
                    metrics.record_blocks(&output.metadata)
                }
                _ => {}
            }
            diagnostics.extend(output.metadata.diagnostics.iter().cloned());
            if !output.is_empty() {
                sections.push(DocumentSection {
                    role: *role,
                    text: output.text(),
                });
            }
        }

        sections.push(DocumentSection {
            role: SectionRole::GuardClose,
            text: "#endif".to_string(),
        });

        let joined = sections
            .iter()
            .map(|section| section.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let text = normalize(&joined);
        metrics.record_output(&text);

        Ok((
            GeneratedDocument {
                project_name: project_name.to_string(),
                chip: profile.model,
                sections,
                text,
                metrics,
            },
            diagnostics,
        ))
    }
}

impl Default for HeaderAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(profile: &'static ChipProfile) -> StageInput<'static> {
        StageInput {
            parameter: "/* Module Vol*/\n#define MOD_VOL_COUNT 1\n#define MOD_VOL_TYPE 2\n",
            program: "#define DEVICE_ADDR_IC_1 0x68\n#define PROGRAM_SIZE_IC_1 2\n#define PROGRAM_ADDR_IC_1 1024\nADI_REG_TYPE Program_Data_IC_1[PROGRAM_SIZE_IC_1] = {\n0x00,\n0x01,\n};\n",
            eeprom_program: None,
            eeprom_hex: None,
            profile,
        }
    }

    #[test]
    fn guard_name_sanitizes_project() {
        assert_eq!(guard_name("my-dsp project.v2"), "SIGMADSP_PARAMETERS_MY_DSP_PROJECT_V2_H");
    }

    #[test]
    fn sections_follow_fixed_order() {
        let profile = ChipModel::Adau1701.profile();
        let (document, _) = HeaderAssembler::new()
            .assemble("demo", "2025-01-01 00:00:00", &input(profile))
            .unwrap();
        let roles: Vec<SectionRole> = document.sections.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                SectionRole::GuardOpen,
                SectionRole::Addresses,
                SectionRole::MacroCompat,
                SectionRole::Parameters,
                SectionRole::ProgramData,
                SectionRole::GuardClose,
            ]
        );
        assert!(document.text.contains("#ifndef SIGMADSP_PARAMETERS_DEMO_H\n#define SIGMADSP_PARAMETERS_DEMO_H"));
        assert!(document.text.ends_with("#endif"));
        assert!(document.text.contains("#define DSP_I2C_ADDRESS 0x34"));
        assert!(!document.text.contains("MOD_VOL_TYPE"));
    }

    #[test]
    fn assembled_text_is_normalized() {
        let profile = ChipModel::Adau1701.profile();
        let (document, _) = HeaderAssembler::new()
            .assemble("demo", "now", &input(profile))
            .unwrap();
        assert!(!document.text.contains("\n\n\n"));
        assert!(document.text.contains("0x00,\n0x01,\n};"));
        assert_eq!(document.metrics.blocks_emitted, 1);
        assert_eq!(document.metrics.parameter_symbols, 1);
        assert_eq!(document.metrics.output_chars, document.text.chars().count());
    }
}
