use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::chip::ChipProfile;
use crate::prelude::{
    Diagnostic, DiagnosticKind, Extraction, ExtractionStage, StageInput, StageOutput, StageResult,
};
use crate::text::hex::{format_byte, parse_hex_literal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressRole {
    Dsp,
    Eeprom,
}

impl AddressRole {
    pub fn symbol(self) -> &'static str {
        match self {
            AddressRole::Dsp => "DSP_I2C_ADDRESS",
            AddressRole::Eeprom => "EEPROM_I2C_ADDRESS",
        }
    }
}

/// A resolved 7-bit bus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
    pub role: AddressRole,
    pub address: u32,
}

impl AddressEntry {
    pub fn line(&self) -> String {
        format!("#define {} {}", self.role.symbol(), format_byte(self.address))
    }
}

fn dsp_address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"#define\s+DEVICE_ADDR_IC_1\s+(0x[0-9A-Fa-f]+)").expect("static regex")
    })
}

fn eeprom_address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"#define\s+DEVICE_ADDR_IC_2\s+(0x[0-9A-Fa-f]+)").expect("static regex")
    })
}

fn capture_address(pattern: &Regex, text: &str) -> Option<(String, u32)> {
    let literal = pattern.captures(text)?.get(1)?.as_str();
    parse_hex_literal(literal).map(|value| (literal.to_string(), value))
}

/// Converts an exported 8-bit address to its 7-bit form under the chip's policy.
pub fn convert_dsp_address(exported: u32, profile: &ChipProfile) -> Extraction<u32> {
    match profile.address_override {
        Some(rule) if rule.exported == exported => Extraction::clean(u32::from(rule.corrected)),
        Some(_) => {
            let shifted = exported >> 1;
            Extraction::with_diagnostics(
                shifted,
                vec![Diagnostic::warning(
                    DiagnosticKind::NonStandardAddressValue,
                    format!(
                        "converted non-standard {} I2C address {} to {}",
                        profile.name,
                        format_byte(exported),
                        format_byte(shifted)
                    ),
                )],
            )
        }
        None => Extraction::clean(exported >> 1),
    }
}

/// Extracts the DSP and EEPROM bus addresses.
pub fn extract_addresses(
    program: &str,
    eeprom_program: Option<&str>,
    profile: &ChipProfile,
) -> Extraction<Vec<AddressEntry>> {
    let mut entries = Vec::new();
    let mut diagnostics = Vec::new();

    if let Some((literal, exported)) = capture_address(dsp_address_pattern(), program) {
        let converted = convert_dsp_address(exported, profile);
        diagnostics.extend(converted.diagnostics);
        let entry = AddressEntry {
            role: AddressRole::Dsp,
            address: converted.value,
        };
        diagnostics.push(Diagnostic::note(format!(
            "DSP I2C address: {} (from 8-bit {})",
            format_byte(entry.address),
            literal
        )));
        entries.push(entry);
    }

    if let Some((literal, exported)) =
        eeprom_program.and_then(|text| capture_address(eeprom_address_pattern(), text))
    {
        let entry = AddressEntry {
            role: AddressRole::Eeprom,
            address: exported >> 1,
        };
        diagnostics.push(Diagnostic::note(format!(
            "EEPROM I2C address: {} (from 8-bit {})",
            format_byte(entry.address),
            literal
        )));
        entries.push(entry);
    }

    Extraction::with_diagnostics(entries, diagnostics)
}

pub struct AddressStage;

impl ExtractionStage for AddressStage {
    fn name(&self) -> &'static str {
        "i2c-addresses"
    }

    fn execute(&self, input: &StageInput<'_>) -> StageResult<StageOutput> {
        let extraction = extract_addresses(input.program, input.eeprom_program, input.profile);
        let mut output = StageOutput::default();
        output.lines.push("/* 7-bit i2c addresses */".to_string());
        output
            .lines
            .extend(extraction.value.iter().map(AddressEntry::line));
        output.lines.push(String::new());
        output.metadata.symbol_count = extraction.value.len();
        output.metadata.diagnostics = extraction.diagnostics;
        Ok(output)
    }
}
