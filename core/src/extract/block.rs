use serde::{Deserialize, Serialize};

use crate::chip::ChipProfile;
use crate::text::hex::format_word;

/// Kind of a declared output array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    ProgramData,
    ParameterData,
    HardwareConf,
    CoreRegisterR0,
    CoreRegisterR4,
    RamData,
    RegisterDefaults,
}

impl BlockKind {
    pub fn array_name(self) -> &'static str {
        match self {
            BlockKind::ProgramData => "DSP_program_data",
            BlockKind::ParameterData => "DSP_parameter_data",
            BlockKind::HardwareConf => "DSP_hardware_conf_data",
            BlockKind::CoreRegisterR0 => "DSP_core_register_R0_data",
            BlockKind::CoreRegisterR4 => "DSP_core_register_R4_data",
            BlockKind::RamData => "DSP_ram_data",
            BlockKind::RegisterDefaults => "register_defaults",
        }
    }

    /// Symbol used as the array length; `None` leaves the length implicit.
    pub fn size_symbol(self) -> Option<&'static str> {
        match self {
            BlockKind::ProgramData => Some("PROGRAM_SIZE"),
            BlockKind::ParameterData => Some("PARAMETER_SIZE"),
            BlockKind::HardwareConf => Some("HARDWARE_CONF_SIZE"),
            BlockKind::CoreRegisterR0 => Some("CORE_REGISTER_R0_SIZE"),
            BlockKind::CoreRegisterR4 => Some("CORE_REGISTER_R4_SIZE"),
            BlockKind::RamData | BlockKind::RegisterDefaults => None,
        }
    }

    /// `#define`s emitted ahead of the declaration for blocks whose sizing
    /// is fixed by the chip rather than by the export.
    pub fn companion_defines(self, profile: &ChipProfile) -> Vec<String> {
        let (prefix, addr) = match self {
            BlockKind::CoreRegisterR0 => ("CORE_REGISTER_R0", profile.core_register_r0_addr),
            BlockKind::CoreRegisterR4 => ("CORE_REGISTER_R4", profile.core_register_r4_addr),
            _ => return Vec::new(),
        };
        vec![
            format!("#define {}_SIZE {}", prefix, profile.core_register_size),
            format!("#define {}_ADDR {}", prefix, format_word(addr)),
            format!("#define {}_REGSIZE {}", prefix, profile.core_register_regsize),
        ]
    }

    pub fn declaration(self) -> String {
        format!(
            "const uint8_t PROGMEM {}[{}] = {{",
            self.array_name(),
            self.size_symbol().unwrap_or_default()
        )
    }
}

/// A named output array under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    pub kind: BlockKind,
    pub lines: Vec<String>,
}

impl DataBlock {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }

    pub fn with_lines(kind: BlockKind, lines: Vec<String>) -> Self {
        Self { kind, lines }
    }

    pub fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    /// Lines emitted when the block closes: body, brace, blank separator.
    pub fn close(self) -> Vec<String> {
        let mut out = self.lines;
        out.push("};".to_string());
        out.push(String::new());
        out
    }

    /// Declaration, body and closing of a block collected in one go.
    pub fn render(self) -> Vec<String> {
        let mut out = vec![self.kind.declaration()];
        out.extend(self.close());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::ChipModel;

    #[test]
    fn declarations_use_size_symbol_or_empty_brackets() {
        assert_eq!(
            BlockKind::ProgramData.declaration(),
            "const uint8_t PROGMEM DSP_program_data[PROGRAM_SIZE] = {"
        );
        assert_eq!(
            BlockKind::RamData.declaration(),
            "const uint8_t PROGMEM DSP_ram_data[] = {"
        );
    }

    #[test]
    fn core_register_companions_follow_chip_addresses() {
        let profile = ChipModel::Adau1452.profile();
        assert_eq!(
            BlockKind::CoreRegisterR4.companion_defines(profile),
            vec![
                "#define CORE_REGISTER_R4_SIZE 2".to_string(),
                "#define CORE_REGISTER_R4_ADDR 0xF402".to_string(),
                "#define CORE_REGISTER_R4_REGSIZE 2".to_string(),
            ]
        );
        assert!(BlockKind::ProgramData.companion_defines(profile).is_empty());
    }

    #[test]
    fn render_wraps_lines_in_declaration_and_brace() {
        let block = DataBlock::with_lines(BlockKind::RegisterDefaults, vec!["R0 0x00".into()]);
        assert_eq!(
            block.render(),
            vec![
                "const uint8_t PROGMEM register_defaults[] = {".to_string(),
                "R0 0x00".to_string(),
                "};".to_string(),
                String::new(),
            ]
        );
    }
}
