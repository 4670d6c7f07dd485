//! Line classification for the program export.

use crate::extract::block::BlockKind;

/// Size or address declaration recognised in the program export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration {
    ProgramSize,
    ProgramAddr,
    ParamSize,
    ParamAddr,
    HardwareConfSize,
}

const DECLARATION_MARKERS: [(&str, Declaration); 5] = [
    ("#define PROGRAM_SIZE_IC_1", Declaration::ProgramSize),
    ("#define PROGRAM_ADDR_IC_1", Declaration::ProgramAddr),
    ("#define PARAM_SIZE_IC_1", Declaration::ParamSize),
    ("#define PARAM_ADDR_IC_1", Declaration::ParamAddr),
    ("#define R3_HWCONFIGURATION_IC_1_SIZE", Declaration::HardwareConfSize),
];

const BLOCK_START_MARKERS: [(&str, BlockKind); 5] = [
    ("ADI_REG_TYPE Program_Data", BlockKind::ProgramData),
    ("ADI_REG_TYPE Param_Data", BlockKind::ParameterData),
    ("ADI_REG_TYPE R0_COREREGISTER", BlockKind::CoreRegisterR0),
    ("ADI_REG_TYPE R3_HWCONFIGURATION", BlockKind::HardwareConf),
    ("ADI_REG_TYPE R4_COREREGISTER", BlockKind::CoreRegisterR4),
];

/// Event fed to the program data state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent<'a> {
    Declaration(Declaration, &'a str),
    BlockStart(BlockKind),
    Data(&'a str),
    Terminator,
    Ignored,
}

pub fn is_comment(line: &str) -> bool {
    line.starts_with("//") || line.starts_with("/*")
}

pub fn is_terminator(line: &str) -> bool {
    line.starts_with("};")
}

/// Classifies one trimmed line. Blank and comment lines are `Ignored`.
pub fn classify(line: &str) -> LineEvent<'_> {
    if line.is_empty() || is_comment(line) {
        return LineEvent::Ignored;
    }
    for (marker, declaration) in DECLARATION_MARKERS {
        if line.contains(marker) {
            let value = line.split_whitespace().last().unwrap_or_default();
            return LineEvent::Declaration(declaration, value);
        }
    }
    for (marker, kind) in BLOCK_START_MARKERS {
        if line.contains(marker) {
            return LineEvent::BlockStart(kind);
        }
    }
    if super::hex::is_hex_data_line(line) {
        return LineEvent::Data(line);
    }
    if is_terminator(line) {
        return LineEvent::Terminator;
    }
    LineEvent::Ignored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_capture_last_token() {
        assert_eq!(
            classify("#define PROGRAM_SIZE_IC_1                         5120"),
            LineEvent::Declaration(Declaration::ProgramSize, "5120")
        );
        assert_eq!(
            classify("#define R3_HWCONFIGURATION_IC_1_SIZE 24"),
            LineEvent::Declaration(Declaration::HardwareConfSize, "24")
        );
    }

    #[test]
    fn comments_are_ignored_even_when_naming_markers() {
        assert_eq!(classify("/* ADI_REG_TYPE Program_Data */"), LineEvent::Ignored);
        assert_eq!(classify("// 0x00, 0x01"), LineEvent::Ignored);
        assert_eq!(classify(""), LineEvent::Ignored);
    }

    #[test]
    fn block_starts_data_and_terminators() {
        assert_eq!(
            classify("ADI_REG_TYPE Param_Data_IC_1[PARAM_SIZE_IC_1] = {"),
            LineEvent::BlockStart(BlockKind::ParameterData)
        );
        assert_eq!(classify("0x00, 0x01,"), LineEvent::Data("0x00, 0x01,"));
        assert_eq!(classify("};"), LineEvent::Terminator);
        assert_eq!(classify("#include \"SigmaStudioFW.h\""), LineEvent::Ignored);
    }
}
