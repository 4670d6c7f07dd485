use crate::extract::block::{BlockKind, DataBlock};
use crate::prelude::{ExtractionStage, StageInput, StageOutput, StageResult};
use crate::text::hex::is_hex_data_line;
use crate::text::lines::{is_comment, is_terminator};

pub const RAM_SECTION_MARKER: &str = "/* DSP Ram Data */";

const CORE_REGISTER_TOKENS: [&str; 5] = ["R0", "R1", "R2", "R3", "R4"];

fn names_core_register(line: &str) -> bool {
    CORE_REGISTER_TOKENS.iter().any(|token| line.contains(token))
}

fn flush_ram(buffer: &mut Vec<String>, output: &mut StageOutput) {
    if buffer.is_empty() {
        return;
    }
    output.metadata.data_lines += buffer.len();
    output.metadata.blocks_opened += 1;
    output.metadata.blocks_closed += 1;
    let block = DataBlock::with_lines(BlockKind::RamData, std::mem::take(buffer));
    output.lines.extend(block.render());
}

/// Pulls RAM seed data and register-default lines out of the program export.
pub fn extract_ram_data(program: &str) -> StageOutput {
    let mut output = StageOutput::default();
    let mut in_section = false;
    let mut buffer: Vec<String> = Vec::new();

    for raw in program.lines() {
        let line = raw.trim();

        if line.contains(RAM_SECTION_MARKER) {
            in_section = true;
            output.lines.push(line.to_string());
            continue;
        }
        if !in_section {
            continue;
        }

        if is_hex_data_line(line) {
            buffer.push(line.to_string());
        } else if is_terminator(line) {
            flush_ram(&mut buffer, &mut output);
            in_section = false;
        } else if !line.is_empty() && !is_comment(line) {
            flush_ram(&mut buffer, &mut output);
            if names_core_register(line) {
                output.lines.push("/* Register defaults */".to_string());
                output.lines.extend(
                    DataBlock::with_lines(BlockKind::RegisterDefaults, vec![line.to_string()])
                        .render(),
                );
                output.metadata.blocks_opened += 1;
                output.metadata.blocks_closed += 1;
            }
        }
    }

    if in_section {
        flush_ram(&mut buffer, &mut output);
    }
    output
}

pub struct RamDataStage;

impl ExtractionStage for RamDataStage {
    fn name(&self) -> &'static str {
        "ram-data"
    }

    fn execute(&self, input: &StageInput<'_>) -> StageResult<StageOutput> {
        Ok(extract_ram_data(input.program))
    }
}
