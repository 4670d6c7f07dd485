use crate::prelude::{ExtractionStage, StageInput, StageOutput, StageResult};
use crate::text::hex::count_literals;

/// Renders the EEPROM hex dump as a sized firmware array.
pub fn firmware_array(hex: &str) -> Option<(usize, Vec<String>)> {
    let hex = hex.trim();
    if hex.is_empty() {
        return None;
    }
    let size = count_literals(hex);
    let lines = vec![
        "/* This array contains the entire DSP program,".to_string(),
        "    and should be loaded into the external i2c EEPROM */".to_string(),
        format!("const uint8_t PROGMEM DSP_eeprom_firmware[{}] = {{", size),
        hex.to_string(),
        "};".to_string(),
        String::new(),
    ];
    Some((size, lines))
}

pub struct EepromFirmwareStage;

impl ExtractionStage for EepromFirmwareStage {
    fn name(&self) -> &'static str {
        "eeprom-firmware"
    }

    fn execute(&self, input: &StageInput<'_>) -> StageResult<StageOutput> {
        let mut output = StageOutput::default();
        if let Some((size, lines)) = input.eeprom_hex.and_then(firmware_array) {
            output.lines = lines;
            output.metadata.data_lines = size;
            output.metadata.blocks_opened = 1;
            output.metadata.blocks_closed = 1;
        }
        Ok(output)
    }
}
