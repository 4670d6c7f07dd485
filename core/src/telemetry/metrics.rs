use serde::{Deserialize, Serialize};

use crate::prelude::StageMetadata;

/// Counters collected while assembling one header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetrics {
    pub address_lines: usize,
    pub parameter_symbols: usize,
    pub blocks_emitted: usize,
    pub data_lines: usize,
    pub eeprom_bytes: usize,
    pub output_chars: usize,
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_addresses(&mut self, metadata: &StageMetadata) {
        self.address_lines += metadata.symbol_count;
    }

    pub fn record_parameters(&mut self, metadata: &StageMetadata) {
        self.parameter_symbols += metadata.symbol_count;
    }

    pub fn record_eeprom(&mut self, metadata: &StageMetadata) {
        self.eeprom_bytes += metadata.data_lines;
    }

    pub fn record_blocks(&mut self, metadata: &StageMetadata) {
        self.blocks_emitted += metadata.blocks_closed;
        self.data_lines += metadata.data_lines;
    }

    pub fn record_output(&mut self, text: &str) {
        self.output_chars = text.chars().count();
    }
}
