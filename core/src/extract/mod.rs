pub mod address;
pub mod block;
pub mod eeprom;
pub mod parameters;
pub mod program;
pub mod ram;

pub use address::{AddressEntry, AddressRole, AddressStage};
pub use block::{BlockKind, DataBlock};
pub use eeprom::EepromFirmwareStage;
pub use parameters::{ExtractedSymbol, ParameterStage};
pub use program::{BlockState, ProgramDataStage, Transition};
pub use ram::RamDataStage;
