use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported SigmaDSP variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChipModel {
    #[serde(rename = "ADAU1452")]
    Adau1452,
    #[serde(rename = "ADAU1401")]
    Adau1401,
    #[serde(rename = "ADAU1702")]
    Adau1702,
    #[serde(rename = "ADAU1701")]
    Adau1701,
}

impl ChipModel {
    /// Fallback used when an export names no known chip.
    pub const DEFAULT: ChipModel = ChipModel::Adau1701;

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    pub fn profile(self) -> &'static ChipProfile {
        PROFILES
            .iter()
            .find(|profile| profile.model == self)
            .unwrap_or(&PROFILES[PROFILES.len() - 1])
    }
}

impl fmt::Display for ChipModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An exported 8-bit address that must be replaced rather than shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressOverride {
    pub exported: u32,
    pub corrected: u8,
}

/// Numeric policy for one chip variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipProfile {
    pub model: ChipModel,
    pub name: &'static str,
    pub signatures: &'static [&'static str],
    pub program_regsize: u8,
    pub parameter_regsize: u8,
    pub hardware_conf_regsize: u8,
    pub hardware_conf_addr: u16,
    pub core_register_size: u8,
    pub core_register_regsize: u8,
    pub core_register_r0_addr: u16,
    pub core_register_r4_addr: u16,
    pub address_override: Option<AddressOverride>,
}

/// Profiles in detection priority order, most specific signature first.
pub static PROFILES: [ChipProfile; 4] = [
    ChipProfile {
        model: ChipModel::Adau1452,
        name: "ADAU1452",
        signatures: &["ADAU1452", "1452"],
        program_regsize: 4,
        parameter_regsize: 4,
        hardware_conf_regsize: 1,
        hardware_conf_addr: 0xF890,
        core_register_size: 2,
        core_register_regsize: 2,
        core_register_r0_addr: 0xF400,
        core_register_r4_addr: 0xF402,
        address_override: Some(AddressOverride {
            exported: 0x76,
            corrected: 0x3B,
        }),
    },
    ChipProfile {
        model: ChipModel::Adau1401,
        name: "ADAU1401",
        signatures: &["ADAU1401", "1401"],
        program_regsize: 5,
        parameter_regsize: 4,
        hardware_conf_regsize: 1,
        hardware_conf_addr: 0x081C,
        core_register_size: 2,
        core_register_regsize: 2,
        core_register_r0_addr: 0x081C,
        core_register_r4_addr: 0x081C,
        address_override: None,
    },
    ChipProfile {
        model: ChipModel::Adau1702,
        name: "ADAU1702",
        signatures: &["ADAU1702", "1702"],
        program_regsize: 5,
        parameter_regsize: 4,
        hardware_conf_regsize: 1,
        hardware_conf_addr: 0x081C,
        core_register_size: 2,
        core_register_regsize: 2,
        core_register_r0_addr: 0x081C,
        core_register_r4_addr: 0x081C,
        address_override: None,
    },
    ChipProfile {
        model: ChipModel::Adau1701,
        name: "ADAU1701",
        signatures: &["ADAU1701", "1701"],
        program_regsize: 5,
        parameter_regsize: 4,
        hardware_conf_regsize: 1,
        hardware_conf_addr: 0x081C,
        core_register_size: 2,
        core_register_regsize: 2,
        core_register_r0_addr: 0x081C,
        core_register_r4_addr: 0x081C,
        address_override: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_model_resolves_to_its_own_profile() {
        for profile in PROFILES.iter() {
            assert_eq!(profile.model.profile(), profile);
            assert_eq!(profile.model.name(), profile.name);
        }
    }

    #[test]
    fn only_the_high_capability_chip_carries_an_address_override() {
        let overrides: Vec<_> = PROFILES
            .iter()
            .filter(|profile| profile.address_override.is_some())
            .map(|profile| profile.model)
            .collect();
        assert_eq!(overrides, vec![ChipModel::Adau1452]);
    }

    #[test]
    fn default_model_is_last_in_priority() {
        assert_eq!(PROFILES[PROFILES.len() - 1].model, ChipModel::DEFAULT);
    }
}
