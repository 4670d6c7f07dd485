pub mod detect;
pub mod profile;

pub use detect::ChipDetector;
pub use profile::{AddressOverride, ChipModel, ChipProfile, PROFILES};
