pub mod generate;
pub mod header;
pub mod normalize;

pub use generate::{generate, GenerationReport, GenerationRequest};
pub use header::{GeneratedDocument, HeaderAssembler, SectionRole};
