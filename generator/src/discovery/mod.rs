pub mod finder;
pub mod project;
