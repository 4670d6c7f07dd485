pub mod hex;
pub mod lines;

pub use lines::{classify, Declaration, LineEvent};
