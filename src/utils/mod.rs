//! Terminal helpers shared by the batch engines and reports

pub mod progress;
pub mod styling;

pub use progress::*;
pub use styling::*;
