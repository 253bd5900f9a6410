//! Report module - terminal summaries and JSON export of scoring results

pub mod export;
pub mod summary;

pub use export::*;
pub use summary::*;
