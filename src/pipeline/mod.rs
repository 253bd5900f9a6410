//! Pipeline module - scoring engines, transformers and dataset plumbing

mod batch;
pub mod binning;
pub mod category;
pub mod divergence;
pub mod eda;
pub mod encoder;
pub mod frame;
pub mod loader;
pub mod metrics;
pub mod miv;
pub mod selection;
pub mod transform;
pub mod woe;

pub use binning::*;
pub use category::*;
pub use divergence::*;
pub use eda::*;
pub use encoder::*;
pub use frame::*;
pub use loader::*;
pub use metrics::*;
pub use miv::*;
pub use selection::*;
pub use transform::*;
pub use woe::*;
