//! Report module - summary artifacts, terminal tables and exports

pub mod export;
pub mod model_summary;
pub mod summary;

pub use export::*;
pub use model_summary::*;
pub use summary::*;
