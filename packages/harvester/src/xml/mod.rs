//! Namespace-aware helpers for navigating roxmltree documents.

mod utils;

pub use utils::*;
