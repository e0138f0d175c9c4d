//! Utility modules.

pub mod validate;
