//! Command implementations for the pyreqs CLI

pub mod completions;
pub mod install;
pub mod scan;
pub mod version;
