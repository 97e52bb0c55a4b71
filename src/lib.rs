/// The current version of Lumi, sourced from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod decompose;
pub mod render;
pub mod scan;
pub mod snapshot;
pub mod types;
pub mod webui;
