//! Configuration and dependency wiring for the search CLI.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::Settings;
