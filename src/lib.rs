#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod assistant;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod providers;

pub use assistant::{Assistant, ConnectionStatus, QuickAction};
pub use config::Settings;
pub use error::{PageAskError, ProviderError};
pub use extract::{ExtractOptions, ExtractedContent};
