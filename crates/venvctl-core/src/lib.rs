#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

mod artifacts;
mod commands;
mod context;
mod facade;
mod fs;
mod inspect;
mod interpreter;
mod outcome;
mod process;

pub use artifacts::{ActivationScript, LocationMarker};
pub use commands::create::{setup_environment, SetupRequest};
pub use commands::list::{list_environments, ListRequest};
pub use commands::remove::{remove_environment, RemoveRequest};
pub use context::{CommandContext, CommandInfo, GlobalOptions};
pub use facade::{format_status_message, to_json_response};
pub use inspect::{environment_info, EnvironmentInfo};
pub use outcome::{CommandStatus, ExecutionOutcome};
pub use process::RunOutput;

pub const VENVCTL_VERSION: &str = env!("CARGO_PKG_VERSION");
