#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod environment;
pub mod freeze;
pub mod manifest;

pub use environment::{is_environment_dir, Environment};
pub use freeze::{packages_in_sync, parse_freeze_output};
pub use manifest::required_packages;
