pub mod client;
pub mod commands;
pub mod config;
pub mod http;
pub mod outcome;
pub mod provider;
pub mod report;
pub mod services;
pub mod trips;

pub use outcome::{ErrorKind, ErrorPayload, Failure, Outcome};
