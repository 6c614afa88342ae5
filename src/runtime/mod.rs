pub mod command;
pub mod event;
pub mod host;
pub mod key_bindings;
pub mod listeners;
pub mod runner;

pub use host::{FormHost, HostOutcome};
pub use runner::{Flow, Runtime, Screen};
