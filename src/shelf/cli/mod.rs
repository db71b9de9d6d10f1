//! Command-line client: argument parsing, terminal rendering and dispatch.

mod commands;
mod render;
mod setup;

pub use commands::run;
