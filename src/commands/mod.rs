// src/commands/mod.rs
//! Command handlers for the bop CLI

mod generate;

pub use generate::cmd_generate;
