//! CLI module for the headshift command-line interface
//!
//! Argument parsing and the human/JSON reporting around the library's
//! conversion pipeline.

pub mod args;
pub mod commands;
