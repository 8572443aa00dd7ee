//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - Captured process output and exit-code mapping
//! - `io` - File I/O with consistent error handling
//! - `shell` - Shell quoting for printable command lines
//! - `validation` - Input validation helpers

pub mod command;
pub mod io;
pub mod shell;
pub mod validation;
