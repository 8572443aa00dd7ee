//! Terminal I/O utilities for CLI.

use std::io::{self, IsTerminal};

pub fn is_stderr_tty() -> bool {
    io::stderr().is_terminal()
}

/// Print status message to stderr if running in a terminal and not silenced.
pub fn status(message: &str) {
    if !rpmbox::is_quiet() && is_stderr_tty() {
        eprintln!("{}", message);
    }
}
