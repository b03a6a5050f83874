//! # hakoniwa-shell
//!
//! A small UNIX-like command layer over [`hakoniwa_vfs`].
//!
//! The shell starts in host mode, where commands see the real filesystem
//! read-only. `vfs on` switches every command to the in-memory tree, where
//! `touch` and `rm` are allowed. Output goes to any `io::Write`, so sessions
//! are easy to drive from tests.

pub mod config;
pub mod script;
mod shell;

pub use config::{ConfigError, ShellConfig};
pub use shell::{Command, Flow, Shell, parse_input};
