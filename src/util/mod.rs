//! Shared helpers: filesystem operations, Mach-O inspection, shell quoting.

pub mod fs;
pub mod macho;
pub mod shell;
