//! umlgen CLI library
//!
//! The scanner turns Java sources into declaration records; the CLI wires
//! scanning, assembly and file output together.

pub mod cli;
pub mod scanner;

pub use cli::{Cli, UmlgenApp};
pub use scanner::JavaScanner;
