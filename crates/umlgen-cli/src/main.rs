//! umlgen CLI - Generate StarUML model documents from Java sources

use clap::Parser;
use umlgen_cli::cli::{Cli, UmlgenApp};

fn main() {
    let cli_args = Cli::parse();

    let result = UmlgenApp::new().and_then(|mut app| app.run(cli_args));
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
