//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`switch`], [`init`], or [`validate`]. Each
//! handler lives in its own submodule.

pub mod init;
pub mod switch;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::SwitchError;

pub async fn dispatch(cli: Cli) -> Result<(), SwitchError> {
    match cli.command {
        Some(Commands::Switch(args)) => switch::execute(*args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  edge-switch v{version} \u{2014} CDN edge dictionary routing switch\n\n  \
         No command provided. To get started:\n\n    \
         edge-switch init                     Generate a starter config.json\n    \
         edge-switch validate                 Check ./config.json\n    \
         edge-switch switch --west true       Route every service to west\n    \
         edge-switch --help                   See all commands and options\n"
    );
}
