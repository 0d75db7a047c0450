use std::process;
mod cli;
mod completions;
mod context;
mod error;
mod exit_codes;
mod logging;
mod notes;
mod session;

use clap::CommandFactory;
use cli::{Cli, Commands};
use context::CliContext;
use error::{handle_cli_result, CliResult};
use exit_codes::{EXIT_SUCCESS, EXIT_WARNING};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let Some(command) = cli.command else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {}", e);
            process::exit(EXIT_WARNING);
        }
        process::exit(EXIT_SUCCESS);
    };

    logging::init_logging(logging::level_from_flags(cli.quiet, cli.debug, cli.verbose));

    if !Cli::should_use_color() {
        colored::control::set_override(false);
    }

    if let Commands::Completion { shell } = command {
        tracing::debug!("Generating completion for {:?}", shell);
        completions::print_completion(shell);
        process::exit(EXIT_SUCCESS);
    }

    let exit_code = handle_cli_result(run(command, cli.data_dir, cli.quiet).await);
    process::exit(exit_code);
}

async fn run(
    command: Commands,
    data_dir: Option<std::path::PathBuf>,
    quiet: bool,
) -> CliResult<()> {
    let context = CliContext::load(data_dir, quiet)?;

    match command {
        Commands::Login { email } => session::run_login(&context, email).await,
        Commands::Logout => session::run_logout(&context).await,
        Commands::Whoami => session::run_whoami(&context).await,
        Commands::List { search, format } => notes::run_list(&context, search, format).await,
        Commands::Create { title, content } => notes::run_create(&context, title, content).await,
        Commands::Update { id, title, content } => {
            notes::run_update(&context, id, title, content).await
        }
        Commands::Delete { id } => notes::run_delete(&context, id).await,
        Commands::Completion { .. } => Ok(()),
    }
}
