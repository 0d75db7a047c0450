use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;

/// Print shell completion script to stdout
pub fn print_completion(shell: Shell) {
    let mut cmd = Cli::command();

    clap_complete::generate(shell, &mut cmd, "notebook", &mut io::stdout());
}
