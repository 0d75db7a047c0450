use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::io;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "notebook")]
#[command(version)]
#[command(about = "A personal notebook that keeps working offline")]
#[command(long_about = "
notebook keeps short titled notes for the signed-in user. When a remote
database is configured notes are stored there; whenever it is unreachable
notes are read from and written to this device instead.

Example usage:
  notebook login ada@example.com       # Sign in
  notebook create \"Groceries\" --content \"milk, eggs\"
  notebook list --search milk          # Find notes
  notebook completion bash > ~/.bashrc.d/notebook  # Generate bash completions
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory for configuration, session and local notes
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with an email address
    #[command(long_about = "
Signs in as the given email address. No password is needed; the address
only selects whose notes are shown. The session is remembered until you
sign out.

Example:
  notebook login ada@example.com
")]
    Login {
        /// Email address to sign in as
        email: String,
    },
    /// Sign out
    Logout,
    /// Show who is signed in
    #[command(long_about = "
Prints the signed-in email address and when the session started.
Exits with code 1 when nobody is signed in.
")]
    Whoami,
    /// List notes, newest first
    #[command(long_about = "
Lists the signed-in user's notes, newest first.

Output formats:
  table  - Formatted table (default)
  json   - JSON output for scripting

Examples:
  notebook list                    # Show all notes
  notebook list --search report    # Notes whose title or content contains 'report'
  notebook list --format json      # Output as JSON
")]
    List {
        /// Only show notes whose title or content contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Create a note
    #[command(long_about = "
Creates a note with the given title. Content is optional; pass '-' to
read it from stdin.

Examples:
  notebook create \"Groceries\" --content \"milk, eggs\"
  echo \"from a pipe\" | notebook create \"Piped\" --content -
")]
    Create {
        /// Note title
        title: String,

        /// Note content ('-' reads from stdin)
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Update a note's title and/or content
    Update {
        /// Note id
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New content ('-' reads from stdin)
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note id
        id: String,
    },
    /// Generate shell completion scripts
    #[command(long_about = "
Generates shell completion scripts for various shells.

Examples:
  notebook completion bash > ~/.bashrc.d/notebook
  notebook completion zsh > ~/.zfunc/_notebook
  notebook completion fish > ~/.config/fish/completions/notebook.fish
")]
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    #[allow(dead_code)]
    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    pub fn is_tty() -> bool {
        io::stdout().is_terminal()
    }

    pub fn should_use_color() -> bool {
        Self::is_tty() && std::env::var("NO_COLOR").is_err()
    }
}
