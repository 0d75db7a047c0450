use crate::context::CliContext;
use crate::error::{CliError, CliResult};
use crate::exit_codes::EXIT_WARNING;
use colored::*;
use notebook::notes::iso_millis;

pub async fn run_login(context: &CliContext, email: String) -> CliResult<()> {
    let session = context.sessions.login(&email).await?;

    println!("{} {}", "✅ Signed in as".green(), session.email.bold());
    Ok(())
}

pub async fn run_logout(context: &CliContext) -> CliResult<()> {
    match context.sessions.current().await? {
        Some(session) => {
            context.sessions.logout().await?;
            println!("👋 Signed out {}", session.email);
        }
        None => {
            context.sessions.logout().await?;
            println!("Not signed in.");
        }
    }
    Ok(())
}

pub async fn run_whoami(context: &CliContext) -> CliResult<()> {
    let session = context
        .sessions
        .current()
        .await?
        .ok_or_else(|| CliError::new("Not signed in.", EXIT_WARNING))?;

    println!("{}", session.email.bold());
    println!("📅 Signed in: {}", iso_millis::format(&session.login_time));
    Ok(())
}
