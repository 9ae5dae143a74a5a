//! Command handlers.

pub mod audits;
pub mod config_cmd;
pub mod credentials;
pub mod reports;
pub mod scanners;
pub mod schedules;
pub mod tasks;
pub mod util;

use scanctl_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a session-backed command to its handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Tasks(args) => tasks::handle(session, args, global).await,
        Command::Audits(args) => audits::handle(session, args, global).await,
        Command::Reports(args) => reports::handle(session, args, global).await,
        Command::Scanners(args) => scanners::handle(session, args, global).await,
        Command::Schedules(args) => schedules::handle(session, args, global).await,
        Command::Credentials(args) => credentials::handle(session, args, global).await,
        // Handled before a session exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
