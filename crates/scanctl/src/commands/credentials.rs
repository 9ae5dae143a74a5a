//! Credential command handlers.

use std::sync::Arc;

use tabled::Tabled;

use scanctl_core::Session;
use scanctl_core::model::Credential;

use crate::cli::{CredentialsArgs, CredentialsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CredentialRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    credential_type: String,
    #[tabled(rename = "Login")]
    login: String,
    #[tabled(rename = "In Use")]
    in_use: String,
}

impl From<&Arc<Credential>> for CredentialRow {
    fn from(credential: &Arc<Credential>) -> Self {
        Self {
            id: util::fmt_opt(credential.info.id.as_ref()),
            name: credential.info.name.clone().unwrap_or_default(),
            credential_type: credential
                .credential_type
                .map(|t| t.display_name().to_owned())
                .unwrap_or_default(),
            login: credential.login.clone().unwrap_or_default(),
            in_use: util::fmt_yes_no(credential.info.in_use).to_owned(),
        }
    }
}

pub async fn handle(
    session: &Session,
    args: CredentialsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CredentialsCommand::List(list) => {
            let filter = util::parse_filter(list.filter.as_deref());
            let bar = util::spinner("Fetching credentials...", global);
            let loaded = session.load_credentials(filter, false).await;
            util::finish_spinner(bar);

            let Some(credentials) = loaded? else { return Ok(()) };
            let out = output::render_list(
                &global.output,
                &credentials,
                |c| CredentialRow::from(c),
                |c| util::fmt_opt(c.info.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
