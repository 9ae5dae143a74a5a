//! Scanner command handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use tabled::Tabled;

use scanctl_core::model::Scanner;
use scanctl_core::{LoadOptions, Session};

use crate::cli::{GlobalOpts, ScannersArgs, ScannersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ScannerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    scanner_type: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Port")]
    port: String,
}

impl From<&Arc<Scanner>> for ScannerRow {
    fn from(scanner: &Arc<Scanner>) -> Self {
        Self {
            id: util::fmt_opt(scanner.info.id.as_ref()),
            name: scanner.info.name.clone().unwrap_or_default(),
            scanner_type: scanner
                .scanner_type
                .map(|t| t.display_name().to_owned())
                .unwrap_or_default(),
            host: scanner.host.clone().unwrap_or_default(),
            port: util::fmt_opt(scanner.port),
        }
    }
}

fn scanner_detail(scanner: &Scanner) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Name:        {}", scanner.info.name.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "ID:          {}", util::fmt_opt(scanner.info.id.as_ref()));
    if let Some(scanner_type) = scanner.scanner_type {
        let _ = writeln!(out, "Type:        {}", scanner_type.display_name());
    }
    if let Some(ref host) = scanner.host {
        let _ = writeln!(out, "Host:        {host}");
    }
    if let Some(port) = scanner.port {
        let _ = writeln!(out, "Port:        {port}");
    }
    if let Some(ref credential) = scanner.credential {
        let _ = writeln!(
            out,
            "Credential:  {} ({})",
            credential.name.as_deref().unwrap_or("-"),
            credential.id
        );
    }
    let _ = writeln!(
        out,
        "CA cert:     {}",
        if scanner.ca_pub.is_some() {
            "configured"
        } else {
            "none"
        }
    );
    let _ = writeln!(out, "In use:      {}", util::fmt_yes_no(scanner.info.in_use));
    out.trim_end().to_owned()
}

pub async fn handle(
    session: &Session,
    args: ScannersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ScannersCommand::List(list) => {
            let filter = util::parse_filter(list.filter.as_deref());
            let bar = util::spinner("Fetching scanners...", global);
            let loaded = session.load_scanners(filter, false).await;
            util::finish_spinner(bar);

            let Some(scanners) = loaded? else { return Ok(()) };
            let out = output::render_list(
                &global.output,
                &scanners,
                |s| ScannerRow::from(s),
                |s| util::fmt_opt(s.info.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ScannersCommand::Get { id } => {
            let bar = util::spinner("Fetching scanner...", global);
            let loaded = session.load_scanner(&id, LoadOptions::default()).await;
            util::finish_spinner(bar);

            let Some(scanner) = loaded? else { return Ok(()) };
            let out = output::render_single(
                &global.output,
                scanner.as_ref(),
                scanner_detail,
                |s| util::fmt_opt(s.info.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
