//! One complete invocation: log in, resolve, write, log out.

use crate::apply::{self, ApplyOptions, RunSummary};
use crate::cli::{Args, Workload};
use crate::config::{self, Credentials, Settings};
use crate::error::CliError;
use crate::session::{self, CredentialPrompt, StdinPrompt};
use lqm_client::{ClientOptions, ControllerClient};
use lqm_core::LqmKind;
use tracing::{error, info};

/// Name shown in the startup banner.
pub const TOOL_NAME: &str = "lqmcfg";

/// Controller connection and write behavior for a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub controller: String,
    pub client: ClientOptions,
    pub apply: ApplyOptions,
}

/// Entry point used by `main`: resolve settings from the process
/// environment and prompt on the terminal.
pub async fn run_cli(args: &Args) -> Result<RunSummary, CliError> {
    let workload = args.workload()?;
    let settings = Settings::load(args.settings.as_deref())?;
    let credentials = Credentials::resolve(
        args.email.as_deref(),
        args.password.as_deref(),
        &settings,
        |var| std::env::var(var).ok(),
    );
    let options = RunOptions {
        controller: config::resolve_controller(args.controller.as_deref(), &settings),
        client: ClientOptions {
            insecure: args.insecure,
            ..ClientOptions::default()
        },
        apply: ApplyOptions {
            dry_run: args.dry_run,
        },
    };

    run(args.lqm_type, &workload, &options, &credentials, &mut StdinPrompt).await
}

/// Run a validated workload against a controller.
///
/// The session is logged out whether or not the work succeeded.
pub async fn run(
    kind: LqmKind,
    workload: &Workload,
    options: &RunOptions,
    credentials: &Credentials,
    prompt: &mut dyn CredentialPrompt,
) -> Result<RunSummary, CliError> {
    let mut client = ControllerClient::with_options(&options.controller, &options.client)?;
    info!("{} v{} ({})", TOOL_NAME, env!("CARGO_PKG_VERSION"), client.base_url());

    session::authenticate(&mut client, credentials, prompt).await?;
    let outcome = execute(&client, kind, workload, options.apply).await;
    session::logout(&mut client).await;
    outcome
}

async fn execute(
    client: &ControllerClient,
    kind: LqmKind,
    workload: &Workload,
    options: ApplyOptions,
) -> Result<RunSummary, CliError> {
    let catalog = apply::build_catalog(client, kind).await?;
    let mut summary = RunSummary::default();

    match workload {
        Workload::Single(request) => {
            apply::apply_request(client, &catalog, request, options, &mut summary).await?;
        }
        Workload::Batch(rows) => {
            for row in rows {
                info!("Configuring row {} from CSV", row.number);
                let result = match &row.request {
                    Ok(request) => {
                        apply::apply_request(client, &catalog, request, options, &mut summary).await
                    }
                    Err(err) => Err(err.clone()),
                };
                match result {
                    Ok(()) => {}
                    Err(err) if !err.is_fatal() => {
                        error!("Skipping row {}: {}", row.number, err);
                        summary.skipped += 1;
                    }
                    Err(err) => {
                        summary.log();
                        return Err(err.into());
                    }
                }
            }
        }
    }

    Ok(summary)
}
