//! Command-line interface.

use crate::batch::{self, BatchRow};
use crate::error::CliError;
use clap::Parser;
use lqm_core::{LqmKind, LqmRequest, Thresholds};
use std::path::PathBuf;

/// Configure LQM thresholds on sites, elements, and VPN paths.
#[derive(Debug, Clone, Parser)]
#[command(name = "lqmcfg", version)]
pub struct Args {
    // -------------------------------------------------------------------------
    // API
    // -------------------------------------------------------------------------
    /// Controller URI [default: https://api.elcapitan.cloudgenix.com]
    #[arg(long, short = 'C', help_heading = "API")]
    pub controller: Option<String>,

    /// Accept invalid TLS certificates from the controller
    #[arg(long, help_heading = "API")]
    pub insecure: bool,

    // -------------------------------------------------------------------------
    // Login
    // -------------------------------------------------------------------------
    /// Use this email as user name instead of prompting
    #[arg(long, short = 'E', help_heading = "Login")]
    pub email: Option<String>,

    /// Use this password instead of prompting
    #[arg(long = "pass", short = 'P', help_heading = "Login")]
    pub password: Option<String>,

    /// Settings file with controller, auth_token, user, password
    #[arg(long, value_name = "FILE", help_heading = "Login")]
    pub settings: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // LQM config
    // -------------------------------------------------------------------------
    /// Type of LQM config. Allowed values: media, all_apps, app
    #[arg(long = "lqmtype", short = 't', help_heading = "LQM Config")]
    pub lqm_type: LqmKind,

    /// Name of the site
    #[arg(long = "sitename", short = 'S', help_heading = "LQM Config")]
    pub site: Option<String>,

    /// Name of the element (app and all_apps)
    #[arg(long = "elemname", short = 'e', help_heading = "LQM Config")]
    pub element: Option<String>,

    /// Name of the application (app)
    #[arg(long = "appname", short = 'a', help_heading = "LQM Config")]
    pub app: Option<String>,

    /// Max value for latency
    #[arg(long, short = 'L', default_value_t = 0, allow_negative_numbers = true, help_heading = "LQM Config")]
    pub latency: i64,

    /// Max value for jitter
    #[arg(long, short = 'J', default_value_t = 0, allow_negative_numbers = true, help_heading = "LQM Config")]
    pub jitter: i64,

    /// Max value for packet loss
    #[arg(long, short = 'p', default_value_t = 0, allow_negative_numbers = true, help_heading = "LQM Config")]
    pub packetloss: i64,

    /// CSV file with one configuration per row. Header must match the LQM type:
    /// media: site,latency,jitter,packetloss;
    /// app: site,element,app,latency,jitter,packetloss;
    /// all_apps: site,element,latency,jitter,packetloss
    #[arg(long, short = 'f', value_name = "FILE", help_heading = "LQM Config")]
    pub filename: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Run
    // -------------------------------------------------------------------------
    /// Resolve names and log payloads without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// The requests one invocation works through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workload {
    /// Built from flags; already validated.
    Single(LqmRequest),
    /// Rows of a CSV file, each possibly invalid.
    Batch(Vec<BatchRow>),
}

impl Workload {
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Args {
    /// Validate flags and load the workload, before anything touches the
    /// controller.
    pub fn workload(&self) -> Result<Workload, CliError> {
        if let Some(path) = &self.filename {
            return Ok(Workload::Batch(batch::load(path, self.lqm_type)?));
        }

        let thresholds = Thresholds::from_signed(self.latency, self.jitter, self.packetloss)?;
        let request = LqmRequest::new(
            self.lqm_type,
            self.site.as_deref(),
            self.element.as_deref(),
            self.app.as_deref(),
            thresholds,
        )?;
        Ok(Workload::Single(request))
    }
}
