// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! Keystone endpoint reconciliation executable.
//!
//! This is the entry point of the `keystone-endpoint` binary. The result is
//! printed to stdout as a JSON document, logs go to stderr.

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    prelude::*,
};

use openstack_keystone_endpoint::catalog::{CatalogProvider, Interface};
use openstack_keystone_endpoint::config::Config;
use openstack_keystone_endpoint::reconcile::{
    EndpointDesired, EndpointParameters, EndpointReconciler, EndpointState, ReconcileError,
    ReconcileOptions, ReconcileOutcome,
};

/// Ensure the endpoint of the `OpenStack` service is present in (or absent
/// from) the Keystone service catalog.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the cloud config file.
    #[arg(short, long, default_value = "/etc/keystone-endpoint/cloud.conf")]
    config: PathBuf,

    /// Verbosity level. Repeat to increase level.
    #[arg(short, long, global=true, action = ArgAction::Count, display_order = 920)]
    pub verbose: u8,

    /// Name of the service.
    #[arg(long)]
    service_name: String,

    /// Type of the service.
    #[arg(long)]
    service_type: String,

    /// Interface of the endpoint. Requires `--url`.
    #[arg(long)]
    interface: Option<Interface>,

    /// URL of the endpoint.
    #[arg(long)]
    url: Option<String>,

    /// Public URL of the legacy endpoint.
    #[arg(long)]
    public_url: Option<String>,

    /// Internal URL of the legacy endpoint.
    #[arg(long)]
    internal_url: Option<String>,

    /// Admin URL of the legacy endpoint.
    #[arg(long)]
    admin_url: Option<String>,

    /// Region of the endpoint.
    #[arg(long)]
    region: Option<String>,

    /// Whether the endpoint appears in the service catalog.
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    enabled: bool,

    /// Whether the endpoint should be present or absent.
    #[arg(long, default_value_t = EndpointState::Present)]
    state: EndpointState,

    /// Only report whether the endpoint would be changed.
    #[arg(long)]
    dry_run: bool,

    /// Delete the endpoint which differs from the desired values when the
    /// state is `absent`.
    #[arg(long)]
    delete_on_drift: bool,
}

impl From<&Args> for EndpointParameters {
    fn from(value: &Args) -> Self {
        Self {
            service_name: value.service_name.clone(),
            service_type: value.service_type.clone(),
            interface: value.interface,
            url: value.url.clone(),
            public_url: value.public_url.clone(),
            internal_url: value.internal_url.clone(),
            admin_url: value.admin_url.clone(),
            region: value.region.clone(),
            enabled: value.enabled,
            state: value.state,
        }
    }
}

async fn run(cfg: &Config, args: &Args) -> Result<ReconcileOutcome, ReconcileError> {
    let desired = EndpointDesired::try_from(EndpointParameters::from(args))?;
    let options = ReconcileOptions {
        dry_run: args.dry_run,
        delete_on_drift: args.delete_on_drift,
    };

    let provider = CatalogProvider::open(cfg).await?;
    let result = EndpointReconciler::new(&provider, &provider, options)
        .reconcile(&desired)
        .await;
    provider.close().await;
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Report> {
    color_eyre::install()?;
    let args = Args::parse();

    let cfg = Config::new(args.config.clone())?;

    let level = match (args.verbose, cfg.default.debug) {
        (0, false) => LevelFilter::WARN,
        (1, false) => LevelFilter::INFO,
        (0..=2, _) => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = Targets::new()
        .with_default(level)
        .with_target("hyper_util", LevelFilter::INFO);

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter);

    // build the tracing registry
    tracing_subscriber::registry().with(log_layer).init();

    debug!("Using configuration {}", args.config.display());

    match run(&cfg, &args).await {
        Ok(outcome) => {
            info!(changed = outcome.changed, "Reconciliation finished");
            println!("{}", serde_json::to_string(&outcome)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!("Reconciliation failed: {err}");
            println!("{}", json!({"failed": true, "msg": err.to_string()}));
            Ok(ExitCode::FAILURE)
        }
    }
}
