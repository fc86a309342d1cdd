use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use tgen_actions::actions::factory::ActionFactory;
use tgen_actions::core::config::Config;
use tgen_actions::core::tracing_init::init_tracing;
use tgen_actions::models::action::{Action, ActionKey};
use tgen_actions::validation::resolver::SystemResolver;
use tracing::{info, warn};

/// Outcome for one configured node
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum NodeReport {
    Valid { index: usize, action: Action },
    Rejected { index: usize, kind: String, error: String },
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("config.toml")
    };

    let config = Config::from_file(&config_path)
        .context(format!(
            "Failed to load configuration from '{}'",
            config_path.display()
        ))?;

    init_tracing(&config.logging);

    info!(
        config_path = %config_path.display(),
        actions = config.actions.len(),
        hostname = ?config.host.hostname,
        "Validating action nodes"
    );

    let resolver = match &config.host.hostname {
        Some(name) => SystemResolver::with_hostname(name.clone()),
        None => SystemResolver::new(),
    };
    let factory = ActionFactory::new(resolver);

    let mut reports = Vec::with_capacity(config.actions.len());
    let mut failures = 0usize;

    for (index, attrs) in config.actions.iter().enumerate() {
        match attrs.build(&factory) {
            Ok(mut action) => {
                action.set_key(ActionKey(index));
                info!(index = index, kind = %action.kind(), "Action node is valid");
                reports.push(NodeReport::Valid { index, action });
            }
            Err(e) => {
                warn!(index = index, node_kind = %attrs.kind, error = %e, "Action node rejected");
                failures += 1;
                reports.push(NodeReport::Rejected {
                    index,
                    kind: format!("{:?}", e.kind()),
                    error: e.message().to_string(),
                });
            }
        }
    }

    let report = serde_json::to_string_pretty(&reports)
        .context("Failed to serialize report")?;
    println!("{}", report);

    if failures > 0 {
        bail!("{} of {} action nodes failed validation", failures, reports.len());
    }

    info!(actions = reports.len(), "All action nodes valid");

    Ok(())
}
