use std::path::Path;
use std::process;

use condex_extract::ConditionsExtractor;

use super::load_model;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_check(model_path: &Path, output: OutputFormat, quiet: bool) {
    let (model, envs) = load_model(model_path, output, quiet);

    let summary = match ConditionsExtractor::new().check(&model, &envs) {
        Ok(s) => s,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "model": model.name,
                "events": summary.events,
                "guards": summary.guards,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            println!(
                "ok: {} guards in {} events type-check",
                summary.guards, summary.events
            );
        }
    }
}
