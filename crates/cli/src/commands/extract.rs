use std::path::Path;
use std::process;

use condex_extract::ConditionsExtractor;

use super::load_model;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_extract(model_path: &Path, wd: bool, output: OutputFormat, quiet: bool) {
    let (model, envs) = load_model(model_path, output, quiet);

    let conditions = match ConditionsExtractor::new().extract(&model, &envs) {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&conditions)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            print!("{}", conditions.dump(wd));
        }
    }
}
