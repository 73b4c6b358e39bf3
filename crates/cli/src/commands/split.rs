use std::process;

use condex_core::{EventB, FormulaService};
use condex_extract::{canonical_form, split};
use serde::Serialize;

use crate::{report_error, OutputFormat};

#[derive(Serialize)]
struct SplitCondition {
    index: usize,
    predicate: String,
    key: String,
}

pub(crate) fn cmd_split(formula: &str, output: OutputFormat, quiet: bool) {
    let predicate = match EventB.parse(formula, "formula") {
        Ok(p) => p,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let conditions: Vec<SplitCondition> = split(&predicate)
        .iter()
        .enumerate()
        .map(|(i, c)| SplitCondition {
            index: i + 1,
            predicate: c.to_string(),
            key: canonical_form(c).to_string(),
        })
        .collect();

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&conditions)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            for c in &conditions {
                println!("[{}] {}    (key: {})", c.index, c.predicate, c.key);
            }
        }
    }
}
