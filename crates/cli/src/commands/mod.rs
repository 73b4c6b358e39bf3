mod check;
mod extract;
mod split;
mod validate;

pub(crate) use check::cmd_check;
pub(crate) use extract::cmd_extract;
pub(crate) use split::cmd_split;
pub(crate) use validate::cmd_validate;

use std::path::Path;
use std::process;

use condex_core::{Model, TypeEnvironments};

use crate::{report_error, OutputFormat};

/// Load a model and build its type environments, exiting on failure.
fn load_model(path: &Path, output: OutputFormat, quiet: bool) -> (Model, TypeEnvironments) {
    let model = match Model::load(path) {
        Ok(m) => m,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };
    tracing::debug!(
        model = %model.name,
        events = model.events.len(),
        guards = model.guard_count(),
        "model loaded"
    );
    match TypeEnvironments::build(&model) {
        Ok(envs) => (model, envs),
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}
