pub(crate) mod check;
pub(crate) mod validate;

use std::path::Path;
use std::process;

use intake_core::{Definition, FilterSet};

use crate::{report_error, OutputFormat};

/// Read and parse a JSON file, exiting with a reported error on failure.
pub(crate) fn read_json(
    path: &Path,
    what: &str,
    output: OutputFormat,
    quiet: bool,
) -> serde_json::Value {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => {
            let msg = format!("error: {} file not found: {}", what, path.display());
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error: invalid JSON in {}: {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Load a definition document into a filter set, exiting on failure.
pub(crate) fn load_definition(path: &Path, output: OutputFormat, quiet: bool) -> FilterSet {
    tracing::debug!(path = %path.display(), "loading definition");
    let json = read_json(path, "definition", output, quiet);
    match Definition::from_json(&json).and_then(|definition| definition.build()) {
        Ok(set) => set,
        Err(e) => {
            let msg = format!("definition error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}
