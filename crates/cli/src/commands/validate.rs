use std::path::Path;
use std::process;

use intake_core::{process_json, Validated};

use super::{load_definition, read_json};
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_validate(
    definition_path: &Path,
    input_path: &Path,
    output: OutputFormat,
    quiet: bool,
) {
    let set = load_definition(definition_path, output, quiet);
    let input = read_json(input_path, "input", output, quiet);

    let validated = match process_json(&set, &input) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    if !quiet {
        print_result(&validated, output);
    }
    if !validated.is_valid() {
        process::exit(1);
    }
}

fn print_result(validated: &Validated, output: OutputFormat) {
    match output {
        OutputFormat::Json => {
            let result = if validated.is_valid() {
                serde_json::json!({
                    "valid": true,
                    "attributes": validated.attributes_json(),
                })
            } else {
                serde_json::json!({
                    "valid": false,
                    "errors": validated.report.to_json(),
                })
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&result)
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
        OutputFormat::Text => {
            if validated.is_valid() {
                for (name, value) in &validated.attributes {
                    println!("{} = {}", name, value.to_json());
                }
                println!("valid");
            } else {
                for message in validated.report.full_messages() {
                    println!("{}", message);
                }
                println!("invalid: {} error(s)", validated.report.len());
            }
        }
    }
}
