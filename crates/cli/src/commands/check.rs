use std::path::Path;

use intake_core::{Filter, FilterSet};

use super::load_definition;
use crate::OutputFormat;

pub(crate) fn cmd_check(definition_path: &Path, output: OutputFormat, quiet: bool) {
    let set = load_definition(definition_path, output, quiet);
    if quiet {
        return;
    }

    match output {
        OutputFormat::Json => {
            let listing = serde_json::json!({ "filters": filters_json(&set) });
            println!(
                "{}",
                serde_json::to_string_pretty(&listing)
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
        OutputFormat::Text => {
            let mut lines = Vec::new();
            describe(&set, 0, &mut lines);
            for line in lines {
                println!("{}", line);
            }
            println!(
                "{}: {} filter(s) OK",
                definition_path.display(),
                set.len()
            );
        }
    }
}

fn describe(set: &FilterSet, depth: usize, lines: &mut Vec<String>) {
    for filter in set {
        let mut line = format!("{}{}: {}", "  ".repeat(depth), filter.name(), filter.tag());
        if let Some(format) = filter.format() {
            line.push_str(&format!(" [format {}]", format));
        }
        if filter.has_default() {
            line.push_str(" (optional)");
        }
        if let Some(desc) = filter.desc() {
            line.push_str(&format!(" -- {}", desc));
        }
        lines.push(line);
        describe(filter.children(), depth + 1, lines);
    }
}

fn filters_json(set: &FilterSet) -> serde_json::Value {
    set.iter().map(filter_json).collect()
}

fn filter_json(filter: &Filter) -> serde_json::Value {
    let mut entry = serde_json::Map::new();
    entry.insert("name".to_string(), serde_json::json!(filter.name()));
    entry.insert("type".to_string(), serde_json::json!(filter.tag().as_str()));
    entry.insert("optional".to_string(), serde_json::json!(filter.has_default()));
    if let Some(format) = filter.format() {
        entry.insert("format".to_string(), serde_json::json!(format));
    }
    if let Some(desc) = filter.desc() {
        entry.insert("desc".to_string(), serde_json::json!(desc));
    }
    if !filter.children().is_empty() {
        entry.insert("children".to_string(), filters_json(filter.children()));
    }
    serde_json::Value::Object(entry)
}
