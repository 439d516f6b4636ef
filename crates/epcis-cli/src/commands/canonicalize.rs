//! Canonicalize command implementation.

use epcis_canonical::Canonicalizer;
use serde_json::json;

use crate::input::{load_config, load_document};
use crate::Source;

pub fn run(source: &Source, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(source)?;
    let document = load_document(source, &config)?;

    let mut results = Vec::new();
    for (index, (event, context)) in document.scoped_events().enumerate() {
        let stream = Canonicalizer::new(context).canonicalize_with_report(&event.canonical_input());
        if json_output {
            results.push(json!({
                "index": index,
                "type": event.event_type().as_str(),
                "tokens": stream.tokens,
                "report": stream.report,
            }));
            continue;
        }

        println!(
            "# event {} {} ({:?})",
            index,
            event.event_type(),
            stream.report.status
        );
        for (position, token) in stream.tokens.iter().enumerate() {
            let parent = token
                .parent
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            let name = token
                .name
                .as_ref()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:>4} {}{} [{}] parent={} {} = {}",
                position,
                "  ".repeat(token.depth as usize),
                token.tag.as_byte() as char,
                token.depth,
                parent,
                name,
                token.value
            );
        }
        for issue in &stream.report.issues {
            println!("  ! {} at {}: {}", issue.code.as_str(), issue.path, issue.message);
        }
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    Ok(())
}
