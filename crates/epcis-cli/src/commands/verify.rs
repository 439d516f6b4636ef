//! Verify command implementation.

use epcis_core::verify_event_id;
use serde_json::json;

use crate::input::{load_config, load_document};
use crate::output::{print_table_header, truncate};
use crate::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Ok,
    Mismatch,
    Missing,
    Invalid,
}

pub fn run(
    source: &Source,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(source)?;
    let document = load_document(source, &config)?;

    let mut results = Vec::new();
    for (index, (event, context)) in document.scoped_events().enumerate() {
        let verdict = match (event.event_id(), verify_event_id(event, context)) {
            (None, _) => Verdict::Missing,
            (Some(_), Ok(true)) => Verdict::Ok,
            (Some(_), Ok(false)) => Verdict::Mismatch,
            (Some(claimed), Err(e)) => {
                if !json_output {
                    eprintln!("Error verifying event {} ({}): {}", index, claimed, e);
                }
                Verdict::Invalid
            }
        };
        tracing::debug!(index, ?verdict, "verified event");
        results.push((index, event.event_id().unwrap_or("?"), event.event_type(), verdict));
    }

    let all_ok = results.iter().all(|(_, _, _, v)| *v == Verdict::Ok);

    if json_output {
        let json_results: Vec<_> = results
            .iter()
            .map(|(index, id, ty, verdict)| {
                json!({
                    "index": index,
                    "eventID": id,
                    "type": ty.as_str(),
                    "verdict": format!("{:?}", verdict)
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_results)?);
    } else {
        print_table_header(&["#", "TYPE", "VERDICT", "EVENT_ID"]);
        for (index, id, ty, verdict) in &results {
            println!(
                "{:<5} {:<22} {:<10} {}",
                index,
                truncate(ty.as_str(), 22),
                format!("{:?}", verdict),
                truncate(id, 90)
            );
        }
    }

    if strict && !all_ok {
        let failed = results.iter().filter(|(_, _, _, v)| *v != Verdict::Ok).count();
        return Err(format!("{} of {} event(s) did not verify", failed, results.len()).into());
    }

    Ok(())
}
