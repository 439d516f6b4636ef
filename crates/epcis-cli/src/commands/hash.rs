//! Hash command implementation.

use serde_json::json;

use crate::input::{load_config, load_document};
use crate::output::{print_table_header, truncate};
use crate::Source;

pub fn run(source: &Source, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(source)?;
    let document = load_document(source, &config)?;
    let ids = document.hash_events(&config.cbv_version)?;

    if json_output {
        let results: Vec<_> = document
            .events
            .iter()
            .zip(&ids)
            .enumerate()
            .map(|(index, (event, id))| {
                json!({
                    "index": index,
                    "type": event.event_type().as_str(),
                    "eventID": id.to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if ids.len() == 1 {
        println!("{}", ids[0]);
    } else {
        print_table_header(&["#", "TYPE", "EVENT_ID"]);
        for (index, (event, id)) in document.events.iter().zip(&ids).enumerate() {
            println!(
                "{:<5} {:<22} {}",
                index,
                truncate(event.event_type().as_str(), 22),
                id
            );
        }
    }
    Ok(())
}
