//! Basic dissect engine usage.
//!
//! Compiles a tokenizer, dissects a few lines directly, then runs a pattern
//! through a processor configured from YAML.

use dissect_engine::{DissectError, DissectProcessor, Dissector};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    println!("Dissect Engine Basic Usage");
    println!("==========================\n");

    direct_dissect_example()?;
    println!();

    processor_example()?;

    Ok(())
}

/// Dissect strings without any event plumbing.
fn direct_dissect_example() -> anyhow::Result<()> {
    println!("=== Direct Dissect ===");

    let dissector = Dissector::new("%{ts} %{level->} %{?key}=%{&key} %{msg}")?;
    for line in [
        "2024-01-01T10:00:00Z INFO  user=alice logged in",
        "2024-01-01T10:00:01Z WARN  host=db02 replication lag",
        "garbage",
    ] {
        match dissector.dissect(line) {
            Ok(result) => println!("{line:?} -> {}", serde_json::to_string(&result)?),
            Err(DissectError::NoMatch { expected, offset }) => {
                println!("{line:?} -> no match (expected {expected:?} at {offset})")
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// Run a YAML-configured processor over JSON events.
fn processor_example() -> anyhow::Result<()> {
    println!("=== Processor ===");

    let processor = DissectProcessor::from_yaml(
        r#"
tokenizer: "%{client} [%{ts}] \"%{verb} %{path}\" %{status}"
field: message
target_prefix: http
ignore_failure: true
"#,
    )?;
    println!("{processor}");

    let mut events = vec![
        json!({"message": "10.0.0.1 [10/Oct/2000:13:55:36] \"GET /index.html\" 200"}),
        json!({"message": "not an access log line"}),
    ];

    for event in events.iter_mut() {
        processor.run(event)?;
        println!("{}", serde_json::to_string_pretty(&*event)?);
    }

    Ok(())
}
