use serde_json::Value;

/// Key output fields, most important first
const PRIORITY_KEYS: [&str; 5] = ["verdict", "min_rent_for_gm1", "value", "annual_profit", "gm1"];

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // One line per scenario or sensitivity step, labelled
    if let Value::Array(rows) = result_obj {
        for row in rows {
            let label = row.get("scenario").or_else(|| row.get("change"));
            match (label, key_value(row)) {
                (Some(label), Some(val)) => {
                    println!("{}: {}", format_minimal(label), format_minimal(val))
                }
                _ => println!("{}", format_minimal(row)),
            }
        }
        return;
    }

    if let Some(val) = key_value(result_obj) {
        println!("{}", format_minimal(val));
        return;
    }

    if let Value::Object(map) = result_obj {

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Not an object, just print directly
    println!("{}", format_minimal(result_obj));
}

/// First non-null priority field of an object.
fn key_value(value: &Value) -> Option<&Value> {
    let map = value.as_object()?;
    PRIORITY_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|val| !val.is_null())
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
