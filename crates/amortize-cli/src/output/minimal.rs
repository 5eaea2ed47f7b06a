use serde_json::Value;

use super::format_scalar;

/// Key output fields, in order of priority.
const PRIORITY_KEYS: [&str; 3] = ["monthly_payment", "total_payment", "total_interest"];

/// Print just the key answer value from the output.
///
/// For a loan this is the monthly payment. For a schedule it is one
/// `year balance` line per entry.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in &PRIORITY_KEYS {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_scalar(val));
                        return;
                    }
                }
            }

            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_scalar(val));
            }
        }
        Value::Array(rows) => {
            for row in rows {
                match (row.get("year"), row.get("balance")) {
                    (Some(year), Some(balance)) => {
                        println!("{} {}", format_scalar(year), format_scalar(balance))
                    }
                    _ => println!("{}", format_scalar(row)),
                }
            }
        }
        other => println!("{}", format_scalar(other)),
    }
}
