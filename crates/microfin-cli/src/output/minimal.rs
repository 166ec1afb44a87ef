use serde_json::Value;

use super::format_scalar;

/// Key answer of each command, in priority order. Nested objects one level
/// down (a schedule's summary) are searched too.
const PRIORITY_KEYS: [&str; 7] = [
    "commission_amount",
    "monthly_projection",
    "total_commission",
    "arrears",
    "installment_amount",
    "total_payable",
    "agent_share_pct",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = lookup(map, key) {
                println!("{}", format_scalar(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result_obj));
}

fn lookup<'a>(map: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
        return Some(val);
    }
    map.values()
        .filter_map(Value::as_object)
        .find_map(|nested| nested.get(key).filter(|v| !v.is_null()))
}
