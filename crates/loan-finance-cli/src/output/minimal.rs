use serde_json::Value;

use super::format_scalar;

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 8] = [
    "status",
    "is_affordable",
    "max_principal",
    "monthly_payment",
    "cheaper_policy",
    "suggested_term",
    "options",
    "allowed_terms",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    println!("{}", minimal_text(key, val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val, "null"));
            return;
        }
    }

    println!("{}", format_scalar(result_obj, "null"));
}

fn minimal_text(key: &str, value: &Value) -> String {
    match (key, value) {
        // One "term: payment" pair per line
        ("options", Value::Array(rows)) => rows
            .iter()
            .map(|row| {
                format!(
                    "{}: {}",
                    format_scalar(&row["term_months"], "?"),
                    format_scalar(&row["monthly_payment"], "?")
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        ("allowed_terms", Value::Array(terms)) => terms
            .iter()
            .map(|t| format_scalar(t, "?"))
            .collect::<Vec<_>>()
            .join(" "),
        _ => format_scalar(value, "null"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_one_line_per_term() {
        let rows = json!([
            { "term_months": 2, "monthly_payment": "157.50" },
            { "term_months": 3, "monthly_payment": "110.00" },
        ]);
        assert_eq!(minimal_text("options", &rows), "2: 157.50\n3: 110.00");
    }

    #[test]
    fn test_terms_space_separated() {
        assert_eq!(minimal_text("allowed_terms", &json!([2, 3, 24])), "2 3 24");
    }
}
