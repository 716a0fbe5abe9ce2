use serde_json::Value;
use std::io::{self, Read};

/// JSON piped on stdin, if any. An interactive terminal or blank input means
/// the command should fall back to its flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    parse_piped(io::stdin().lock())
}

fn parse_piped<R: Read>(mut reader: R) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Piped input is not valid JSON: {e}"))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_falls_back_to_flags() {
        assert!(parse_piped("  \n".as_bytes()).unwrap().is_none());
    }

    #[test]
    fn test_piped_quote_request() {
        let piped = r#"{"principal": "300", "term_months": 6, "interest_policy": "flat"}"#;
        let value = parse_piped(piped.as_bytes()).unwrap().unwrap();
        assert_eq!(value["term_months"], 6);
        assert_eq!(value["interest_policy"], "flat");
    }

    #[test]
    fn test_malformed_input_reports_error() {
        let err = parse_piped("principal=300".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
