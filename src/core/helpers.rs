use regex::Regex;
use std::sync::OnceLock;

pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Time-derived id: current Unix milliseconds, bumped past any id the
/// collection already holds.
pub fn next_id<'a>(taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: Vec<&str> = taken.into_iter().collect();
    let mut candidate = chrono::Utc::now().timestamp_millis();
    while taken.iter().any(|id| *id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

/// Splits a comma-separated tag field. Blank entries are dropped; duplicates
/// are kept in the order given.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn email_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Regex should compile"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_skips_taken_values() {
        let first = next_id(std::iter::empty());
        let second = next_id([first.as_str()]);
        assert_ne!(first, second);
        assert!(second.parse::<i64>().unwrap() > first.parse::<i64>().unwrap());
    }

    #[test]
    fn next_id_is_numeric() {
        assert!(next_id(["sample-1", "sample-2"]).parse::<i64>().is_ok());
    }

    #[test]
    fn parse_tags_trims_and_drops_blanks() {
        assert_eq!(
            parse_tags(" Rust, WASM ,, Rust ,"),
            vec!["Rust".to_string(), "WASM".to_string(), "Rust".to_string()]
        );
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no spaces@x.com"));
    }
}
