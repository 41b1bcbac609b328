//! Scrubbing of LLM citation artifacts and tracking junk from imported
//! values. Pure functions; malformed input comes back best-effort cleaned,
//! never as an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static CITATION_INDEXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[oai_citation:\d+[‡†]\S+?\]").expect("valid regex"));
static CITATION_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[oai_citation[^\]]*\]").expect("valid regex"));
static SCROLL_TEXT_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#:~:text=[^&\s]*").expect("valid regex"));
static SCROLL_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#:~:\S*").expect("valid regex"));

/// Remove inline citation markers (`[oai_citation:1‡example.com]` and the
/// looser `[oai_citation...]` form) and trim surrounding whitespace.
pub fn clean_text(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let cleaned = CITATION_INDEXED.replace_all(input, "");
    let cleaned = CITATION_ANY.replace_all(&cleaned, "");
    cleaned.trim().to_string()
}

/// Clean a URL: citation markers, wrapping parentheses, scroll-to-text
/// fragment directives, and tracking query parameters. Every other query
/// parameter and fragment survives.
pub fn clean_url(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let url = clean_text(input);
    let url = trim_wrapping(&url);
    let url = SCROLL_TEXT_DIRECTIVE.replace_all(url, "");
    let url = SCROLL_DIRECTIVE.replace_all(&url, "");
    strip_tracking_params(&url).trim().to_string()
}

/// Recursively clean every string leaf of a JSON structure. URL-shaped
/// strings additionally go through [`clean_url`].
pub fn clean_all_fields(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let cleaned = clean_text(&s);
            Value::String(if looks_like_url(&cleaned) {
                clean_url(&cleaned)
            } else {
                cleaned
            })
        }
        Value::Array(items) => Value::Array(items.into_iter().map(clean_all_fields).collect()),
        Value::Object(map) => Value::Object(clean_object(map)),
        other => other,
    }
}

/// [`clean_all_fields`] over an object's values, keeping keys untouched.
pub fn clean_object(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (key, clean_all_fields(value)))
        .collect()
}

fn looks_like_url(s: &str) -> bool {
    let probe = trim_wrapping(s).to_ascii_lowercase();
    probe.starts_with("http://") || probe.starts_with("https://")
}

fn trim_wrapping(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '\0'))
}

fn is_tracking_param(param: &str) -> bool {
    ["utm_", "ref", "source", "campaign"]
        .iter()
        .any(|prefix| param.starts_with(prefix))
}

fn strip_tracking_params(url: &str) -> String {
    let Some((base, rest)) = url.split_once('?') else {
        return url.to_string();
    };
    let (query, fragment) = match rest.split_once('#') {
        Some((query, fragment)) => (query, Some(fragment)),
        None => (rest, None),
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|param| !param.is_empty() && !is_tracking_param(param))
        .collect();

    let mut out = base.to_string();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn citation_markers_are_removed_completely() {
        let input = "Acme expanded [oai_citation:1‡finance.yahoo.com] into Europe \
                     [oai_citation:2†reuters.com] last year";
        let cleaned = clean_text(input);
        assert!(!cleaned.contains("oai_citation"));
        assert_eq!(cleaned, "Acme expanded  into Europe  last year");
    }

    #[test]
    fn loose_citation_form_is_also_removed() {
        let cleaned = clean_text("growth [oai_citation: see sources] continues");
        assert!(!cleaned.contains("oai_citation"));
    }

    #[test]
    fn empty_text_passes_through() {
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn tracking_params_stripped_others_kept() {
        assert_eq!(
            clean_url("https://x.com/a?utm_source=x&b=1"),
            "https://x.com/a?b=1"
        );
        assert_eq!(
            clean_url("https://x.com/a?b=1&ref=homepage&campaign_id=9"),
            "https://x.com/a?b=1"
        );
        assert_eq!(
            clean_url("https://x.com/a?utm_source=x&utm_medium=y"),
            "https://x.com/a"
        );
    }

    #[test]
    fn scroll_to_text_fragments_are_stripped() {
        assert_eq!(
            clean_url("https://x.com/page#:~:text=hiring%20now"),
            "https://x.com/page"
        );
        // Ordinary fragments survive.
        assert_eq!(clean_url("https://x.com/page#team"), "https://x.com/page#team");
    }

    #[test]
    fn wrapping_parens_and_whitespace_are_trimmed() {
        assert_eq!(clean_url(" (https://x.com/a) "), "https://x.com/a");
    }

    #[test]
    fn recursive_cleaning_hits_nested_strings() {
        let input = json!({
            "Company": "Acme [oai_citation:3‡example.com]",
            "Contacts": [
                {"Name": "Dana", "Source": "(https://x.com/p?utm_source=feed)"}
            ],
            "Fit Score": 7
        });
        let cleaned = clean_all_fields(input);
        assert_eq!(cleaned["Company"], "Acme");
        assert_eq!(cleaned["Contacts"][0]["Source"], "https://x.com/p");
        assert_eq!(cleaned["Fit Score"], 7);
    }

    #[test]
    fn non_url_strings_skip_url_cleaning() {
        // A sentence mentioning params keeps its text.
        let cleaned = clean_all_fields(json!("budget ref: utm_source planning"));
        assert_eq!(cleaned, "budget ref: utm_source planning");
    }
}
