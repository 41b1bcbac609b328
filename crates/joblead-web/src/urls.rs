//! Display helpers for stored URLs.

/// Extract the host for display, falling back to the input when it does
/// not look like a URL.
pub fn domain_of(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let without_scheme = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme);
    if host.is_empty() {
        url.to_string()
    } else {
        host.to_string()
    }
}

/// Repair stored links for rendering: trim wrapping parens/whitespace and
/// default to https when no scheme is present.
pub fn ensure_protocol(url: &str) -> String {
    let url = url.trim_matches(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '\0'));
    if url.is_empty() {
        return String::new();
    }
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else if url.starts_with("//") {
        format!("https:{url}")
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_extraction() {
        assert_eq!(domain_of("https://jobs.example.com/posting/7?x=1"), "jobs.example.com");
        assert_eq!(domain_of("example.com/path"), "example.com");
        assert_eq!(domain_of(""), "");
    }

    #[test]
    fn protocol_repair() {
        assert_eq!(ensure_protocol("example.com"), "https://example.com");
        assert_eq!(ensure_protocol("//example.com"), "https://example.com");
        assert_eq!(ensure_protocol("(https://example.com)"), "https://example.com");
        assert_eq!(ensure_protocol("http://example.com"), "http://example.com");
    }
}
