//! URL Normalization
//!
//! Turns raw pasted text into well-formed absolute URLs. Validation failures
//! are reported as `None`, not errors, so batch callers can tell which
//! inputs were rejected without aborting the rest.

use url::Url;

/// Normalize one candidate URL.
///
/// - Absolute `http`/`https` URLs are returned unchanged (aside from the
///   surrounding whitespace trim).
/// - Scheme-less input is retried with an `https://` prefix and accepted
///   only if it then parses with a host.
/// - Anything else (other schemes, interior whitespace, garbage) is `None`.
pub fn normalize(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(trimmed.to_string()),
        Ok(_) => None,
        Err(_) => {
            let prefixed = format!("https://{}", trimmed);
            match Url::parse(&prefixed) {
                Ok(parsed) if parsed.host_str().is_some() => Some(prefixed),
                _ => None,
            }
        }
    }
}

/// Split raw pasted text into URL candidates.
///
/// Pastes commonly carry several links separated by newlines, spaces or
/// commas; each candidate still goes through [`normalize`] individually.
pub fn split_input(input: &str) -> Vec<&str> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Hostname of a URL, if it parses
pub fn hostname_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_unchanged() {
        assert_eq!(
            normalize("https://example.com/path?q=1"),
            Some("https://example.com/path?q=1".to_string())
        );
        assert_eq!(
            normalize("http://example.com"),
            Some("http://example.com".to_string())
        );
    }

    #[test]
    fn test_schemeless_gets_https_prefix() {
        assert_eq!(
            normalize("example.com"),
            Some("https://example.com".to_string())
        );
        assert_eq!(
            normalize("  example.com/a/b  "),
            Some("https://example.com/a/b".to_string())
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(normalize("not a url"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("javascript:alert(1)"), None);
        assert_eq!(normalize("ftp://example.com"), None);
    }

    #[test]
    fn test_split_input() {
        let parts = split_input("https://a.com, https://b.com\nhttps://c.com");
        assert_eq!(parts, vec!["https://a.com", "https://b.com", "https://c.com"]);
    }

    #[test]
    fn test_hostname_of() {
        assert_eq!(
            hostname_of("https://example.com/path"),
            Some("example.com".to_string())
        );
        assert_eq!(hostname_of("not a url"), None);
    }
}
