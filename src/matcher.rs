/// URL prefix matching

/// True when `url` is known, non-empty and starts with any prefix.
///
/// Plain string comparison: no normalization, no scheme or host parsing,
/// no wildcards. A prefix equal to the whole URL matches.
pub fn url_matches_prefix<S: AsRef<str>>(url: Option<&str>, prefixes: &[S]) -> bool {
    match url {
        Some(url) if !url.is_empty() => prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_ref())),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: [&str; 1] = ["https://example.com"];

    #[test]
    fn test_prefix_match() {
        assert!(url_matches_prefix(Some("https://example.com/watch?v=1"), &EXAMPLE));
        assert!(!url_matches_prefix(Some("https://other.com"), &EXAMPLE));
    }

    #[test]
    fn test_full_url_matches_itself() {
        assert!(url_matches_prefix(Some("https://example.com"), &EXAMPLE));
    }

    #[test]
    fn test_empty_or_absent_url_never_matches() {
        assert!(!url_matches_prefix(Some(""), &EXAMPLE));
        assert!(!url_matches_prefix(None, &EXAMPLE));
        assert!(!url_matches_prefix(Some(""), &[""]));
    }

    #[test]
    fn test_no_prefixes_never_match() {
        let none: [&str; 0] = [];
        assert!(!url_matches_prefix(Some("https://example.com"), &none));
    }

    #[test]
    fn test_comparison_is_literal() {
        // No case folding or scheme handling
        assert!(!url_matches_prefix(Some("HTTPS://EXAMPLE.COM/a"), &EXAMPLE));
        assert!(!url_matches_prefix(Some("http://example.com/a"), &EXAMPLE));
        // Prefix is not host-aware
        assert!(url_matches_prefix(Some("https://example.com.evil.net"), &EXAMPLE));
    }

    #[test]
    fn test_any_of_several_prefixes() {
        let prefixes = vec![
            "https://a.com".to_string(),
            "https://b.com/music".to_string(),
        ];

        assert!(url_matches_prefix(Some("https://b.com/music/123"), &prefixes));
        assert!(!url_matches_prefix(Some("https://b.com/news"), &prefixes));
    }
}
