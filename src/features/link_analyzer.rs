use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

/// Upper bound on URLs reported for a single body.
pub const MAX_URLS: usize = 100;

lazy_static! {
    // Host needs at least one internal dot. Trailing punctuation such as a
    // sentence-ending period is part of the path class and is kept.
    static ref URL_PATTERN: Regex = Regex::new(
        r"(?i-u:https?)://[A-Za-z0-9_.\-]+\.[A-Za-z0-9_.\-]+[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=%]*"
    )
    .unwrap();
}

/// Find http(s) URLs in free-form text, in document order.
///
/// Duplicates are kept. Only the first [`MAX_URLS`] matches are returned.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut matches = URL_PATTERN.find_iter(text);
    let urls: Vec<String> = matches
        .by_ref()
        .take(MAX_URLS)
        .map(|m| m.as_str().to_string())
        .collect();

    if matches.next().is_some() {
        log::debug!("URL list truncated at {} entries", MAX_URLS);
    } else {
        log::debug!("Extracted {} URLs from body", urls.len());
    }
    urls
}

/// Distinct lower-cased hosts of the given URLs, in first-seen order.
///
/// URLs that do not parse are skipped.
pub fn link_hosts(urls: &[String]) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::new();

    for raw in urls {
        let host = match Url::parse(raw) {
            Ok(parsed) => parsed.host_str().map(|h| h.to_lowercase()),
            Err(e) => {
                log::debug!("Skipping unparsable URL {}: {}", raw, e);
                None
            }
        };

        if let Some(host) = host {
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }
    }

    hosts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_duplicates_preserved() {
        let urls = extract_urls(
            "visit http://evil.test/x and https://good.test?q=1 twice http://evil.test/x",
        );
        assert_eq!(
            urls,
            vec![
                "http://evil.test/x",
                "https://good.test?q=1",
                "http://evil.test/x"
            ]
        );
    }

    #[test]
    fn test_caps_at_first_hundred() {
        let body: String = (0..500)
            .map(|i| format!("link http://host{}.test/page ", i))
            .collect();
        let urls = extract_urls(&body);

        assert_eq!(urls.len(), MAX_URLS);
        assert_eq!(urls[0], "http://host0.test/page");
        assert_eq!(urls[99], "http://host99.test/page");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert_eq!(
            extract_urls("go to HTTPS://Login.Example.test/verify now"),
            vec!["HTTPS://Login.Example.test/verify"]
        );
    }

    #[test]
    fn test_scheme_and_host_reject_unicode_lookalikes() {
        // U+212A (Kelvin sign) and U+017F (long s) fold to ASCII letters
        assert!(extract_urls("go http://\u{212A}ey.test/x and http\u{017F}://evil.test/y").is_empty());
        assert_eq!(
            extract_urls("http\u{017F}://evil.test/y then https://ok.test/z"),
            vec!["https://ok.test/z"]
        );
    }

    #[test]
    fn test_host_needs_a_dot() {
        assert!(extract_urls("http://localhost/admin").is_empty());
        assert!(extract_urls("ftp://files.example.test/x").is_empty());
        assert!(extract_urls("").is_empty());
    }

    #[test]
    fn test_trailing_punctuation_is_kept() {
        assert_eq!(
            extract_urls("Reset here: https://bad.test/reset."),
            vec!["https://bad.test/reset."]
        );
    }

    #[test]
    fn test_stops_at_characters_outside_url_set() {
        assert_eq!(
            extract_urls("<a href=\"http://track.test/c?id=9&u=%41\">click</a>"),
            vec!["http://track.test/c?id=9&u=%41"]
        );
    }

    #[test]
    fn test_link_hosts_distinct_in_order() {
        let urls = vec![
            "http://Evil.test/x".to_string(),
            "https://good.test?q=1".to_string(),
            "http://evil.test/y".to_string(),
        ];
        assert_eq!(link_hosts(&urls), vec!["evil.test", "good.test"]);
    }
}
