use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ADDRESS_DOMAIN: Regex = Regex::new(r"@([A-Za-z0-9_.\-]+)").unwrap();
}

/// Extract the lower-cased domain from anything shaped like an address.
///
/// Accepts bare addresses as well as `"Name" <user@domain>` forms. Returns an
/// empty string when no `@domain` run is present.
pub fn domain_of(address_like: &str) -> String {
    ADDRESS_DOMAIN
        .captures(address_like)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_default()
}
