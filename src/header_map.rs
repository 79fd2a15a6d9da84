//! Raw header tokenizer.
//!
//! Turns pasted SMTP header text into an ordered, multi-valued map. Folded
//! (indented continuation) lines are not reassembled: a continuation line has
//! no key of its own and is dropped unless it happens to contain a colon.

use std::collections::HashMap;

/// Header name to every value seen for it, in source order.
///
/// Names are kept exactly as written; lookups are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, Vec<String>)>,
    // name -> position in `entries`
    index: HashMap<String, usize>,
}

impl HeaderMap {
    /// Parse raw header text. Never fails; lines without a `:` are ignored.
    pub fn parse(raw: &str) -> Self {
        let mut map = HeaderMap::default();
        let normalized = raw.replace('\r', "");

        for line in normalized.split('\n') {
            if let Some((key, value)) = line.split_once(':') {
                map.append(key.trim(), value.trim());
            }
        }

        log::debug!("Parsed {} distinct header names", map.len());
        map
    }

    fn append(&mut self, key: &str, value: &str) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1.push(value.to_string()),
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries
                    .push((key.to_string(), vec![value.to_string()]));
            }
        }
    }

    /// All values recorded for `name`, in the order they appeared.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.index
            .get(name)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// First value recorded for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get_all(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Header names in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split a full message into its header block and body at the first blank line.
///
/// A message with no blank line is treated as all headers.
pub fn split_message(raw: &str) -> (&str, &str) {
    let crlf = raw.find("\r\n\r\n").map(|pos| (pos, 4));
    let lf = raw.find("\n\n").map(|pos| (pos, 2));

    match crlf.into_iter().chain(lf).min_by_key(|(pos, _)| *pos) {
        Some((pos, len)) => (&raw[..pos], &raw[pos + len..]),
        None => (raw, ""),
    }
}
