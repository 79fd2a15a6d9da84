//! Analysis pipeline
//!
//! `analyze` is a pure, total function over the two pasted inputs. Missing or
//! malformed pieces fall back to empty strings, `unknown` verdicts, `false`
//! and an empty URL list.

use crate::features::authentication_results::{extract_auth, AuthVerdict};
use crate::features::link_analyzer::extract_urls;
use crate::features::sender_alignment::check_alignment;
use crate::header_map::HeaderMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub from: String,
    pub return_path: String,
    pub spf: AuthVerdict,
    pub dkim: AuthVerdict,
    pub dmarc: AuthVerdict,
    pub from_mismatch: bool,
    pub urls: Vec<String>,
}

pub fn analyze(headers_raw: &str, body_raw: &str) -> AnalysisResult {
    let headers = HeaderMap::parse(headers_raw);

    let from = headers.first("From").unwrap_or_default().to_string();
    let return_path = headers.first("Return-Path").unwrap_or_default().to_string();
    let auth_value = headers.first("Authentication-Results").unwrap_or_default();

    let auth = extract_auth(auth_value);
    let from_mismatch = check_alignment(&from, &return_path);
    let urls = extract_urls(body_raw);

    AnalysisResult {
        from,
        return_path,
        spf: auth.spf,
        dkim: auth.dkim,
        dmarc: auth.dmarc,
        from_mismatch,
        urls,
    }
}

/// Same as [`analyze`], treating absent inputs as empty text.
pub fn analyze_opt(headers_raw: Option<&str>, body_raw: Option<&str>) -> AnalysisResult {
    analyze(headers_raw.unwrap_or_default(), body_raw.unwrap_or_default())
}

struct MemoEntry {
    headers_raw: String,
    body_raw: String,
    result: Arc<AnalysisResult>,
}

/// Remembers the last input pair so an unchanged re-run skips the work.
#[derive(Default)]
pub struct MemoizedAnalyzer {
    last: Mutex<Option<MemoEntry>>,
}

impl MemoizedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&self, headers_raw: &str, body_raw: &str) -> Arc<AnalysisResult> {
        // A poisoned slot only holds a stale cache entry; recompute over it.
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(entry) = last.as_ref() {
            if entry.headers_raw == headers_raw && entry.body_raw == body_raw {
                log::debug!("Analysis cache hit");
                return Arc::clone(&entry.result);
            }
        }

        let result = Arc::new(analyze(headers_raw, body_raw));
        *last = Some(MemoEntry {
            headers_raw: headers_raw.to_string(),
            body_raw: body_raw.to_string(),
            result: Arc::clone(&result),
        });
        result
    }
}
