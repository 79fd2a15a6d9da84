//! Authentication-Results verdict extraction
//!
//! Receiving servers fold SPF, DKIM and DMARC outcomes into one free-text
//! `Authentication-Results` value whose layout varies by vendor. Each
//! mechanism is searched for independently and the first match wins.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref SPF_RESULT: Regex = Regex::new(r"(?i-u)spf=(pass|fail|softfail|neutral|none)").unwrap();
    static ref DKIM_RESULT: Regex = Regex::new(r"(?i-u)dkim=(pass|fail|neutral|none)").unwrap();
    static ref DMARC_RESULT: Regex =
        Regex::new(r"(?i-u)dmarc=(pass|fail|bestguesspass|none)").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthVerdict {
    Pass,
    Fail,
    SoftFail,
    Neutral,
    None,
    BestGuessPass,
    #[default]
    Unknown,
}

/// How a verdict should be presented to an analyst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictTone {
    Good,
    Bad,
    Neutral,
}

impl AuthVerdict {
    fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "pass" => AuthVerdict::Pass,
            "fail" => AuthVerdict::Fail,
            "softfail" => AuthVerdict::SoftFail,
            "neutral" => AuthVerdict::Neutral,
            "none" => AuthVerdict::None,
            "bestguesspass" => AuthVerdict::BestGuessPass,
            _ => AuthVerdict::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthVerdict::Pass => "pass",
            AuthVerdict::Fail => "fail",
            AuthVerdict::SoftFail => "softfail",
            AuthVerdict::Neutral => "neutral",
            AuthVerdict::None => "none",
            AuthVerdict::BestGuessPass => "bestguesspass",
            AuthVerdict::Unknown => "unknown",
        }
    }

    pub fn tone(&self) -> VerdictTone {
        match self {
            AuthVerdict::Pass | AuthVerdict::BestGuessPass => VerdictTone::Good,
            AuthVerdict::Fail | AuthVerdict::SoftFail => VerdictTone::Bad,
            _ => VerdictTone::Neutral,
        }
    }
}

impl fmt::Display for AuthVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthResults {
    pub spf: AuthVerdict,
    pub dkim: AuthVerdict,
    pub dmarc: AuthVerdict,
}

fn first_verdict(pattern: &Regex, value: &str) -> AuthVerdict {
    pattern
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| AuthVerdict::from_token(m.as_str()))
        .unwrap_or_default()
}

/// Pull SPF, DKIM and DMARC verdicts out of a raw `Authentication-Results` value.
pub fn extract_auth(auth_results: &str) -> AuthResults {
    let results = AuthResults {
        spf: first_verdict(&SPF_RESULT, auth_results),
        dkim: first_verdict(&DKIM_RESULT, auth_results),
        dmarc: first_verdict(&DMARC_RESULT, auth_results),
    };

    log::debug!(
        "Authentication verdicts: spf={} dkim={} dmarc={}",
        results.spf,
        results.dkim,
        results.dmarc
    );
    results
}
