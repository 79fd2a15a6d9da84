pub mod authentication_results;
pub mod link_analyzer;
pub mod sender_alignment;

use crate::engine::AnalysisResult;
use authentication_results::AuthVerdict;
use serde::{Deserialize, Serialize};
use url::{Host, Url};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureScore {
    pub feature_name: String,
    pub score: i32,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureAnalysis {
    pub scores: Vec<FeatureScore>,
    pub total_score: i32,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    fn from_score(total_score: i32) -> Self {
        match total_score {
            score if score >= 100 => RiskLevel::Critical,
            score if score >= 50 => RiskLevel::High,
            score if score >= 20 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

/// One advisory signal computed from a finished analysis.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, result: &AnalysisResult) -> FeatureScore;
    fn name(&self) -> &str;
}

pub struct AuthenticationFeature;

impl FeatureExtractor for AuthenticationFeature {
    fn extract(&self, result: &AnalysisResult) -> FeatureScore {
        let mut score = 0;
        let mut evidence = Vec::new();

        let weights = [
            ("SPF", result.spf, -25, 20, 10),
            ("DKIM", result.dkim, -50, 30, 0),
            ("DMARC", result.dmarc, -30, 25, 0),
        ];

        for (mechanism, verdict, pass, fail, softfail) in weights {
            match verdict {
                AuthVerdict::Pass | AuthVerdict::BestGuessPass => {
                    score += pass;
                    evidence.push(format!("{} {}", mechanism, verdict));
                }
                AuthVerdict::Fail => {
                    score += fail;
                    evidence.push(format!("{} failed", mechanism));
                }
                AuthVerdict::SoftFail => {
                    score += softfail;
                    evidence.push(format!("{} softfail", mechanism));
                }
                AuthVerdict::Neutral | AuthVerdict::None => {
                    score += 5;
                    evidence.push(format!("{} {}", mechanism, verdict));
                }
                // No header or no recognizable result: nothing to claim
                AuthVerdict::Unknown => {}
            }
        }

        FeatureScore {
            feature_name: self.name().to_string(),
            score,
            evidence,
        }
    }

    fn name(&self) -> &str {
        "Authentication"
    }
}

pub struct SenderAlignmentFeature;

impl FeatureExtractor for SenderAlignmentFeature {
    fn extract(&self, result: &AnalysisResult) -> FeatureScore {
        let (score, evidence) = if result.from_mismatch {
            (
                30,
                vec![format!(
                    "From domain differs from Return-Path domain ({} vs {})",
                    crate::domain_utils::domain_of(&result.from),
                    crate::domain_utils::domain_of(&result.return_path)
                )],
            )
        } else {
            (0, Vec::new())
        };

        FeatureScore {
            feature_name: self.name().to_string(),
            score,
            evidence,
        }
    }

    fn name(&self) -> &str {
        "Sender Alignment"
    }
}

pub struct LinkFeature;

impl FeatureExtractor for LinkFeature {
    fn extract(&self, result: &AnalysisResult) -> FeatureScore {
        let mut score = 0;
        let mut evidence = Vec::new();

        if !result.urls.is_empty() {
            score += 5;
            evidence.push(format!("{} link(s) in body", result.urls.len()));
        }

        if result.urls.len() >= link_analyzer::MAX_URLS {
            score += 10;
            evidence.push(format!(
                "Link count reached the {} URL ceiling",
                link_analyzer::MAX_URLS
            ));
        }

        let ip_links = result
            .urls
            .iter()
            .filter(|raw| {
                Url::parse(raw)
                    .map(|u| matches!(u.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_))))
                    .unwrap_or(false)
            })
            .count();
        if ip_links > 0 {
            score += 25;
            evidence.push(format!("{} link(s) point at a bare IP address", ip_links));
        }

        FeatureScore {
            feature_name: self.name().to_string(),
            score,
            evidence,
        }
    }

    fn name(&self) -> &str {
        "Links"
    }
}

/// Runs every advisory extractor and totals the result.
pub struct FeatureEngine {
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureEngine {
    pub fn new() -> Self {
        Self {
            extractors: vec![
                Box::new(AuthenticationFeature),
                Box::new(SenderAlignmentFeature),
                Box::new(LinkFeature),
            ],
        }
    }

    pub fn analyze(&self, result: &AnalysisResult) -> FeatureAnalysis {
        let mut scores = Vec::new();
        let mut total_score = 0;

        for extractor in &self.extractors {
            let score = extractor.extract(result);
            log::debug!("Feature {}: {}", extractor.name(), score.score);
            total_score += score.score;
            scores.push(score);
        }

        FeatureAnalysis {
            scores,
            total_score,
            risk_level: RiskLevel::from_score(total_score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyze;

    #[test]
    fn test_spoofed_message_scores_high() {
        let result = analyze(
            "From: a@foo.com\nReturn-Path: b@bar.com\nAuthentication-Results: spf=fail dkim=fail dmarc=fail",
            "click http://192.168.10.4/login",
        );
        let analysis = FeatureEngine::new().analyze(&result);

        // 20 + 30 + 25 auth, 30 alignment, 5 + 25 links
        assert_eq!(analysis.total_score, 135);
        assert_eq!(analysis.risk_level, RiskLevel::Critical);
        assert_eq!(analysis.scores.len(), 3);
    }

    #[test]
    fn test_authenticated_message_scores_low() {
        let result = analyze(
            "From: a@foo.com\nReturn-Path: b@foo.com\nAuthentication-Results: spf=pass dkim=pass dmarc=pass",
            "see https://foo.com/account",
        );
        let analysis = FeatureEngine::new().analyze(&result);

        assert!(analysis.total_score < 0);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_empty_input_makes_no_claims() {
        let analysis = FeatureEngine::new().analyze(&analyze("", ""));
        assert_eq!(analysis.total_score, 0);
        assert!(analysis.scores.iter().all(|s| s.evidence.is_empty()));
    }

    #[test]
    fn test_alignment_evidence_names_domains() {
        let result = analyze("From: x@Foo.com\nReturn-Path: <y@bar.com>", "");
        let score = SenderAlignmentFeature.extract(&result);
        assert_eq!(score.score, 30);
        assert_eq!(
            score.evidence,
            vec!["From domain differs from Return-Path domain (foo.com vs bar.com)"]
        );
    }

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(RiskLevel::from_score(-10), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(20), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Critical);
    }
}
