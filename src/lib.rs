pub mod config;
pub mod domain_utils;
pub mod engine;
pub mod features;
pub mod header_map;

pub use config::{Config, OutputFormat};
pub use domain_utils::domain_of;
pub use engine::{analyze, analyze_opt, AnalysisResult, MemoizedAnalyzer};
pub use features::authentication_results::{extract_auth, AuthResults, AuthVerdict, VerdictTone};
pub use features::link_analyzer::{extract_urls, link_hosts, MAX_URLS};
pub use features::sender_alignment::check_alignment;
pub use features::{FeatureAnalysis, FeatureEngine, RiskLevel};
pub use header_map::{split_message, HeaderMap};
