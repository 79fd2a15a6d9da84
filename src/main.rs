use anyhow::Context;
use clap::parser::ValueSource;
use clap::{Arg, Command};
use log::LevelFilter;
use phishguard::{
    analyze, extract_urls, link_hosts, split_message, AnalysisResult, AuthVerdict, Config,
    FeatureAnalysis, FeatureEngine, OutputFormat, VerdictTone,
};
use serde::Serialize;
use std::io::Read;
use std::process;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    analysis: &'a AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_hosts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signals: Option<FeatureAnalysis>,
}

fn main() {
    let matches = Command::new("phishguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Quick phishing triage for raw email headers and bodies")
        .long_about(
            "PhishGuard extracts advisory signals from a suspicious message:\n\
             • SPF, DKIM and DMARC verdicts from Authentication-Results\n\
             • From / Return-Path domain alignment\n\
             • Links found in the body\n\
             Always validate with the header trace, DMARC policy and user context.",
        )
        .arg(
            Arg::new("headers")
                .long("headers")
                .value_name("FILE")
                .help("Raw SMTP headers ('-' for stdin)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("body")
                .long("body")
                .value_name("FILE")
                .help("Message body ('-' for stdin)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("email")
                .long("email")
                .value_name("FILE")
                .help("Complete message; headers and body are split at the first blank line")
                .conflicts_with_all(["headers", "body"])
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("scan-urls")
                .long("scan-urls")
                .help("Only list the URLs found in the body")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the report as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("phishguard.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or_default();
    let config_given = matches.value_source("config") == Some(ValueSource::CommandLine);

    let mut config = match load_config(config_path, config_given) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };
    if matches.get_flag("json") {
        config.output = OutputFormat::Json;
    }

    let (headers_raw, body_raw) = match read_inputs(&matches) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("❌ {e:#}");
            process::exit(1);
        }
    };

    let outcome = if matches.get_flag("scan-urls") {
        print_urls(&config, &extract_urls(&body_raw))
    } else {
        print_report(&config, &analyze(&headers_raw, &body_raw))
    };

    if let Err(e) = outcome {
        eprintln!("❌ {e:#}");
        process::exit(1);
    }
}

fn load_config(path: &str, explicit: bool) -> anyhow::Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file(path).with_context(|| format!("reading config {path}"))
    } else {
        // The default path is usually absent; warn only for an explicit --config
        if explicit {
            log::warn!("Configuration file '{path}' not found, using default configuration");
        } else {
            log::debug!("Configuration file '{path}' not found, using default configuration");
        }
        Ok(Config::default())
    }
}

fn generate_default_config(path: &str) {
    match Config::default().to_file(path) {
        Ok(()) => println!("Default configuration written to: {path}"),
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn read_source(path: Option<&String>) -> anyhow::Result<String> {
    match path.map(String::as_str) {
        None => Ok(String::new()),
        Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            Ok(buffer)
        }
        Some(file) => std::fs::read_to_string(file).with_context(|| format!("reading {file}")),
    }
}

fn read_inputs(matches: &clap::ArgMatches) -> anyhow::Result<(String, String)> {
    if let Some(email) = matches.get_one::<String>("email") {
        let raw = read_source(Some(email))?;
        let (headers, body) = split_message(&raw);
        return Ok((headers.to_string(), body.to_string()));
    }

    let headers_path = matches.get_one::<String>("headers");
    let body_path = matches.get_one::<String>("body");
    check_single_stdin(headers_path, body_path)?;

    let headers = read_source(headers_path)?;
    let body = read_source(body_path)?;
    Ok((headers, body))
}

/// stdin can only be consumed once.
fn check_single_stdin(headers: Option<&String>, body: Option<&String>) -> anyhow::Result<()> {
    if headers.map(String::as_str) == Some("-") && body.map(String::as_str) == Some("-") {
        anyhow::bail!("--headers and --body cannot both read from stdin");
    }
    Ok(())
}

fn print_urls(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(urls)?),
        OutputFormat::Text => {
            if urls.is_empty() {
                println!("No links found.");
            }
            for url in urls {
                println!("{url}");
            }
        }
    }
    Ok(())
}

fn badge(verdict: AuthVerdict) -> String {
    let marker = match verdict.tone() {
        VerdictTone::Good => "✅",
        VerdictTone::Bad => "❌",
        VerdictTone::Neutral => "⚪",
    };
    format!("{marker} {verdict}")
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn print_report(config: &Config, result: &AnalysisResult) -> anyhow::Result<()> {
    let report = Report {
        analysis: result,
        link_hosts: config.show_link_hosts.then(|| link_hosts(&result.urls)),
        signals: config
            .show_signals
            .then(|| FeatureEngine::new().analyze(result)),
    };

    if config.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📧 Sender");
    println!("   From:        {}", or_dash(&result.from));
    println!("   Return-Path: {}", or_dash(&result.return_path));
    if result.from_mismatch {
        println!("   ⚠️  From and Return-Path domains differ");
    }
    println!();
    println!("🔐 Authentication");
    println!("   SPF:   {}", badge(result.spf));
    println!("   DKIM:  {}", badge(result.dkim));
    println!("   DMARC: {}", badge(result.dmarc));
    println!();
    println!("🔗 Links ({})", result.urls.len());
    for url in &result.urls {
        println!("   {url}");
    }
    if let Some(hosts) = &report.link_hosts {
        if !hosts.is_empty() {
            println!("   Hosts: {}", hosts.join(", "));
        }
    }

    if let Some(signals) = &report.signals {
        println!();
        println!(
            "📊 Advisory risk: {:?} (score {})",
            signals.risk_level, signals.total_score
        );
        for feature in &signals.scores {
            for evidence in &feature.evidence {
                println!("   • {}: {}", feature.feature_name, evidence);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_stdin_for_both_inputs() {
        let stdin = "-".to_string();
        let file = "headers.txt".to_string();

        assert!(check_single_stdin(Some(&stdin), Some(&stdin)).is_err());
        assert!(check_single_stdin(Some(&stdin), Some(&file)).is_ok());
        assert!(check_single_stdin(Some(&file), Some(&stdin)).is_ok());
        assert!(check_single_stdin(Some(&stdin), None).is_ok());
        assert!(check_single_stdin(None, None).is_ok());
    }

    #[test]
    fn test_missing_config_falls_back_to_default() {
        let config = load_config("/nonexistent/phishguard.yaml", true).unwrap();
        assert_eq!(config, Config::default());
    }
}
