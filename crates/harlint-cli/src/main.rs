use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use url::Url;

use harlint_core::har::model::CaptureRecord;
use harlint_core::har::{CaptureInfo, read_capture};
use harlint_core::knowledge::{KnowledgeReport, Severity, render};
use harlint_core::lint::{RuleCategory, Ruleset, RulesetConfig};
use harlint_core::pipeline::{CaptureEvent, MessageBus, MessageMeta, PageAnalysis, Pipeline};
use harlint_core::session::GroupState;
use harlint_core::util::OrderedMap;
use harlint_core::{SCHEMA_VERSION, TOOL_NAME};

mod args;
mod linter;

/// Stable JSON envelope around one CLI run.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    schema_version: &'static str,
    tool: ToolInfo,
    captures: &'a [CaptureInfo],
    pages: &'a [PageAnalysis],
    groups: &'a OrderedMap<GroupState>,
}

#[derive(Debug, Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

/// Bus backing the binary: downstream publication is the rendered output,
/// so dispatched messages only surface in the log.
struct LogBus;

impl MessageBus for LogBus {
    fn send(&mut self, name: &str, _payload: serde_json::Value, meta: MessageMeta) -> Result<()> {
        tracing::debug!(
            name,
            url = meta.url.as_deref().unwrap_or_default(),
            group = meta.group.as_deref().unwrap_or_default(),
            "message dispatched"
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = args::Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let rulesets = vec![
        load_ruleset(
            RuleCategory::Security,
            args.security_config.as_deref(),
            Ruleset::security,
        )?,
        load_ruleset(
            RuleCategory::Standard,
            args.standard_config.as_deref(),
            Ruleset::standard,
        )?,
    ];

    let mut pipeline = Pipeline::with_rulesets(linter::PatternLinter::new()?, rulesets);
    let mut bus = LogBus;

    let mut captures = Vec::new();
    let mut pages = Vec::new();
    for path in &args.har_paths {
        let ctx = read_capture(path)?;
        tracing::info!(
            path = %path.display(),
            size_bytes = ctx.size_bytes,
            hash = %ctx.hash_hex,
            "capture loaded"
        );

        let url = args
            .url
            .clone()
            .or_else(|| first_request_url(&ctx.record))
            .unwrap_or_else(|| "about:blank".to_string());
        let group = args.group.clone().unwrap_or_else(|| host_of(&url));

        captures.push(ctx.info());
        let event = CaptureEvent {
            url,
            group,
            capture: ctx.record,
        };
        pages.push(pipeline.process(&event, &mut bus).await?);
    }
    pipeline.summarize(&mut bus)?;

    let output = match args.format {
        args::OutputFormat::Json => {
            let report = RunReport {
                schema_version: SCHEMA_VERSION,
                tool: ToolInfo {
                    name: TOOL_NAME,
                    version: env!("CARGO_PKG_VERSION"),
                },
                captures: &captures,
                pages: &pages,
                groups: pipeline.session().summary(),
            };
            serde_json::to_string_pretty(&report)?
        }
        args::OutputFormat::Text => render_run(&captures, &pages),
    };

    match args.out {
        Some(path) => fs::write(path, &output)?,
        None => println!("{output}"),
    }

    std::process::exit(exit_code(&pages));
}

fn load_ruleset(
    category: RuleCategory,
    path: Option<&Path>,
    default: fn() -> Ruleset,
) -> Result<Ruleset> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read rule configuration: {}", path.display()))?;
            let config = RulesetConfig::from_flat_config(&text)
                .with_context(|| format!("invalid rule configuration: {}", path.display()))?;
            Ok(Ruleset::new(category, config))
        }
        None => Ok(default()),
    }
}

fn first_request_url(record: &CaptureRecord) -> Option<String> {
    record
        .entries()
        .iter()
        .find_map(|entry| entry.request.as_ref()?.url.clone())
}

/// Group label fallback: the page URL's host, or a fixed label when the URL
/// has none.
fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| "default".to_string())
}

fn render_run(captures: &[CaptureInfo], pages: &[PageAnalysis]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", TOOL_NAME, env!("CARGO_PKG_VERSION")));
    for (capture, page) in captures.iter().zip(pages) {
        if let Some(path) = &capture.path {
            out.push_str(&format!("Capture: {path} ({} bytes)\n", capture.size_bytes));
        }
        out.push_str(&format!(
            "Scripts: {} ({} files, {} inline)\n",
            page.inventory.all_scripts.len(),
            page.inventory.script_files.len(),
            page.inventory.script_elements.len()
        ));
        out.push_str(&render::render_text(&page.report));
    }
    out
}

/// Worst observed severity across all pages: errors exit 2, anything else
/// that fired exits 1, a fully resolved run exits 0.
fn exit_code(pages: &[PageAnalysis]) -> i32 {
    pages
        .iter()
        .map(|page| severity_rank(&page.report))
        .max()
        .unwrap_or(0)
}

fn severity_rank(report: &KnowledgeReport) -> i32 {
    let mut rank = 0;
    for entry in report.issues.values() {
        match entry.severity {
            Severity::Error => return 2,
            Severity::Warning | Severity::Code(_) => rank = 1,
            Severity::Resolved => {}
        }
    }
    rank
}
