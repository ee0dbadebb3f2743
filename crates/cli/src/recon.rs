//! `rostercheck run` and `rostercheck validate`: the config-driven roster check.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rostercheck_recon::load::{
    parse_listing_json, parse_roster, parse_website_json, read_source, RosterFormat,
};
use rostercheck_recon::model::{GroupInput, ReconInput, ReconReport};
use rostercheck_recon::ReconConfig;

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_NEEDS_ACTION, EXIT_RUNTIME};
use crate::CliError;

fn runtime_err(msg: impl Into<String>) -> CliError {
    CliError::new(EXIT_RUNTIME, msg)
}

fn read_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| runtime_err(format!("cannot read config {}: {e}", config_path.display())))?;
    ReconConfig::from_toml(&config_str).map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()))
}

fn parse_today(today: Option<String>) -> Result<NaiveDate, CliError> {
    match today {
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|e| {
            CliError::usage(format!("invalid --today '{text}': {e}")).with_hint("use YYYY-MM-DD, e.g. --today 2026-01-05")
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn read_input(path: &Path) -> Result<String, CliError> {
    read_source(path).map_err(|e| runtime_err(e.to_string()))
}

/// Load every input file named by the config. Paths resolve relative to the
/// config file's directory.
fn load_input(config: &ReconConfig, base_dir: &Path) -> Result<ReconInput, CliError> {
    let roster_path = base_dir.join(&config.roster);
    let export = parse_roster(&read_input(&roster_path)?, RosterFormat::from_path(&roster_path))
        .map_err(|e| runtime_err(format!("{}: {e}", roster_path.display())))?;
    tracing::debug!(
        path = %roster_path.display(),
        records = export.entries.len(),
        "roster loaded"
    );

    let mut groups = Vec::with_capacity(config.groups.len());
    for group in &config.groups {
        let listing_path = base_dir.join(&group.listing);
        let listing = parse_listing_json(&read_input(&listing_path)?)
            .map_err(|e| runtime_err(format!("{}: {e}", listing_path.display())))?;
        let roster = export.records_for(&group.roster_name);
        if roster.is_empty() {
            tracing::warn!(group = %group.display, roster_name = %group.roster_name, "no roster records for group");
        }
        groups.push(GroupInput {
            group: group.display.clone(),
            roster,
            listing,
        });
    }

    let website = match &config.website {
        None => None,
        Some(website) => {
            let path = base_dir.join(&website.file);
            match std::fs::read_to_string(&path) {
                Ok(text) => Some(
                    parse_website_json(&text).map_err(|e| runtime_err(format!("{}: {e}", path.display())))?,
                ),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "website listing not found; skipping website checks");
                    None
                }
                Err(e) => return Err(runtime_err(format!("cannot read {}: {e}", path.display()))),
            }
        }
    };

    Ok(ReconInput {
        groups,
        website,
        source: export.source,
    })
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    today: Option<String>,
) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let today = parse_today(today)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let input = load_input(&config, base_dir)?;
    let report = rostercheck_recon::run(&config, &input, today);

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| runtime_err(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| runtime_err(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    print_summary(&report, config.priority.window_days);

    if report.priority.is_empty() {
        Ok(())
    } else {
        Err(CliError::new(
            EXIT_NEEDS_ACTION,
            format!("{} slot(s) need action", report.priority.len()),
        ))
    }
}

/// Human summary to stderr; stdout stays reserved for the JSON report.
fn print_summary(report: &ReconReport, window_days: u32) {
    let s = &report.summary;
    eprintln!(
        "roster check '{}' ({}): {} groups, {} slots, {} mismatched, {} missing, {} extra, {} date mismatches",
        report.meta.config_name,
        report.meta.today,
        report.groups.len(),
        s.total_slots,
        s.mismatched_slots,
        s.missing,
        s.extras,
        s.date_mismatches,
    );
    if let Some(updated) = &report.meta.source.last_updated {
        eprintln!("roster last updated: {updated}");
    }

    if report.priority.is_empty() {
        eprintln!("nothing needs action in the next {window_days} days");
        return;
    }
    eprintln!("needs action in the next {window_days} days:");
    for item in &report.priority {
        eprintln!(
            "  {} {} ({}): {}",
            item.date,
            item.group,
            item.category,
            item.missing_names.join(", "),
        );
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    eprintln!(
        "valid: '{}' with {} group(s){}",
        config.name,
        config.groups.len(),
        if config.website.is_some() { ", website checks on" } else { "" },
    );
    Ok(())
}
