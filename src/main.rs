mod cli;
mod config;
mod error;
mod audio;
mod batch;
mod cluster;
mod export;
mod prompt;
mod scan;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

use audio::features::FeatureRecord;
use batch::BatchRunner;
use cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect vibemap.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("vibemap.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("vibemap").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("vibemap").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    let mut extensions = config::ScanConfig::default().extensions;
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.json.is_none() {
                cli.json = cfg.export.json;
            }
            if cli.csv.is_none() {
                cli.csv = cfg.export.csv;
            }
            extensions = cfg.scan.extensions;
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    // Import mode: re-hydrate a previous report instead of analyzing
    if let Some(ref import_path) = cli.import {
        let mut records = export::import_json(import_path)?;
        if cli.recluster {
            cluster::assign_clusters(&mut records, batch::DEFAULT_CLUSTERS);
            log::info!("Re-clustered {} imported records", records.len());
        }
        print_summary(&records, cli.prompts);
        write_exports(&records, &cli)?;
        return Ok(());
    }

    if cli.inputs.is_empty() {
        anyhow::bail!("No input files or directories given (try: vibemap ~/Music)");
    }

    log::info!("vibemap - music library vibe analyzer");

    // 1. Collect audio files
    let sources = scan::collect_sources(&cli.inputs, &extensions)?;
    if sources.is_empty() {
        anyhow::bail!(
            "No audio files found under the given paths (looking for: {})",
            extensions.join(", ")
        );
    }
    log::info!("Found {} audio files", sources.len());

    // 2. Analyze sequentially
    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    let runner = BatchRunner::new();
    let result = runner.analyze_all(&sources, |attempted, _total| {
        pb.set_position(attempted as u64);
    })?;
    pb.finish_with_message("Analysis complete");

    if result.failed > 0 || result.skipped > 0 {
        log::warn!(
            "Analyzed {}/{} files ({} failed, {} skipped)",
            result.records.len(),
            result.total,
            result.failed,
            result.skipped
        );
    }

    // 3. Show the grouping
    print_summary(&result.records, cli.prompts);

    // 4. Exports
    write_exports(&result.records, &cli)?;

    log::info!("Done");
    Ok(())
}

/// Per-cluster listing of the analyzed library.
fn print_summary(records: &[FeatureRecord], with_prompts: bool) {
    let mut groups: BTreeMap<u32, Vec<&FeatureRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.cluster.unwrap_or(0))
            .or_default()
            .push(record);
    }

    println!();
    for (id, members) in &groups {
        println!("{} ({} tracks)", export::cluster_name(*id), members.len());
        for record in members {
            println!(
                "  {:<44} ~{} BPM, energy {:.0}%, brightness {:.0}%  [{:.1}s]",
                record.name, record.tempo, record.energy, record.brightness, record.duration
            );
            if with_prompts {
                println!("    prompt: {}", prompt::style_prompt(record));
            }
        }
        println!();
    }
}

fn write_exports(records: &[FeatureRecord], cli: &Cli) -> Result<()> {
    if let Some(ref path) = cli.json {
        export::write_json(records, path)?;
    }
    if let Some(ref path) = cli.csv {
        export::write_csv(records, path)?;
    }
    Ok(())
}
