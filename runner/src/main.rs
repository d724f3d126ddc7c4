// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for building and auditing army lists
// ═══════════════════════════════════════════════════════════════════════

mod config;
mod play;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Cli, Commands, RunnerConfig};
use mesbg_catalog::{audit, CatalogProvider, DirectoryCatalog};
use mesbg_engine::ArmySession;
use render::TextPresenter;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(data = %cli.config.data.display(), manifest = %cli.config.manifest, "configuration");

    match cli.command {
        Commands::Armies => cmd_armies(&cli.config),
        Commands::Play { army, script } => cmd_play(&cli.config, &army, script.as_deref()),
        Commands::Audit => cmd_audit(&cli.config),
    }
}

fn catalog(config: &RunnerConfig) -> DirectoryCatalog {
    DirectoryCatalog::with_manifest(&config.data, config.manifest.clone())
}

fn cmd_armies(config: &RunnerConfig) -> Result<()> {
    let entries = catalog(config).manifest().context("loading the army manifest")?;
    let mut out = io::stdout().lock();
    writeln!(out, "=== Armies ===")?;
    for e in &entries {
        writeln!(out, "  {:<32} {}", e.name, e.file)?;
    }
    Ok(())
}

fn cmd_play(config: &RunnerConfig, army: &str, script: Option<&Path>) -> Result<()> {
    let catalog = catalog(config);
    let mut presenter = TextPresenter::new(io::stdout().lock());
    let mut session = ArmySession::new();

    // Load failures are shown to the user; the session starts empty.
    play::select_army(&mut session, &catalog, army, &mut presenter);

    let data_dir = catalog.root().to_path_buf();
    let resolves = move |image: &str| image_resolves(&data_dir, image);

    let summary = match script {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            play::run(&mut session, &catalog, BufReader::new(file), &mut presenter, &resolves)?
        }
        None => play::run(&mut session, &catalog, io::stdin().lock(), &mut presenter, &resolves)?,
    };
    let _out = presenter.finish()?;
    tracing::info!(
        applied = summary.applied,
        rejected = summary.rejected,
        ignored = summary.ignored,
        "session finished"
    );
    Ok(())
}

fn cmd_audit(config: &RunnerConfig) -> Result<()> {
    let reports = audit(&catalog(config)).context("loading the army manifest")?;
    let mut out = io::stdout().lock();
    let mut failed = 0;

    writeln!(out, "=== Catalog audit: {} armies ===", reports.len())?;
    for r in &reports {
        match &r.result {
            Ok(issues) if issues.is_empty() => writeln!(out, "  ok    {}", r.entry.file)?,
            Ok(issues) => {
                writeln!(out, "  warn  {} ({} issues)", r.entry.file, issues.len())?;
                for issue in issues {
                    writeln!(out, "          {}", issue)?;
                }
            }
            Err(e) => {
                failed += 1;
                writeln!(out, "  FAIL  {}: {}", r.entry.file, e)?;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} army files failed to load", failed, reports.len());
    }
    Ok(())
}

/// Remote images are trusted; local ones must exist under the data directory.
fn image_resolves(data_dir: &Path, image: &str) -> bool {
    if image.starts_with("http://") || image.starts_with("https://") {
        return true;
    }
    let path = PathBuf::from(image);
    if path.is_absolute() { path.exists() } else { data_dir.join(path).exists() }
}
