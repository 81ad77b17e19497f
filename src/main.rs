//! Command-line entrypoint for managing rule collections.

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use ruleshelf::{Config, RuleDb, RuleListController, RuleRecord, RuleTable};
use std::collections::HashSet;
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ruleshelf", about = "Manage TOC and dictionary rule collections")]
struct Cli {
    /// Rule collection to operate on.
    #[arg(long, value_enum, default_value = "toc")]
    kind: RuleKind,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RuleKind {
    Toc,
    Dict,
}

#[derive(Subcommand)]
enum Command {
    /// Print the collection in view order.
    List,
    /// Import rules from a JSON document (object or array).
    Import { file: PathBuf },
    /// Export the collection to a JSON document.
    Export { file: PathBuf },
    /// Enable rules by id.
    Enable { ids: Vec<String> },
    /// Disable rules by id.
    Disable { ids: Vec<String> },
    /// Delete rules by id.
    Delete { ids: Vec<String> },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruleshelf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let db = RuleDb::open(&config.db_path)
        .with_context(|| format!("opening rule database at {}", config.db_path))?;
    tracing::debug!(db_path = %config.db_path, "rule database ready");

    match cli.kind {
        RuleKind::Toc => run(db.toc.clone(), cli.command, &config),
        RuleKind::Dict => run(db.dict.clone(), cli.command, &config),
    }
}

fn run<R: RuleRecord>(
    table: Arc<RuleTable<R>>,
    command: Command,
    config: &Config,
) -> anyhow::Result<()>
where
    R::Id: FromStr,
{
    let mut controller = RuleListController::new(table);
    controller.set_max_import_size(config.max_import_size);
    let mut notices = controller
        .take_notices()
        .ok_or_else(|| anyhow!("notice channel already taken"))?;
    controller.refresh();

    match command {
        Command::List => {
            let state = controller.state();
            if state.items.is_empty() {
                println!("no {} rules", R::KIND);
                return Ok(());
            }
            for item in state.items {
                let marker = if item.enabled { "on " } else { "off" };
                println!("[{}] {}  {}  {}", marker, item.id, item.name, item.summary);
            }
        }
        Command::Import { file } => {
            let mut reader = File::open(&file)
                .with_context(|| format!("opening {}", file.display()))?;
            if !controller.stage_import_from_reader(&mut reader) {
                let reason = notices
                    .try_recv()
                    .map(|notice| notice.message)
                    .unwrap_or_else(|_| "unknown import failure".to_string());
                bail!("import rejected: {}", reason);
            }
            let candidates = controller
                .import_candidates()
                .ok_or_else(|| anyhow!("import staging vanished"))?;
            let new = candidates.iter().filter(|c| c.is_new()).count();
            let selected = candidates.iter().filter(|c| c.selected).count();
            println!(
                "parsed {} candidate(s): {} new, {} selected",
                candidates.len(),
                new,
                selected
            );
            let written = controller.commit_import()?;
            println!("imported {} {} rule(s)", written, R::KIND);
        }
        Command::Export { file } => {
            let state = controller.state();
            let mut writer = File::create(&file)
                .with_context(|| format!("creating {}", file.display()))?;
            controller.export_to_writer(&mut writer, config.pretty_export)?;
            println!(
                "exported {} {} rule(s) to {}",
                state.items.len(),
                R::KIND,
                file.display()
            );
        }
        Command::Enable { ids } => {
            let ids = parse_ids::<R>(&ids)?;
            let updated = controller.enable_by_ids(&ids)?;
            println!("enabled {} {} rule(s)", updated, R::KIND);
        }
        Command::Disable { ids } => {
            let ids = parse_ids::<R>(&ids)?;
            let updated = controller.disable_by_ids(&ids)?;
            println!("disabled {} {} rule(s)", updated, R::KIND);
        }
        Command::Delete { ids } => {
            let ids = parse_ids::<R>(&ids)?;
            let deleted = controller.delete_by_ids(&ids)?;
            println!("deleted {} {} rule(s)", deleted, R::KIND);
        }
    }

    Ok(())
}

fn parse_ids<R: RuleRecord>(raw: &[String]) -> anyhow::Result<HashSet<R::Id>>
where
    R::Id: FromStr,
{
    if raw.is_empty() {
        bail!("no ids given");
    }
    raw.iter()
        .map(|value| {
            value
                .parse::<R::Id>()
                .map_err(|_| anyhow!("invalid {} rule id: {}", R::KIND, value))
        })
        .collect()
}
