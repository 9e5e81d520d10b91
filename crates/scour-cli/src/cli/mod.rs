pub mod args;
mod logging;

use std::ops::ControlFlow;
use std::sync::atomic::AtomicBool;

use bytesize::ByteSize;
use colored::Colorize;
use serde::Serialize;

use scour_core::config::Config;
use scour_core::filter;
use scour_core::mock::{Generator, RunKind};
use scour_core::options::{NodeId, OptionTree};
use scour_core::results::{self, ResultAction, ResultRow};
use scour_core::whitelist::Whitelist;

use self::args::{Cli, Command};

pub fn run(cli: Cli) -> color_eyre::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    if let Some(path) = config.log_path()
        && let Err(e) = logging::init(&path)
    {
        eprintln!("warning: {e}");
    }

    let tree = OptionTree::from_catalog(&config.catalog())?;

    match cli.command {
        None => crate::tui::run(config, tree)?,
        Some(Command::Options { search, json }) => {
            cmd_options(&tree, search.as_deref().unwrap_or(""), json)?
        }
        Some(Command::Preview { json, seed }) => {
            cmd_run(&config, &tree, RunKind::Preview, seed, json)?
        }
        Some(Command::Clean { json, seed }) => cmd_run(&config, &tree, RunKind::Clean, seed, json)?,
    }

    Ok(())
}

fn cmd_options(tree: &OptionTree, search: &str, json: bool) -> color_eyre::Result<()> {
    #[derive(Serialize)]
    struct OptionEntry<'a> {
        label: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        category: Option<&'a str>,
        enabled: bool,
    }

    let visible = filter::visible_nodes(tree, search);

    if json {
        let entries: Vec<OptionEntry> = visible
            .iter()
            .filter_map(|&id| {
                Some(OptionEntry {
                    label: tree.label(id)?,
                    category: tree.parent(id).and_then(|p| tree.label(p)),
                    enabled: tree.enabled(id)?,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if visible.is_empty() {
        eprintln!("No options match {search:?}.");
        return Ok(());
    }

    for id in visible {
        let label = tree.label(id).unwrap_or_default();
        let check = if tree.enabled(id).unwrap_or(false) {
            "[x]"
        } else {
            "[ ]"
        };
        match id {
            NodeId::Category(_) => println!("{check} {}", label.bold()),
            NodeId::Item(..) => println!("{check}   {label}"),
        }
    }
    Ok(())
}

fn cmd_run(
    config: &Config,
    tree: &OptionTree,
    kind: RunKind,
    seed: Option<u64>,
    json: bool,
) -> color_eyre::Result<()> {
    let mut settings = config.generator_settings();
    if seed.is_some() {
        settings.seed = seed;
    }
    let generator = Generator::for_current_user(settings, tree, &Whitelist::new())?;

    let mut rows = Vec::new();
    let summary = generator.run(kind, &AtomicBool::new(false), |row| {
        if !json {
            print_row(&row);
        }
        rows.push(row);
        ControlFlow::Continue(())
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let verb = match kind {
        RunKind::Preview => "would be removed",
        RunKind::Clean => "processed",
    };
    eprintln!(
        "{} files {verb}, {} total",
        summary.rows,
        ByteSize(results::total_size(&rows))
    );
    Ok(())
}

fn print_row(row: &ResultRow) {
    let action = match row.action {
        ResultAction::None => String::new(),
        ResultAction::Shred => row.action.to_string().green().to_string(),
        ResultAction::Deleted => row.action.to_string().yellow().to_string(),
        ResultAction::Error => row.action.to_string().red().to_string(),
    };
    println!(
        "{}\t{}\t{}\t{}\t{}",
        row.cleaner,
        row.option,
        row.filename.display(),
        row.size,
        action
    );
}
