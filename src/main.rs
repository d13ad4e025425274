mod cli;
mod logging;
mod reporter;

use std::fs::File;
use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, DeleteArgs, InputArgs, SelectArgs};
use colored::*;
use console::Term;
use dotenv::dotenv;
use dupe_tree::action::PopulateAction;
use dupe_tree::config::load_configuration;
use dupe_tree::model::load_duplicates_list;
use dupe_tree::{
    run_to_completion, AppConfig, DuplicateStats, GroupedSelectionTree, Mode,
    SmartSelectPolicy, TreeEvent,
};
use reporter::CliReporter;
use tracing::{debug, error, info, warn};

fn main() {
    dotenv().ok();

    let config = match load_configuration() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {}", "Error loading configuration:".red().bold(), err);
            process::exit(1);
        }
    };

    let _guard = logging::init_logger(&config);

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Stats(args)) => run_stats(&args, &config),
        Some(Commands::Select(args)) => run_select(&args, &config).map(|_| ()),
        Some(Commands::Delete(args)) => run_delete(&args, &config),
        Some(Commands::Policies) => {
            for policy in SmartSelectPolicy::ALL {
                let note = if policy.requires_image_mode() {
                    " (images only)".dimmed().to_string()
                } else {
                    String::new()
                };
                println!("{}{}", policy.name(), note);
            }
            Ok(())
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => Cli::command().print_long_help().map_err(Into::into),
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn load_tree(args: &InputArgs, config: &AppConfig, reporter: &CliReporter) -> Result<GroupedSelectionTree> {
    let list = load_duplicates_list(&args.input)
        .with_context(|| format!("reading duplicates from {}", args.input.display()))?;
    let mode = if args.images { Mode::Images } else { config.mode };

    let mut tree = GroupedSelectionTree::new().with_mode(mode);
    tree.subscribe(|event| {
        if let TreeEvent::StatsChanged = event {
            debug!("Selection statistics changed");
        }
    });
    if let Some(sort) = args.sort {
        tree.apply_sort(sort.into());
    }

    let mut action = PopulateAction::new(&mut tree, list);
    run_to_completion(&mut action, reporter);
    let skipped = action.skipped();
    drop(action);
    if skipped > 0 {
        warn!("{} empty group(s) in {} were ignored", skipped, args.input.display());
    }

    Ok(tree)
}

fn run_stats(args: &InputArgs, config: &AppConfig) -> Result<()> {
    let reporter = CliReporter::new();
    let tree = load_tree(args, config, &reporter)?;
    print_stats(&tree.calculate_stats());
    Ok(())
}

fn run_select(args: &SelectArgs, config: &AppConfig) -> Result<GroupedSelectionTree> {
    let reporter = CliReporter::new();
    let mut tree = load_tree(&args.input, config, &reporter)?;
    let policy = args.policy.unwrap_or(config.default_policy);

    let mut action = tree.smart_select(policy)?;
    info!("Applying smart selection '{}'", action.policy());
    run_to_completion(&mut action, &reporter);
    drop(action);

    print_stats(&tree.calculate_stats());

    if let Some(export) = &args.export {
        let file = File::create(export)
            .with_context(|| format!("creating {}", export.display()))?;
        let rows = tree.export_selection_csv(file)?;
        info!("Wrote {} rows to {}", rows, export.display());
    }

    Ok(tree)
}

fn run_delete(args: &DeleteArgs, config: &AppConfig) -> Result<()> {
    let mut tree = run_select(&args.select, config)?;
    if !tree.at_least_one_top_level_item_checked() {
        info!("Nothing selected, nothing to delete");
        return Ok(());
    }

    let mut config = config.clone();
    if let Some(method) = args.method {
        config.delete_method = method.into();
    }
    if let Some(folder) = &args.backup_folder {
        config.backup_folder = Some(folder.clone());
    }
    let deleter = config.deleter()?;

    let stats = tree.calculate_stats();
    if !args.yes {
        let prompt = format!(
            "Delete {} files ({}) using the {} method?",
            stats.file_count,
            indicatif::HumanBytes(stats.wasted_size),
            deleter.name()
        );
        if !prompt_confirm(&prompt, Some(false))? {
            info!("Deletion cancelled");
            return Ok(());
        }
    }

    let reporter = CliReporter::new();
    let mut action = tree.delete_with(deleter);
    run_to_completion(&mut action, &reporter);
    let summary = action.summary();
    drop(action);

    info!(
        "{} deleted, {} failed, {} freed",
        format!("{}", summary.deleted).green(),
        format!("{}", summary.failed).red(),
        format!("{}", indicatif::HumanBytes(summary.freed_bytes)).green(),
    );
    print_stats(&tree.calculate_stats());
    Ok(())
}

fn print_stats(stats: &DuplicateStats) {
    println!(
        "{} groups, {} files selected, {} of {} reclaimable",
        format!("{}", stats.group_count).cyan(),
        format!("{}", stats.file_count).red(),
        format!("{}", indicatif::HumanBytes(stats.wasted_size)).red(),
        format!("{}", indicatif::HumanBytes(stats.total_size)).green(),
    );
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut term = Term::stderr();

    loop {
        match default {
            Some(true) => write!(term, "{} (Y/n): ", prompt)?,
            Some(false) | None => write!(term, "{} (y/N): ", prompt)?,
        }
        term.flush()?;

        let input = term.read_line()?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
