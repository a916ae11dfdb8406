//! Command-line front end for novelist workspaces.
//!
//! # Responsibility
//! - Map subcommands onto `novelist_core` registry, analysis, and
//!   persistence operations.
//! - Save the snapshot after every mutating command.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use novelist_core::{
    export_file_name, export_text, find_repetitions, init_logging, load_config, progress_report,
    punctuation_issues, script_balance, AnalysisError, PersistenceGateway, ProjectRegistry,
    PunctuationIssueKind, StudioConfig, VersionKind,
};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "novelist")]
#[command(about = "Chapter/episode manuscript workspace with text checks")]
struct Cli {
    /// Snapshot file (overrides `storage.data_file`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Explicit config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for rolling log files (overrides `log.dir`)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects and the active selection
    Info,
    /// Progress of the active project against its goal
    Stats,
    /// Write the active project as plain text
    Export {
        /// Output directory (defaults to `storage.export_dir`)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Run a text check on a file
    Check {
        #[arg(value_enum)]
        kind: CheckKind,
        file: PathBuf,
    },
    /// Load the snapshot and report whether it is usable
    Validate,
    /// Create a project and make it active
    NewProject {
        name: String,
        /// Daily goal in characters (defaults to `writing.default_goal`)
        #[arg(short, long)]
        goal: Option<u32>,
    },
    /// Select a project by index
    Select { index: usize },
    /// Append a chapter to the active project
    AddChapter,
    /// Append an episode to a chapter of the active project
    AddEpisode {
        #[arg(short, long)]
        chapter: usize,
    },
    /// Replace an episode body with the contents of a file
    Write {
        #[arg(short, long)]
        chapter: usize,
        #[arg(short, long)]
        episode: usize,
        file: PathBuf,
        /// New episode title
        #[arg(short, long)]
        title: Option<String>,
        /// Also record a version snapshot of the new text
        #[arg(long, value_enum)]
        version: Option<SnapshotKind>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CheckKind {
    Repetition,
    Balance,
    Punctuation,
}

#[derive(Clone, Copy, ValueEnum)]
enum SnapshotKind {
    Draft,
    Proofread,
}

impl From<SnapshotKind> for VersionKind {
    fn from(kind: SnapshotKind) -> Self {
        match kind {
            SnapshotKind::Draft => VersionKind::Draft,
            SnapshotKind::Proofread => VersionKind::Proofread,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("loading configuration")?;
    start_logging(&config, cli.log_dir.as_deref())?;

    let gateway = PersistenceGateway::new(
        cli.data
            .clone()
            .unwrap_or_else(|| config.storage.data_file.clone()),
    );
    info!(
        "event=cli_start module=cli status=ok data_file={}",
        gateway.data_file().display()
    );
    let mut stdout = std::io::stdout().lock();
    run(cli.command, &config, &gateway, &mut stdout)
}

fn start_logging(config: &StudioConfig, override_dir: Option<&Path>) -> anyhow::Result<()> {
    let Some(dir) = override_dir.or(config.log.dir.as_deref()) else {
        return Ok(());
    };
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(dir)
    };
    init_logging(&config.log.level, &dir).context("starting file logging")?;
    Ok(())
}

fn run(
    command: Commands,
    config: &StudioConfig,
    gateway: &PersistenceGateway,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match &command {
        Commands::Check { kind, file } => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            return check_text(*kind, &text, out);
        }
        Commands::Validate => {
            return match gateway.load() {
                Ok(Some(registry)) => {
                    writeln!(out, "ok: {} project(s)", registry.len())?;
                    Ok(())
                }
                Ok(None) => {
                    writeln!(out, "no snapshot at {}", gateway.data_file().display())?;
                    Ok(())
                }
                Err(err) => bail!("{}: {err}", gateway.data_file().display()),
            };
        }
        _ => {}
    }

    let mut registry = load_registry(gateway)?;
    match command {
        Commands::Info => print_info(&registry, out)?,
        Commands::Stats => {
            let project = registry.active_project()?;
            write!(out, "{}", progress_report(project))?;
        }
        Commands::Export { out: dir } => {
            let project = registry.active_project()?;
            let dir = dir.unwrap_or_else(|| config.storage.export_dir.clone());
            let path = dir.join(export_file_name(&project.name));
            export_text(project, &path)?;
            writeln!(out, "exported {}", path.display())?;
        }
        Commands::NewProject { name, goal } => {
            let goal = goal.unwrap_or(config.writing.default_goal);
            let index = registry.create_project_with_goal(name, goal)?;
            gateway.save(&registry)?;
            writeln!(out, "created project {index}")?;
        }
        Commands::Select { index } => {
            registry.select_project(index)?;
            gateway.save(&registry)?;
        }
        Commands::AddChapter => {
            let index = registry.active_tree_mut()?.add_chapter();
            gateway.save(&registry)?;
            writeln!(out, "added chapter {index}")?;
        }
        Commands::AddEpisode { chapter } => {
            let tree = registry.active_tree_mut()?;
            tree.select_chapter(chapter, None)?;
            let index = tree.add_episode()?;
            gateway.save(&registry)?;
            writeln!(out, "added episode {index} to chapter {chapter}")?;
        }
        Commands::Write {
            chapter,
            episode,
            file,
            title,
            version,
        } => {
            let body = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let tree = registry.active_tree_mut()?;
            tree.select_chapter(chapter, None)?;
            let current = tree.load_episode(episode, None)?;
            tree.commit_episode_edit(title.unwrap_or(current.title), body);
            if let Some(kind) = version {
                tree.snapshot_active_episode(kind.into(), None)?;
            }
            let count = tree
                .current_episode()
                .map(|episode| episode.word_count())
                .unwrap_or_default();
            gateway.save(&registry)?;
            writeln!(out, "saved {count} characters")?;
        }
        Commands::Check { .. } | Commands::Validate => {}
    }
    Ok(())
}

fn load_registry(gateway: &PersistenceGateway) -> anyhow::Result<ProjectRegistry> {
    let registry = gateway
        .load()
        .with_context(|| format!("loading {}", gateway.data_file().display()))?;
    Ok(registry.unwrap_or_default())
}

fn print_info(registry: &ProjectRegistry, out: &mut impl Write) -> anyhow::Result<()> {
    if registry.is_empty() {
        writeln!(out, "no projects")?;
        return Ok(());
    }
    for (index, project) in registry.projects().iter().enumerate() {
        let marker = if registry.active_index() == Some(index) {
            '*'
        } else {
            ' '
        };
        writeln!(
            out,
            "{marker} [{index}] {} ({} chapters, {} characters)",
            project.name,
            project.tree.chapters().len(),
            project.tree.project_word_total()
        )?;
    }
    Ok(())
}

fn check_text(kind: CheckKind, text: &str, out: &mut impl Write) -> anyhow::Result<()> {
    match kind {
        CheckKind::Repetition => match find_repetitions(text) {
            Some(found) => {
                for entry in found {
                    writeln!(out, "'{}': {} times", entry.phrase, entry.count)?;
                }
            }
            None => writeln!(out, "no repeated phrases")?,
        },
        CheckKind::Balance => match script_balance(text) {
            Ok(balance) => write!(out, "{balance}")?,
            Err(AnalysisError::EmptyInput) => writeln!(out, "nothing to analyze")?,
        },
        CheckKind::Punctuation => {
            let report = punctuation_issues(text);
            writeln!(
                out,
                "commas: {} periods: {}",
                report.comma_count, report.period_count
            )?;
            if report.is_clean() {
                writeln!(out, "no punctuation issues")?;
            }
            for issue in &report.issues {
                let mark = match issue.kind {
                    PunctuationIssueKind::RepeatedComma => "、、",
                    PunctuationIssueKind::RepeatedPeriod => "。。",
                };
                writeln!(out, "line {}: repeated {mark}", issue.line)?;
            }
        }
    }
    Ok(())
}
