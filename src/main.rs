use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rstabgenius::session::session_tabs_from;
use rstabgenius::{
    analyze_with_settings, apply_decisions, build_action_plan, duplicate_tab_ids_to_close, render_report,
    report_file_name, AnalysisResult, ExecutionResults, SessionStore, Settings, SnapshotLoader, TabSelection,
};

#[derive(Parser)]
#[command(name = "rstabgenius")]
#[command(about = "Classify browser tabs, suggest actions and find duplicates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Tab snapshot exported by the browser (JSON)
    #[arg(short, long)]
    tabs: PathBuf,

    /// Settings file (JSON); defaults apply when omitted
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Category decisions to apply after analysis (JSON)
    #[arg(short, long)]
    decisions: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a tab snapshot and print the result
    Analyze {
        #[command(flatten)]
        input: SnapshotArgs,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Build the action plan for all or selected tabs
    Plan {
        #[command(flatten)]
        input: SnapshotArgs,

        /// Only include these tab ids
        #[arg(long, value_delimiter = ',', conflicts_with_all = ["all", "suggested"])]
        ids: Vec<i64>,

        /// Include every tab (default when no ids are given)
        #[arg(long, conflicts_with = "suggested")]
        all: bool,

        /// Quick cleanup: only tabs suggested for close or bookmark
        #[arg(long)]
        suggested: bool,
    },

    /// Print the ids of duplicate tabs to close (first of each group is kept)
    Duplicates {
        #[command(flatten)]
        input: SnapshotArgs,
    },

    /// Render a text report from execution results
    Report {
        /// Execution results (JSON)
        #[arg(short, long)]
        results: PathBuf,

        /// Write the report into this directory instead of stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Manage saved sessions
    Session {
        /// Session store file
        #[arg(long, default_value = "tab-genius-sessions.msgpack")]
        store: PathBuf,

        #[command(subcommand)]
        action: SessionCommands,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Save the analyzed tabs as a new session
    Save {
        #[command(flatten)]
        input: SnapshotArgs,

        /// Session name (default: "Session <date>")
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List saved sessions
    List,
    /// Show the tabs of a session
    Show { id: String },
    /// Delete a session
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze { input, compact } => {
            let result = load_and_analyze(&input).await?;
            let json = if compact {
                serde_json::to_string(&result)?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            println!("{}", json);
        }

        Commands::Plan { input, ids, all, suggested } => {
            let result = load_and_analyze(&input).await?;
            let selection = if suggested {
                TabSelection::Suggested
            } else if all || ids.is_empty() {
                TabSelection::All
            } else {
                TabSelection::ids(ids)
            };
            let plan = build_action_plan(&result, &selection);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }

        Commands::Duplicates { input } => {
            let result = load_and_analyze(&input).await?;
            let ids = duplicate_tab_ids_to_close(&result.duplicates);
            info!("重复组{}个，可关闭{}个标签页", result.duplicates.len(), ids.len());
            println!("{}", serde_json::to_string(&ids)?);
        }

        Commands::Report { results, output_dir } => {
            let text = tokio::fs::read_to_string(&results)
                .await
                .with_context(|| format!("failed to read {}", results.display()))?;
            let results: ExecutionResults = serde_json::from_str(&text).context("invalid execution results")?;
            let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            let report = render_report(&results, &timestamp);

            match output_dir {
                Some(dir) => {
                    let path = dir.join(report_file_name(&timestamp));
                    tokio::fs::write(&path, report).await?;
                    info!("报告已写入 {}", path.display());
                }
                None => print!("{}", report),
            }
        }

        Commands::Session { store, action } => run_session(&store, action).await?,
    }

    Ok(())
}

async fn run_session(path: &Path, action: SessionCommands) -> Result<()> {
    let store = SessionStore::new(path);
    match action {
        SessionCommands::Save { input, name } => {
            let result = load_and_analyze(&input).await?;
            let session = store
                .save(name.as_deref(), session_tabs_from(&result), Utc::now())
                .await?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        SessionCommands::List => {
            for session in store.list().await? {
                println!("{}\t{}\t{} tabs\t{}", session.id, session.name, session.tabs.len(), session.created_at);
            }
        }
        SessionCommands::Show { id } => {
            let tabs = store.restore(&id).await?;
            println!("{}", serde_json::to_string_pretty(&tabs)?);
        }
        SessionCommands::Delete { id } => {
            if store.delete(&id).await? {
                println!("deleted {}", id);
            } else {
                anyhow::bail!("session not found: {}", id);
            }
        }
    }
    Ok(())
}

async fn load_and_analyze(input: &SnapshotArgs) -> Result<AnalysisResult> {
    let tabs = SnapshotLoader::load_snapshot(&input.tabs).await?;
    let settings = match &input.settings {
        Some(path) => SnapshotLoader::load_settings(path).await?,
        None => Settings::default(),
    };

    let mut result = analyze_with_settings(&tabs, &settings, Utc::now());

    if let Some(path) = &input.decisions {
        let decisions = SnapshotLoader::load_decisions(path).await?;
        let changed = apply_decisions(&mut result, &decisions);
        info!("已应用外部决策，改写{}个标签页", changed);
    }

    info!(
        "分析完成：{}个标签页，{}个分类，{}个重复副本",
        result.stats.total,
        result.stats.by_category.len(),
        result.stats.duplicate_count
    );
    Ok(result)
}
