use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use lumi_lib::config::Settings;
use lumi_lib::render::{CommonMark, Page, PageRequest, Tab};
use lumi_lib::{decompose, scan, snapshot, webui};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "lumi")]
#[command(about = "Read-only dashboard over a workspace of projects, tasks and agent activity")]
#[command(version = VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
        /// Directory with static assets and data.js
        #[arg(long)]
        web_dir: Option<PathBuf>,
        /// Snapshot file to read on every request
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Scan the workspace and write a fresh snapshot
    Scan {
        /// Workspace root
        #[arg(long)]
        root: Option<PathBuf>,
        /// How many directory levels to search for projects
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Render the dashboard page to stdout
    Render {
        /// Tab to activate (dashboard, kanban, explorer, dialogue, automation)
        tab: String,
        /// Project to select on the kanban or explorer tab
        #[arg(long)]
        project: Option<String>,
        /// File to open in the explorer
        #[arg(long)]
        file: Option<String>,
        /// Snapshot file to read
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Save an agent-produced task list under <data_dir>/tasks
    Decompose {
        /// The vision the tasks were derived from
        vision: String,
        /// JSON array of tasks; read from stdin when omitted
        #[arg(long)]
        tasks: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lumi=info,lumi_lib=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::resolve();

    let result = match cli.command {
        Commands::Serve {
            port,
            bind,
            web_dir,
            snapshot,
        } => {
            if let Some(port) = port {
                settings.port = port;
            }
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            if let Some(web_dir) = web_dir {
                if snapshot.is_none() {
                    settings.snapshot_path = web_dir.join(scan::SCRIPT_FILE);
                }
                settings.web_dir = web_dir;
            }
            if let Some(snapshot) = snapshot {
                settings.snapshot_path = snapshot;
            }
            webui::run_server(&settings)
        }
        Commands::Scan { root, max_depth } => {
            if let Some(root) = root {
                settings.workspace_root = root;
            }
            if let Some(max_depth) = max_depth {
                settings.max_depth = max_depth;
            }
            run_scan(&settings)
        }
        Commands::Render {
            tab,
            project,
            file,
            snapshot,
        } => {
            if let Some(snapshot) = snapshot {
                settings.snapshot_path = snapshot;
            }
            run_render(&settings, &tab, project, file)
        }
        Commands::Decompose { vision, tasks } => run_decompose(&settings, &vision, tasks),
        Commands::Version => {
            println!("🌙 Lumi v{}", VERSION);
            println!("Workspace dashboard for Sho and Lumi");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_scan(settings: &Settings) -> Result<()> {
    let report = scan::run(settings)?;
    println!(
        "{} Illuminated {} projects",
        "✓".green(),
        report.projects.to_string().bold()
    );
    println!("  {} {}", "state:".dimmed(), report.state_path.display());
    println!("  {} {}", "script:".dimmed(), report.script_path.display());
    Ok(())
}

fn run_decompose(settings: &Settings, vision: &str, tasks: Option<PathBuf>) -> Result<()> {
    let raw = match tasks {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read tasks from stdin")?,
    };
    let dir = decompose::tasks_dir(&settings.data_dir);
    let ids = decompose::decompose(&dir, vision, &raw)?;
    println!("{} Saved {} tasks to {}", "✓".green(), ids.len().to_string().bold(), dir.display());
    for id in ids {
        println!("  {}", id);
    }
    Ok(())
}

fn run_render(
    settings: &Settings,
    tab_id: &str,
    project: Option<String>,
    file: Option<String>,
) -> Result<()> {
    let Some(tab) = Tab::from_id(tab_id) else {
        let known: Vec<&str> = Tab::ALL.iter().map(|t| t.id()).collect();
        bail!("Unknown tab '{}' (expected one of: {})", tab_id, known.join(", "));
    };

    let mut request = PageRequest {
        tab: Some(tab.id().to_string()),
        file,
        ..Default::default()
    };
    match tab {
        Tab::Kanban => request.kanban_project = project,
        Tab::Explorer => request.explorer_project = project,
        _ => {}
    }

    let loaded = snapshot::load(&settings.snapshot_path);
    let markdown = CommonMark;
    let page = Page::build(&markdown, loaded.as_ref(), &request);
    println!("{}", page.to_html()?);
    Ok(())
}
