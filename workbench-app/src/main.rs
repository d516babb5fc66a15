use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use workbench_app::config::DEFAULT_CONFIG_PATH;
use workbench_app::{AgentPanel, Config, Cursor, EditorSession};
use workbench_executor::{RunSummary, TaskReport};
use workbench_interfaces::{AutoApprove, Confirmation, TerminalInterface};
use workbench_predictor::{NGramModel, SharedModel};
use workbench_tasks::{TaskStatus, TodoList};
use workbench_tools::Workspace;

#[derive(Parser)]
#[command(name = "workbench")]
#[command(version)]
#[command(about = "Analyze a project, run the proposed tasks, and get completions while editing", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, env = "WORKBENCH_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a workspace and list the proposed tasks
    Analyze {
        /// Workspace root
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Print the todo list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze a workspace and run the proposed tasks
    Run {
        /// Workspace root
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Run only the task with this id
        #[arg(short, long)]
        task: Option<String>,

        /// Approve every confirmation without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Run the tasks of a JSON plan file
    Apply {
        /// Plan file (`{"tasks": [...]}`)
        plan: PathBuf,

        /// Approve every confirmation without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Train on a file and suggest next tokens
    Suggest {
        /// File to open
        file: PathBuf,

        /// Suggest for this text appended to the file, then exit
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load_or_default(&config_path)?;
    let workspace: Arc<dyn Workspace> = Arc::new(config.workspace());

    match cli.command {
        Commands::Analyze { root, json } => {
            let mut panel = AgentPanel::new(
                workspace,
                Arc::new(TerminalInterface::new()),
                config.analyzer.clone(),
            );
            panel.analyze(&root).await?;
            if json {
                println!("{}", panel.todos().to_json()?);
            } else {
                print_todos(&panel);
            }
        }
        Commands::Run { root, task, yes } => {
            let mut panel = AgentPanel::new(workspace, confirmation(yes), config.analyzer.clone());
            panel.analyze(&root).await?;
            print_todos(&panel);

            let summary = match task {
                Some(id) => {
                    let report = panel
                        .run_task(&id)
                        .await
                        .with_context(|| format!("No task with id '{}'", id))?;
                    RunSummary {
                        reports: vec![report],
                    }
                }
                None => panel.run_all().await,
            };
            print_log(&panel);
            print_summary(&summary);
        }
        Commands::Apply { plan, yes } => {
            let content = tokio::fs::read_to_string(&plan)
                .await
                .with_context(|| format!("Failed to read {}", plan.display()))?;
            let todos = TodoList::from_json(&content)
                .with_context(|| format!("Invalid plan {}", plan.display()))?;

            let mut panel = AgentPanel::new(workspace, confirmation(yes), config.analyzer.clone());
            panel.replace(todos);
            print_todos(&panel);
            let summary = panel.run_all().await;
            print_log(&panel);
            print_summary(&summary);
        }
        Commands::Suggest { file, prefix } => {
            let model = SharedModel::new(NGramModel::with_config(config.predictor.clone())?);
            let mut session = EditorSession::new(workspace, model, config.editor.clone());
            session
                .open(&file)
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?;

            match prefix {
                Some(prefix) => {
                    let text = format!("{}{}", session.content(), prefix);
                    let suggestions = session.content_changed(&text, Cursor::end_of(&text));
                    print_suggestions(suggestions);
                }
                None => run_suggest_loop(&mut session, &file).await?,
            }
        }
    }

    Ok(())
}

fn confirmation(yes: bool) -> Arc<dyn Confirmation> {
    if yes {
        Arc::new(AutoApprove)
    } else {
        Arc::new(TerminalInterface::new())
    }
}

// Each stdin line is appended to the buffer as an edit. `:w` saves, `:q` quits.
async fn run_suggest_loop(session: &mut EditorSession, file: &Path) -> Result<()> {
    println!(
        "Editing {} ({} contexts learned). Type lines; :w saves, :q quits.",
        file.display(),
        session.model().context_count()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buffer = session.content().to_string();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":q" => break,
            ":w" => {
                match session.save().await {
                    Ok(()) => println!("Saved"),
                    Err(e) => eprintln!("Save failed: {}", e),
                }
                continue;
            }
            _ => {}
        }

        if !buffer.is_empty() && !buffer.ends_with('\n') {
            buffer.push('\n');
        }
        buffer.push_str(&line);
        let suggestions = session.content_changed(&buffer, Cursor::end_of(&buffer));
        print_suggestions(suggestions);
    }

    Ok(())
}

fn print_todos(panel: &AgentPanel) {
    if panel.todos().is_empty() {
        println!("No tasks.");
        return;
    }
    println!("Tasks:");
    for line in panel.describe() {
        println!("  {}", line);
    }
    println!();
}

fn print_log(panel: &AgentPanel) {
    for line in panel.log().lines() {
        println!("{}", line);
    }
}

fn print_report(report: &TaskReport, depth: usize) {
    let marker = match report.status {
        TaskStatus::Completed => "✅",
        TaskStatus::Failed => "❌",
        TaskStatus::Skipped => "⏭️ ",
        TaskStatus::Pending | TaskStatus::Running => "…",
    };
    let detail = report
        .detail
        .as_deref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default();
    println!(
        "{}{} [{}] {}{}",
        "  ".repeat(depth),
        marker,
        report.id,
        report.title,
        detail
    );
    for sub in &report.subtasks {
        print_report(sub, depth + 1);
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    for report in &summary.reports {
        print_report(report, 0);
    }
    println!(
        "\n{} completed, {} skipped, {} failed",
        summary.completed(),
        summary.skipped(),
        summary.failed()
    );
}

fn print_suggestions(suggestions: &[String]) {
    if suggestions.is_empty() {
        println!("Suggestions: (none)");
    } else {
        println!("Suggestions: {}", suggestions.join(", "));
    }
}
