//! Taches CLI - a small personal task list backed by SQLite.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, BufRead, Write};
use taches::config::{self, Config};
use taches::{Gateway, StoreError, Task};

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = config::data_dir().join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("taches.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    Ok(config)
}

/// Destructive commands prompt only when confirmations are on and `--yes` was not given.
fn should_confirm(confirmations: bool, yes: bool) -> bool {
    confirmations && !yes
}

fn require_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        eyre::bail!("A task title is required");
    }
    Ok(())
}

/// Fields not given on the command line keep their stored value.
fn merge_edit(existing: Task, title: Option<String>, description: Option<String>) -> Result<(String, String)> {
    let title = title.unwrap_or(existing.title);
    let description = description.unwrap_or(existing.description);
    require_title(&title)?;
    Ok((title, description))
}

/// Ask a yes/no question on stdin. Anything but y/yes is a no.
fn confirm(question: &str) -> Result<bool> {
    print!("{} {} [y/N] ", "?".yellow(), question);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn format_check(task: &Task) -> ColoredString {
    if task.completed { "[x]".green() } else { "[ ]".normal() }
}

fn print_task_line(task: &Task) {
    let title = if task.completed {
        task.title.dimmed().strikethrough()
    } else {
        task.title.normal()
    };
    println!(
        "{} {} {}{}",
        format_check(task),
        format!("#{}", task.id).cyan(),
        title,
        if task.description.is_empty() {
            String::new()
        } else {
            format!("\n    {}", task.description.dimmed())
        }
    );
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let ask = should_confirm(config.confirmations, cli.yes);
    let gateway = Gateway::new(&config.db_path);

    if !matches!(cli.command, Command::Config) {
        gateway.initialize().await?;
    }

    match cli.command {
        Command::Add { title, description } => {
            require_title(&title)?;
            let task = gateway
                .create_task(&title, &description)
                .await
                .context("Failed to save task")?;

            println!("{} Added: {} {}", "✓".green(), format!("#{}", task.id).cyan(), task.title);
        }

        Command::List { pending, json } => {
            let tasks = gateway.list_tasks(!pending).await.context("Failed to list tasks")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("{}", "No tasks".dimmed());
            } else {
                for task in &tasks {
                    print_task_line(task);
                }
                let counts = gateway.counts().await?;
                println!(
                    "{}",
                    format!("{} task(s), {} done, {} to do", counts.total, counts.completed, counts.pending).dimmed()
                );
            }
        }

        Command::Show { id, json } => {
            let task = gateway.get_task(id).await.context("Failed to load task")?;

            match task {
                Some(task) if json => println!("{}", serde_json::to_string_pretty(&task)?),
                Some(task) => {
                    println!("{}: {}", "ID".bold(), task.id.to_string().cyan());
                    println!("{}: {}", "Title".bold(), task.title);
                    if !task.description.is_empty() {
                        println!("{}: {}", "Description".bold(), task.description);
                    }
                    println!(
                        "{}: {}",
                        "Status".bold(),
                        if task.completed { "done".green() } else { "to do".yellow() }
                    );
                    println!("{}: {}", "Created".bold(), task.created_at);
                    if let Some(completed_at) = &task.completed_at {
                        println!("{}: {}", "Completed".bold(), completed_at);
                    }
                }
                None => eyre::bail!(StoreError::TaskNotFound(id)),
            }
        }

        Command::Edit { id, title, description } => {
            let existing = gateway
                .get_task(id)
                .await
                .context("Failed to load task")?
                .ok_or_else(|| eyre::eyre!(StoreError::TaskNotFound(id)))?;

            let (title, description) = merge_edit(existing, title, description)?;

            // The row may have been deleted since it was loaded
            if !gateway
                .update_task(id, &title, &description)
                .await
                .context("Failed to save changes")?
            {
                eyre::bail!(StoreError::TaskNotFound(id));
            }

            println!("{} Updated: {} {}", "✓".green(), format!("#{}", id).cyan(), title.trim());
        }

        Command::Toggle { id } => {
            let task = gateway.toggle_completion(id).await?;
            let state = if task.completed { "Done".green() } else { "Reopened".yellow() };
            println!("{} {}: {} {}", "✓".green(), state, format!("#{}", task.id).cyan(), task.title);
        }

        Command::Delete { id } => {
            if ask && !confirm(&format!("Delete task #{}?", id))? {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            if gateway.delete_task(id).await.context("Failed to delete task")? {
                println!("{} Deleted #{}", "✓".green(), id);
            } else {
                println!("{} No task #{}", "✗".red(), id);
            }
        }

        Command::Reset => {
            if ask && !confirm("Delete ALL tasks permanently?")? {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            let removed = gateway.reset_all().await.context("Failed to reset the task database")?;
            println!("{} Removed {} task(s)", "✓".green(), removed);
        }

        Command::Seed => {
            if ask && !confirm("Add 5 sample tasks?")? {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            let created = gateway
                .seed_sample_data()
                .await
                .context("Failed to add sample tasks")?;
            println!("{} Added {} sample task(s)", "✓".green(), created.len());
        }

        Command::Config => {
            print!("{}", config.to_yaml()?);
            if let Some(path) = config::config_path() {
                println!("{}", format!("# config file: {}", path.display()).dimmed());
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    let result = load_config(&cli).and_then(|config| {
        let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
        rt.block_on(run(cli, config))
    });

    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored_task() -> Task {
        Task {
            id: 3,
            title: "Stored title".to_string(),
            description: "Stored notes".to_string(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn test_should_confirm() {
        assert!(should_confirm(true, false));
        assert!(!should_confirm(true, true));
        assert!(!should_confirm(false, false));
        assert!(!should_confirm(false, true));
    }

    #[test]
    fn test_require_title_rejects_blank() {
        assert!(require_title("Buy bread").is_ok());
        assert!(require_title("").is_err());
        assert!(require_title("  \t ").is_err());
    }

    #[test]
    fn test_merge_edit_keeps_missing_fields() {
        let (title, description) = merge_edit(stored_task(), None, None).unwrap();
        assert_eq!(title, "Stored title");
        assert_eq!(description, "Stored notes");

        let (title, description) = merge_edit(stored_task(), Some("New title".to_string()), None).unwrap();
        assert_eq!(title, "New title");
        assert_eq!(description, "Stored notes");

        let (title, description) = merge_edit(stored_task(), None, Some(String::new())).unwrap();
        assert_eq!(title, "Stored title");
        assert_eq!(description, "");
    }

    #[test]
    fn test_merge_edit_rejects_blank_title() {
        assert!(merge_edit(stored_task(), Some("   ".to_string()), None).is_err());
    }

    #[test]
    fn test_yes_flag_parses_after_subcommand() {
        let cli = Cli::try_parse_from(["taches", "reset", "-y"]).unwrap();
        assert!(cli.yes);
        assert!(matches!(cli.command, Command::Reset));

        let cli = Cli::try_parse_from(["taches", "edit", "4", "-t", "Renamed"]).unwrap();
        assert!(!cli.yes);
        match cli.command {
            Command::Edit { id, title, description } => {
                assert_eq!(id, 4);
                assert_eq!(title.as_deref(), Some("Renamed"));
                assert!(description.is_none());
            }
            _ => panic!("expected edit command"),
        }
    }
}
