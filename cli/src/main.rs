use clap::{Parser, Subcommand, ValueEnum};
use tasklist::view::render;
use tasklist::{
    ClientConfig, DarkMode, FilePreferenceStore, Filter, HttpTaskApi, TaskApi, TaskListClient,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] tasklist::ConfigError),
    #[error(transparent)]
    Client(#[from] tasklist::ClientError),
    #[error(transparent)]
    Prefs(#[from] tasklist::PrefsError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tasklist", about = "To-do list client for a remote task service")]
struct Cli {
    #[arg(long, env = "TASKLIST_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "TASKLIST_PREFS_PATH")]
    prefs_path: Option<String>,

    /// Print the visible tasks as JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Tasks(TaskCommand),
    DarkMode {
        #[arg(value_enum, default_value_t = DarkModeAction::Show)]
        action: DarkModeAction,
    },
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    List {
        #[arg(long, default_value_t = Filter::All)]
        filter: Filter,
    },
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    Toggle {
        id: String,
    },
    Edit {
        id: String,
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DarkModeAction {
    Show,
    Toggle,
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_values(cli.base_url.as_deref(), cli.prefs_path.as_deref())?;
    tracing::debug!(base_url = %config.base_url, "config loaded");

    match cli.command {
        Command::DarkMode { action } => run_dark_mode(&config, action),
        Command::Tasks(command) => run_tasks(&config, command, cli.json).await,
    }
}

fn run_dark_mode(config: &ClientConfig, action: DarkModeAction) -> Result<(), CliError> {
    let dark = DarkMode::new(FilePreferenceStore::new(&config.prefs_path));
    let enabled = match action {
        DarkModeAction::Show => dark.read(),
        DarkModeAction::Toggle => dark.toggle()?,
        DarkModeAction::On => {
            dark.set(true)?;
            true
        }
        DarkModeAction::Off => {
            dark.set(false)?;
            false
        }
    };
    println!("dark mode: {}", if enabled { "on" } else { "off" });
    Ok(())
}

async fn run_tasks(config: &ClientConfig, command: TaskCommand, json: bool) -> Result<(), CliError> {
    let mut client = TaskListClient::new(HttpTaskApi::from_config(config)?);
    client.load_all().await?;

    match command {
        TaskCommand::List { filter } => client.set_filter(filter),
        TaskCommand::Add { title } => {
            client.set_draft(title.join(" "));
            client.create().await?;
        }
        TaskCommand::Toggle { id } => {
            let id = client.resolve_id(&id)?;
            client.toggle(&id).await?;
        }
        TaskCommand::Edit { id, title } => {
            let id = client.resolve_id(&id)?;
            client.begin_edit(&id)?;
            client.set_edit_title(title.join(" "));
            client.commit_edit().await?;
        }
        TaskCommand::Delete { id } => {
            let id = client.resolve_id(&id)?;
            client.delete(&id).await?;
        }
    }

    print_tasks(&client, json)
}

fn print_tasks<A: TaskApi>(client: &TaskListClient<A>, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&client.visible())?);
    } else {
        print!("{}", render(client));
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
