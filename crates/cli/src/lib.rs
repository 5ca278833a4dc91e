use anime_filters_engine::FilterEngine;
use anime_filters_protocol::{serialize_json, CommandRequest, CommandResponse, FilterCommand};
use anime_filters_store::{open_store, Backend, LabelOrder, Partition};
use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use config::{AppConfig, ConfigOverrides};
use dispatch::CommandHandler;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

mod config;
mod dispatch;
mod http_api;
mod render;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "anime-filters")]
#[command(about = "Per-chat anime filter lists", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (default: ./anime-filters.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON data file or SQLite database path
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Storage backend: json|sqlite
    #[arg(long, global = true)]
    backend: Option<Backend>,

    /// scoped (one list per chat) or global (one shared list)
    #[arg(long, global = true)]
    partition: Option<Partition>,

    /// Listing order: insertion|sorted
    #[arg(long, global = true)]
    order: Option<LabelOrder>,

    /// Labels per page for `page`
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Chat the command applies to
    #[arg(long, global = true, default_value = "local", allow_hyphen_values = true)]
    chat: String,

    /// Print the full JSON response instead of the chat text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Chat(ChatCommand),

    /// Execute a JSON CommandRequest
    Command(CommandArgs),

    /// Serve the command API over HTTP (POST /command, GET /health)
    ServeHttp(ServeArgs),
}

/// Commands answered for a single chat, the way the bot would reply.
#[derive(Subcommand)]
enum ChatCommand {
    /// Add anime names (comma-separated)
    Add(TextArgs),

    /// Add one anime name, commas included
    AddOne(TextArgs),

    /// Show the whole filter list
    List,

    /// Show one page of the filter list
    Page(PageArgs),

    /// Find anime whose name contains the text (case-sensitive)
    Search(TextArgs),

    /// Stop showing filters in this chat
    Stop,

    /// Show filters again in this chat
    Restart,

    /// Number of anime in the list
    Count,

    /// Print the bot welcome text
    Start,

    /// Print the bot help text
    HelpText,
}

#[derive(Args)]
struct TextArgs {
    #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
    text: Vec<String>,
}

#[derive(Args)]
struct PageArgs {
    /// One-based page number
    #[arg(allow_negative_numbers = true)]
    number: Option<i64>,
}

#[derive(Args)]
struct CommandArgs {
    /// Inline JSON request
    #[arg(long, conflicts_with = "file")]
    request: Option<String>,

    /// Read the JSON request from a file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers.
    if cli.json || matches!(cli.command, Commands::Command(_)) {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.filter_module("sqlx", log::LevelFilter::Warn);
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(&cli)?;
    let store = open_store(&config.store)
        .await
        .with_context(|| format!("Failed to open {}", config.store.resolved_path().display()))?;
    let handler = CommandHandler::new(
        FilterEngine::new(store, config.engine_config()),
        config.batch_add,
    );

    match cli.command {
        Commands::Command(args) => run_command(&handler, &args).await,
        Commands::ServeHttp(args) => http_api::serve(&args.bind, handler).await,
        Commands::Chat(command) => {
            let request = local_request(command, cli.chat);
            let response = handler.execute(request).await;
            emit(&response, cli.json)
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let mut config = AppConfig::discover(cli.config.as_deref(), &cwd)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    config.apply_overrides(&ConfigOverrides {
        backend: cli.backend,
        data: cli.data.clone(),
        partition: cli.partition,
        order: cli.order,
        page_size: cli.page_size,
    })?;
    log::debug!("effective config: {config:?}");
    Ok(config)
}

fn local_request(command: ChatCommand, chat_id: String) -> CommandRequest {
    let (command, args, page) = match command {
        ChatCommand::Add(text) => (FilterCommand::Add, text.text.join(" "), None),
        ChatCommand::AddOne(text) => (FilterCommand::AddOne, text.text.join(" "), None),
        ChatCommand::List => (FilterCommand::List, String::new(), None),
        ChatCommand::Page(args) => (FilterCommand::Page, String::new(), args.number),
        ChatCommand::Search(text) => (FilterCommand::Search, text.text.join(" "), None),
        ChatCommand::Stop => (FilterCommand::Stop, String::new(), None),
        ChatCommand::Restart => (FilterCommand::Restart, String::new(), None),
        ChatCommand::Count => (FilterCommand::Count, String::new(), None),
        ChatCommand::Start => (FilterCommand::Start, String::new(), None),
        ChatCommand::HelpText => (FilterCommand::Help, String::new(), None),
    };
    CommandRequest {
        chat_id,
        command,
        args,
        page,
    }
}

fn emit(response: &CommandResponse, json: bool) -> Result<()> {
    if json {
        print_stdout(&serialize_json(response)?)?;
    } else {
        print_stdout(&response.text)?;
    }
    fail_on_error(response)
}

fn fail_on_error(response: &CommandResponse) -> Result<()> {
    match &response.error {
        Some(error) if !response.is_ok() => anyhow::bail!("{}: {}", error.code, error.message),
        _ => Ok(()),
    }
}

async fn run_command(handler: &CommandHandler, args: &CommandArgs) -> Result<()> {
    let raw = read_payload(args)?;
    let request: CommandRequest =
        serde_json::from_str(&raw).context("Invalid JSON passed to --request/--file")?;

    let response = handler.execute(request).await;

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serialize_json(&response)?
    };
    print_stdout(&output)?;
    fail_on_error(&response)
}

fn read_payload(args: &CommandArgs) -> Result<String> {
    if let Some(raw) = &args.request {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!(
            "Command request is empty. Provide --request, --file, or pipe JSON via stdin."
        );
    }

    Ok(buffer)
}
