//! Command-line surface for the box office administrative console.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use boxoffice_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::client::{ApiClient, AppContext, CliDependencies, CliResult};
use crate::commands::{auth, bookings, movies, overview, session, showtimes};
use crate::confirm::TerminalConfirm;
use crate::console::Console;
use crate::session::{DEFAULT_BASE_URL, SessionStore, default_session_path};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAGE_SIZE: u32 = 50;
const ENV_LOG_FORMAT: &str = "BOXOFFICE_LOG_FORMAT";

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let log_format = LogFormat::from_name(env::var(ENV_LOG_FORMAT).ok().as_deref());
    if let Err(err) = init_logging(&LoggingConfig {
        level: &cli.log_level,
        format: log_format,
    }) {
        eprintln!("warning: {err:#}");
    }

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    tracing::debug!(command = command_name, %trace_id, "running command");

    match execute(cli, &trace_id).await {
        Ok(()) => 0,
        Err(err) => {
            let exit_code = err.exit_code();
            if !err.is_reported() {
                eprintln!("error: {}", err.display_message());
            }
            tracing::debug!(command = command_name, exit_code, "command failed");
            exit_code
        }
    }
}

async fn execute(cli: Cli, trace_id: &str) -> CliResult<()> {
    let deps = CliDependencies::new(cli.timeout, trace_id)?;
    let session_path = cli.session_file.unwrap_or_else(default_session_path);
    let store = SessionStore::load(session_path, &cli.default_api_url)?;

    let mut ctx = AppContext {
        api: ApiClient::new(deps.client),
        session: store,
        console: Console::stdio(),
        confirm: Arc::new(TerminalConfirm::new(cli.yes)),
        output: cli.output,
    };

    let result = dispatch(&mut ctx, cli.command).await;

    if cli.raw
        && let Some(raw) = ctx.api.last_response()
    {
        ctx.console.raw(&raw);
    }

    result
}

async fn dispatch(ctx: &mut AppContext, command: Command) -> CliResult<()> {
    match command {
        Command::Session(command) => match command {
            SessionCommand::Show => session::handle_show(ctx),
            SessionCommand::SetBaseUrl(args) => session::handle_set_base_url(ctx, &args),
            SessionCommand::SetToken(args) => session::handle_set_token(ctx, &args),
            SessionCommand::Logout => session::handle_logout(ctx),
        },
        Command::Auth(command) => match command {
            AuthCommand::Register(args) => auth::handle_register(ctx, args).await,
            AuthCommand::Login(args) => auth::handle_login(ctx, args).await,
        },
        Command::Movies(command) => match command {
            MovieCommand::List(args) => movies::handle_list(ctx, &args).await,
            MovieCommand::Show(args) => movies::handle_show(ctx, args.id).await,
            MovieCommand::Create(args) => movies::handle_create(ctx, &args).await,
            MovieCommand::Update(args) => movies::handle_update(ctx, &args).await,
            MovieCommand::Deactivate(args) => movies::handle_deactivate(ctx, args.id).await,
            MovieCommand::Delete(args) => movies::handle_delete(ctx, args.id).await,
        },
        Command::Showtimes(command) => match command {
            ShowtimeCommand::List => showtimes::handle_list(ctx).await,
            ShowtimeCommand::Show(args) => showtimes::handle_show(ctx, args.id).await,
            ShowtimeCommand::Create(args) => showtimes::handle_create(ctx, &args).await,
            ShowtimeCommand::Update(args) => showtimes::handle_update(ctx, &args).await,
            ShowtimeCommand::Deactivate(args) => showtimes::handle_deactivate(ctx, args.id).await,
            ShowtimeCommand::Delete(args) => showtimes::handle_delete(ctx, args.id).await,
        },
        Command::Bookings(command) => match command {
            BookingCommand::List => bookings::handle_list(ctx).await,
            BookingCommand::Create(args) => bookings::handle_create(ctx, &args).await,
            BookingCommand::Cancel(args) => bookings::handle_cancel(ctx, &args).await,
            BookingCommand::Delete(args) => bookings::handle_delete(ctx, args.id).await,
        },
        Command::Overview => overview::handle_overview(ctx).await,
    }
}

#[derive(Parser)]
#[command(
    name = "boxoffice",
    about = "Administrative console for the box office ticketing API"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "BOXOFFICE_SESSION_FILE",
        help = "Session file holding the API base URL and bearer token"
    )]
    session_file: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "BOXOFFICE_API_URL",
        default_value = DEFAULT_BASE_URL,
        help = "Base URL used until one is saved with `session set-base-url`"
    )]
    default_api_url: String,
    #[arg(
        long,
        global = true,
        env = "BOXOFFICE_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render records"
    )]
    output: OutputFormat,
    #[arg(
        short = 'y',
        long,
        global = true,
        help = "Answer yes to every confirmation prompt"
    )]
    yes: bool,
    #[arg(
        long,
        global = true,
        help = "Print the last raw API response to stderr"
    )]
    raw: bool,
    #[arg(
        long,
        global = true,
        env = "BOXOFFICE_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect or change the saved base URL and token.
    #[command(subcommand)]
    Session(SessionCommand),
    #[command(subcommand)]
    Auth(AuthCommand),
    #[command(subcommand)]
    Movies(MovieCommand),
    #[command(subcommand)]
    Showtimes(ShowtimeCommand),
    #[command(subcommand)]
    Bookings(BookingCommand),
    /// Load movies, showtimes, and bookings when authenticated.
    Overview,
}

#[derive(Subcommand)]
enum SessionCommand {
    Show,
    SetBaseUrl(SetBaseUrlArgs),
    SetToken(SetTokenArgs),
    Logout,
}

#[derive(Subcommand)]
enum AuthCommand {
    Register(RegisterArgs),
    Login(LoginArgs),
}

#[derive(Subcommand)]
enum MovieCommand {
    List(MovieListArgs),
    Show(RecordIdArgs),
    Create(MovieFormArgs),
    Update(MovieUpdateArgs),
    Deactivate(RecordIdArgs),
    Delete(RecordIdArgs),
}

#[derive(Subcommand)]
enum ShowtimeCommand {
    List,
    Show(RecordIdArgs),
    Create(ShowtimeFormArgs),
    Update(ShowtimeUpdateArgs),
    Deactivate(RecordIdArgs),
    Delete(RecordIdArgs),
}

#[derive(Subcommand)]
enum BookingCommand {
    List,
    Create(BookingFormArgs),
    Cancel(BookingCancelArgs),
    Delete(RecordIdArgs),
}

#[derive(Args)]
pub(crate) struct SetBaseUrlArgs {
    #[arg(help = "API base URL; blank restores the default")]
    pub(crate) url: String,
}

#[derive(Args)]
pub(crate) struct SetTokenArgs {
    #[arg(help = "Bearer token to store")]
    pub(crate) token: String,
}

#[derive(Args)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    pub(crate) username: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) full_name: String,
    #[arg(long, env = "BOXOFFICE_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) username: String,
    #[arg(long, env = "BOXOFFICE_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args)]
pub(crate) struct RecordIdArgs {
    #[arg(help = "Record identifier")]
    pub(crate) id: i64,
}

#[derive(Args)]
pub(crate) struct MovieListArgs {
    #[arg(long, default_value_t = 0)]
    pub(crate) skip: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub(crate) limit: u32,
}

impl Default for MovieListArgs {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Args, Default)]
pub(crate) struct MovieFormArgs {
    #[arg(long)]
    pub(crate) title: Option<String>,
    #[arg(long)]
    pub(crate) genre: Option<String>,
    #[arg(long, help = "Running time in minutes")]
    pub(crate) duration: Option<String>,
    #[arg(long)]
    pub(crate) description: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct MovieUpdateArgs {
    #[arg(long, help = "Movie to update")]
    pub(crate) id: Option<String>,
    #[command(flatten)]
    pub(crate) form: MovieFormArgs,
}

#[derive(Args, Default)]
pub(crate) struct ShowtimeFormArgs {
    #[arg(long)]
    pub(crate) movie_id: Option<String>,
    #[arg(
        long,
        help = "Start as RFC 3339 or local YYYY-MM-DDTHH:MM[:SS]"
    )]
    pub(crate) start: Option<String>,
    #[arg(long)]
    pub(crate) total_seats: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct ShowtimeUpdateArgs {
    #[arg(long, help = "Showtime to update")]
    pub(crate) id: Option<String>,
    #[command(flatten)]
    pub(crate) form: ShowtimeFormArgs,
}

#[derive(Args, Default)]
pub(crate) struct BookingFormArgs {
    #[arg(long)]
    pub(crate) showtime_id: Option<String>,
    #[arg(long)]
    pub(crate) seats: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct BookingCancelArgs {
    #[arg(long, help = "Booking to cancel")]
    pub(crate) id: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
    Html,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Session(SessionCommand::Show) => "session_show",
        Command::Session(SessionCommand::SetBaseUrl(_)) => "session_set_base_url",
        Command::Session(SessionCommand::SetToken(_)) => "session_set_token",
        Command::Session(SessionCommand::Logout) => "session_logout",
        Command::Auth(AuthCommand::Register(_)) => "auth_register",
        Command::Auth(AuthCommand::Login(_)) => "auth_login",
        Command::Movies(command) => match command {
            MovieCommand::List(_) => "movies_list",
            MovieCommand::Show(_) => "movies_show",
            MovieCommand::Create(_) => "movies_create",
            MovieCommand::Update(_) => "movies_update",
            MovieCommand::Deactivate(_) => "movies_deactivate",
            MovieCommand::Delete(_) => "movies_delete",
        },
        Command::Showtimes(command) => match command {
            ShowtimeCommand::List => "showtimes_list",
            ShowtimeCommand::Show(_) => "showtimes_show",
            ShowtimeCommand::Create(_) => "showtimes_create",
            ShowtimeCommand::Update(_) => "showtimes_update",
            ShowtimeCommand::Deactivate(_) => "showtimes_deactivate",
            ShowtimeCommand::Delete(_) => "showtimes_delete",
        },
        Command::Bookings(command) => match command {
            BookingCommand::List => "bookings_list",
            BookingCommand::Create(_) => "bookings_create",
            BookingCommand::Cancel(_) => "bookings_cancel",
            BookingCommand::Delete(_) => "bookings_delete",
        },
        Command::Overview => "overview",
    }
}
