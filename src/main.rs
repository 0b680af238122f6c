use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use linkup_client::app_config::AppConfig;
use linkup_client::commands::{
    AppContext, DoctorHandler, EventsHandler, ProfileHandler, SessionHandler,
};
use linkup_client::models::{EventFilters, EventPatch, EventType, NewEvent, ResponseStatus, UserPatch};

#[derive(Parser)]
#[command(name = "linkup")]
#[command(about = "Terminal client for the LinkUp mini app backend")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// sign in, restoring the cached session when present
    Login,
    /// drop the session and the cached profile
    Logout,
    /// show who is signed in
    Whoami,
    /// discard the session and sign in from scratch
    Reauth,
    /// show or edit the profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// browse and manage events
    Events {
        #[command(subcommand)]
        command: EventsCommand,
    },
    /// print environment and connectivity diagnostics
    Doctor {
        /// discard the session and sign in again after the checks
        #[arg(long)]
        force_reauth: bool,
        /// drop the cached profile after the checks
        #[arg(long)]
        clear_cache: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show,
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        /// comma-separated list, replaces the stored one
        #[arg(long, value_delimiter = ',')]
        interests: Option<Vec<String>>,
        /// comma-separated photo URLs, replaces the stored list
        #[arg(long, value_delimiter = ',')]
        photos: Option<Vec<String>>,
    },
}

#[derive(Subcommand)]
enum EventsCommand {
    /// list events, optionally filtered
    List {
        #[arg(long, value_enum)]
        kind: Option<EventKind>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        open: Option<bool>,
    },
    /// list the signed-in user's events
    Mine,
    Show {
        event_id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        datetime: String,
        #[arg(long, value_enum, default_value = "custom")]
        kind: EventKind,
        /// create the event invitation-only
        #[arg(long)]
        closed: bool,
    },
    Edit {
        event_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        datetime: Option<String>,
        #[arg(long, value_enum)]
        kind: Option<EventKind>,
        #[arg(long)]
        open: Option<bool>,
    },
    /// list responses to an event
    Responses {
        event_id: String,
    },
    /// respond to an event as the signed-in user
    Respond {
        event_id: String,
    },
    /// accept or reject a response to one of your events
    SetResponse {
        response_id: String,
        #[arg(value_enum)]
        decision: Decision,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EventKind {
    Custom,
    City,
    Business,
}

impl From<EventKind> for EventType {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Custom => EventType::Custom,
            EventKind::City => EventType::City,
            EventKind::Business => EventType::Business,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Decision {
    Accept,
    Reject,
}

impl From<Decision> for ResponseStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accept => ResponseStatus::Accepted,
            Decision::Reject => ResponseStatus::Rejected,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // load .env file if it exists
    if let Err(e) = dotenvy::dotenv() {
        match e {
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file not found, which is fine
            }
            _ => {
                eprintln!("warning: failed to load .env file: {}", e);
            }
        }
    }

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let config = AppConfig::from_env();
    info!(
        "Resolved environment {} with backend {}",
        config.environment.name(),
        config.api_base
    );

    let ctx = AppContext::bootstrap(config)?;

    match args.command {
        Command::Login => SessionHandler::handle_login(&ctx).await,
        Command::Logout => SessionHandler::handle_logout(&ctx).await,
        Command::Whoami => SessionHandler::handle_whoami(&ctx).await,
        Command::Reauth => SessionHandler::handle_reauth(&ctx).await,
        Command::Profile { command } => match command {
            ProfileCommand::Show => ProfileHandler::handle_show(&ctx).await,
            ProfileCommand::Set {
                name,
                bio,
                avatar,
                interests,
                photos,
            } => {
                let patch = UserPatch {
                    name,
                    avatar_url: avatar,
                    bio,
                    interests,
                    photos,
                };
                ProfileHandler::handle_set(&ctx, patch).await
            }
        },
        Command::Events { command } => match command {
            EventsCommand::List {
                kind,
                location,
                date,
                open,
            } => {
                let filters = EventFilters {
                    event_type: kind.map(EventType::from),
                    location,
                    date,
                    is_open: open,
                };
                EventsHandler::handle_list(&ctx, filters).await
            }
            EventsCommand::Mine => EventsHandler::handle_mine(&ctx).await,
            EventsCommand::Show { event_id } => EventsHandler::handle_show(&ctx, &event_id).await,
            EventsCommand::Create {
                title,
                description,
                location,
                datetime,
                kind,
                closed,
            } => {
                let event = NewEvent {
                    title,
                    description,
                    location,
                    datetime,
                    event_type: kind.into(),
                    is_open: !closed,
                };
                EventsHandler::handle_create(&ctx, event).await
            }
            EventsCommand::Edit {
                event_id,
                title,
                description,
                location,
                datetime,
                kind,
                open,
            } => {
                let patch = EventPatch {
                    title,
                    description,
                    location,
                    datetime,
                    is_open: open,
                    event_type: kind.map(EventType::from),
                };
                EventsHandler::handle_edit(&ctx, &event_id, patch).await
            }
            EventsCommand::Responses { event_id } => {
                EventsHandler::handle_responses(&ctx, &event_id).await
            }
            EventsCommand::Respond { event_id } => {
                EventsHandler::handle_respond(&ctx, &event_id).await
            }
            EventsCommand::SetResponse {
                response_id,
                decision,
            } => EventsHandler::handle_set_response(&ctx, &response_id, decision.into()).await,
        },
        Command::Doctor {
            force_reauth,
            clear_cache,
        } => DoctorHandler::handle_doctor(&ctx, force_reauth, clear_cache).await,
    }
}
