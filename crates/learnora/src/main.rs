use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use learnora::commands::{self, GlobalOptions, Workspace};
use learnora::config::UserProfile;

#[derive(Parser)]
#[command(name = "learnora")]
#[command(about = "Ask a learning question, get a roadmap of articles and videos")]
#[command(version)]
struct Cli {
  /// Search backend base URL (or use LEARNORA_API_URL env var)
  #[arg(long, env = "LEARNORA_API_URL", global = true)]
  api_url: Option<String>,

  /// Directory holding settings and conversation history (or use LEARNORA_DIR env var)
  #[arg(long, env = "LEARNORA_DIR", global = true)]
  data_dir: Option<PathBuf>,

  /// Milliseconds to wait before showing a reply
  #[arg(long, global = true)]
  reply_delay_ms: Option<u64>,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Ask a question in the active conversation
  Ask {
    /// The question
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
    /// Start a new conversation for this question
    #[arg(long)]
    new: bool,
  },
  /// Interactive chat session
  Chat,
  /// List conversations, most recent first
  List,
  /// Show a conversation (the active one by default)
  Show {
    /// List position or conversation id
    conversation: Option<String>,
  },
  /// Make a conversation active
  Switch {
    /// List position or conversation id
    conversation: String,
  },
  /// Delete a conversation
  Delete {
    /// List position or conversation id
    conversation: String,
  },
  /// Check that the search backend is reachable
  Health,
  /// Show the signed-in user
  Whoami,
  /// Record the signed-in user's profile
  Login {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: Option<String>,
    /// Avatar URL
    #[arg(long)]
    picture: Option<String>,
  },
  /// Forget the signed-in user
  Logout,
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  if let Err(e) = run(cli).await {
    learnora::output::error(&format!("{e:#}"));
    std::process::exit(1);
  }
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("learnora=debug,warn")
    } else {
      EnvFilter::new("learnora=warn,error")
    }
  });

  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
}

async fn run(cli: Cli) -> Result<()> {
  let options = GlobalOptions {
    api_url: cli.api_url,
    data_dir: cli.data_dir,
    reply_delay_ms: cli.reply_delay_ms,
  };
  let mut workspace = Workspace::open(&options)?;

  match cli.command {
    Commands::Ask { query, new } => commands::ask::handle(&workspace, query.join(" "), new).await,
    Commands::Chat => commands::chat::handle(&workspace).await,
    Commands::List => commands::list::handle(&workspace).await,
    Commands::Show { conversation } => commands::show::handle(&workspace, conversation).await,
    Commands::Switch { conversation } => commands::switch::handle(&workspace, conversation).await,
    Commands::Delete { conversation } => commands::delete::handle(&workspace, conversation).await,
    Commands::Health => commands::health::handle(&workspace).await,
    Commands::Whoami => commands::profile::whoami(&workspace),
    Commands::Login { name, email, picture } => {
      let profile = UserProfile { name: Some(name), email, picture };
      commands::profile::login(&mut workspace, profile)
    }
    Commands::Logout => commands::profile::logout(&mut workspace),
  }
}
