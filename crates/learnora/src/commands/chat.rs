use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{delete, list, show, switch, Workspace};
use crate::display::{display_message, display_transcript, display_typing_indicator};
use crate::output;

const HELP: &str = "\
/new              start a new conversation
/list             list conversations
/switch <n|id>    switch to a conversation
/delete <n|id>    delete a conversation
/show             show the active conversation
/quit             leave";

enum Action {
  Continue,
  Quit,
}

/// Interactive session: plain lines are queries, `/` lines are commands
pub async fn handle(workspace: &Workspace) -> Result<()> {
  output::announce("Learnora");
  output::info("Ask anything to get a learning roadmap. Type /help for commands.");
  show::handle(workspace, None).await?;

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  loop {
    prompt()?;
    let Some(line) = lines.next_line().await? else {
      break;
    };

    let input = line.trim();
    if input.is_empty() {
      continue;
    }

    if let Some(command) = input.strip_prefix('/') {
      match run_command(workspace, command).await {
        Ok(Action::Quit) => break,
        Ok(Action::Continue) => {}
        Err(e) => output::error(&e.to_string()),
      }
      continue;
    }

    submit(workspace, input).await;
  }

  Ok(())
}

fn prompt() -> Result<()> {
  print!("> ");
  std::io::stdout().flush()?;
  Ok(())
}

async fn run_command(workspace: &Workspace, command: &str) -> Result<Action> {
  let (name, argument) = match command.split_once(char::is_whitespace) {
    Some((name, rest)) => (name, rest.trim()),
    None => (command, ""),
  };

  match name {
    "new" => {
      let conversation = workspace.store().lock().await.create_conversation();
      display_transcript(&conversation);
    }
    "list" => list::handle(workspace).await?,
    "switch" if !argument.is_empty() => switch::handle(workspace, argument.to_string()).await?,
    "delete" if !argument.is_empty() => delete::handle(workspace, argument.to_string()).await?,
    "show" => show::handle(workspace, None).await?,
    "help" => println!("{HELP}"),
    "quit" | "exit" => return Ok(Action::Quit),
    "switch" | "delete" => output::warn(&format!("Usage: /{name} <n|id>")),
    _ => output::warn(&format!("Unknown command '/{name}'. Type /help for commands.")),
  }

  Ok(Action::Continue)
}

/// Send a query without blocking the prompt; the reply prints when it lands
async fn submit(workspace: &Workspace, input: &str) {
  let conversation_id = workspace.store().lock().await.active_id().clone();
  if workspace.flow.is_awaiting_reply(&conversation_id) {
    output::info("A previous question is still being answered; replies arrive as they complete.");
  }

  let Some(handle) = workspace.flow.submit_query(&conversation_id, input).await else {
    return;
  };
  display_typing_indicator();

  let store = Arc::clone(workspace.store());
  tokio::spawn(async move {
    let Ok(Some(reply)) = handle.await else {
      return;
    };

    let store = store.lock().await;
    if store.active_id() == &conversation_id {
      display_message(&reply);
    } else if let Some(conversation) = store.get(&conversation_id) {
      output::info(&format!("New reply in \"{}\"", conversation.title));
    }
  });
}
