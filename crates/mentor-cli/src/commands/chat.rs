//! Interactive chat REPL.
//!
//! A rustyline-based loop that sends questions to the mentor and reveals
//! each answer character by character. Ctrl-C during a reveal short-circuits
//! the animation and prints the remainder at once.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tokio_util::sync::CancellationToken;

use mentor_core::chat::{ChatMessage, Sender, reveal};

use crate::app::App;
use crate::commands::{auth, notifications};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/help".to_string(),
                "/clear".to_string(),
                "/whoami".to_string(),
                "/notifications".to_string(),
                "/logout".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Runs the chat REPL until the user quits.
pub async fn run(app: &App) -> Result<()> {
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== FCDS Mentor ===".bright_magenta().bold());
    match app.identity.identity().await {
        Some(identity) => println!(
            "{}",
            format!("Logged in as {}.", identity.username).bright_black()
        ),
        None => println!(
            "{}",
            "Not logged in; questions are sent as a guest.".bright_black()
        ),
    }
    println!(
        "{}",
        "Ask a question, use /help for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    replay_transcript(app).await?;

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if let Some(command) = trimmed.strip_prefix('/') {
                    handle_slash_command(app, command).await;
                    continue;
                }

                send_and_reveal(app, trimmed).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// Prints the persisted transcript so the conversation picks up where it
/// left off. Messages stranded mid-reveal by a previous run are shown in
/// full and marked revealed.
async fn replay_transcript(app: &App) -> Result<()> {
    let transcript = app.chat.transcript().await;
    for message in &transcript {
        print_message(message);
        if message.reveal_pending {
            app.chat.mark_reveal_complete(message.id).await?;
        }
    }
    if !transcript.is_empty() {
        println!();
    }
    Ok(())
}

fn print_message(message: &ChatMessage) {
    match message.sender {
        Sender::User => println!("{}", format!(">> {}", message.text).green()),
        Sender::Assistant => {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

async fn handle_slash_command(app: &App, command: &str) {
    let result = match command {
        "help" => {
            println!("{}", "/clear          wipe the conversation".bright_black());
            println!("{}", "/whoami         show the current account".bright_black());
            println!("{}", "/notifications  list unseen notifications".bright_black());
            println!("{}", "/logout         log out and clear the transcript".bright_black());
            Ok(())
        }
        "clear" => match app.chat.clear().await {
            Ok(()) => {
                println!("{}", "Transcript cleared.".bright_green());
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        "whoami" => auth::whoami(app).await,
        "notifications" => notifications::list(app, false).await,
        "logout" => auth::logout(app).await,
        _ => {
            println!("{}", "Unknown command".bright_black());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {}", e).red());
    }
}

async fn send_and_reveal(app: &App, query: &str) {
    let transcript = match app.chat.send_message(query).await {
        Ok(transcript) => transcript,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            return;
        }
    };

    let Some(answer) = transcript
        .iter()
        .rev()
        .find(|m| m.sender == Sender::Assistant)
    else {
        return;
    };

    if let Err(e) = reveal_answer(app, answer).await {
        eprintln!("{}", format!("Error: {}", e).red());
    }
}

/// Prints the assistant message character by character, finishing instantly
/// on Ctrl-C. Marks the reveal complete exactly once either way.
async fn reveal_answer(app: &App, answer: &ChatMessage) -> Result<()> {
    let cancel = CancellationToken::new();
    let mut chunks = reveal::spawn(answer.text.clone(), cancel.clone());

    let mut stdout = std::io::stdout();
    let mut printed = 0usize;

    loop {
        tokio::select! {
            chunk = chunks.recv() => {
                let Some(c) = chunk else { break };
                print!("{}", c.to_string().bright_blue());
                stdout.flush()?;
                printed += 1;
            }
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                // Drain whatever was already in flight before the cancel.
                while let Some(c) = chunks.recv().await {
                    print!("{}", c.to_string().bright_blue());
                    printed += 1;
                }
                let remainder: String = answer.text.chars().skip(printed).collect();
                print!("{}", remainder.bright_blue());
                stdout.flush()?;
                break;
            }
        }
    }
    println!();

    app.chat.mark_reveal_complete(answer.id).await?;
    Ok(())
}
