//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::console::ConsoleFormatter;
use assist_application::{
    StreamError, StreamOutcome, StreamSessionUseCase, TranscriptStore, TransportAdapter,
};
use assist_domain::ModelId;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Interactive chat REPL
///
/// Ctrl-C while a reply is streaming cancels that reply; at the prompt it
/// exits.
pub struct ChatRepl<T: TransportAdapter + 'static> {
    use_case: StreamSessionUseCase<T>,
    store: Arc<dyn TranscriptStore>,
    model: ModelId,
}

impl<T: TransportAdapter + 'static> ChatRepl<T> {
    pub fn new(use_case: StreamSessionUseCase<T>, store: Arc<dyn TranscriptStore>, model: ModelId) -> Self {
        Self {
            use_case,
            store,
            model,
        }
    }

    /// Send one message and wait for the reply, cancelling on Ctrl-C.
    pub async fn send(&self, message: &str) -> Result<StreamOutcome, StreamError> {
        let cancel = CancellationToken::new();
        let session = self
            .use_case
            .submit(message, self.model.clone(), cancel.clone())?;
        let run = session.run();
        tokio::pin!(run);

        let outcome = loop {
            tokio::select! {
                outcome = &mut run => break outcome,
                _ = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => {
                    debug!("Ctrl-C: cancelling reply");
                    cancel.cancel();
                }
            }
        };

        if let Some(trailer) = ConsoleFormatter::stream_trailer(&outcome) {
            println!("{trailer}");
        }
        Ok(outcome)
    }

    /// Run the interactive REPL on stdin
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.print_welcome();

        loop {
            print!("{} ", ">>>".cyan().bold());
            std::io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    println!("^C");
                    None
                }
            };
            let Some(line) = line else {
                println!("Bye!");
                break;
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(line) {
                    break;
                }
                continue;
            }

            if let Err(e) = self.send(line).await {
                println!("{} {}", "x".red(), e);
            }
        }
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "assist-stream chat".cyan().bold());
        println!("Model: {}", self.model);
        println!("Type /help for commands. Ctrl-C cancels a reply.");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        let (name, arg) = match cmd.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (cmd, ""),
        };
        match name {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?     - Show this help");
                println!("  /model [ID]       - Show or switch the model");
                println!("  /clear            - Forget the conversation");
                println!("  /quit, /exit, /q  - Exit chat");
                println!();
                false
            }
            "/model" if arg.is_empty() => {
                println!("Model: {}", self.model);
                false
            }
            "/model" => {
                match ModelId::new(arg) {
                    Ok(model) => {
                        println!("Model: {model}");
                        self.model = model;
                    }
                    Err(e) => println!("{} {}", "x".red(), e),
                }
                false
            }
            "/clear" => {
                self.store.replace(Vec::new());
                println!("Conversation cleared.");
                false
            }
            _ => {
                println!("Unknown command: {name}. Type /help for commands.");
                false
            }
        }
    }
}
