//! Interactive chat application for farming advice.
//!
//! This binary provides a streaming REPL interface to an AgriAgent backend,
//! with conversation history persisted across runs.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! agriagent-chat
//!
//! # Point at another backend and city
//! agriagent-chat --api http://farm.example.com/api --city thies
//!
//! # Answer in Wolof
//! agriagent-chat --language wo
//!
//! # Disable colors (useful for piping output)
//! agriagent-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/new` - Start a new conversation
//! - `/history` - List saved conversations
//! - `/image <path>` - Diagnose a crop photo
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use agriagent::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatController, ChatRenderer, help_text, parse_command,
};
use agriagent::{AgriAgent, DiagnosisImage, FileSessionStore, Language, Message, Session};

/// Main entry point for the agriagent-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("agriagent-chat [OPTIONS]");
    let config = ChatConfig::from(args);

    let client = AgriAgent::with_options(config.api_url.clone(), config.timeout)?;
    let store = FileSessionStore::new(config.store_path.clone());
    let mut controller = ChatController::new(client.clone(), Box::new(store));
    controller.set_city(config.city.clone());
    controller.set_language(config.language);

    // Flag for interrupt handling during streaming
    let interrupted = Arc::new(AtomicBool::new(false));
    let mut renderer =
        ChatRenderer::with_color(config.use_color).with_interrupt(interrupted.clone());
    let mut rl = DefaultEditor::new()?;

    // Set up Ctrl+C handler
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!(
        "AgriAgent Chat (city: {}, language: {})",
        controller.city().unwrap_or("none"),
        controller.language()
    );
    println!("Type /help for commands, /quit to exit\n");

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("vous> ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::New => {
                            controller.new_session();
                            renderer.print_info("New conversation started.");
                        }
                        ChatCommand::History => {
                            let sessions = controller.sessions();
                            if sessions.is_empty() {
                                renderer.print_info(controller.language().no_history());
                            } else {
                                renderer.print_history(&sessions);
                            }
                        }
                        ChatCommand::Load(selector) => {
                            let loaded = resolve_session(&controller.sessions(), &selector)
                                .is_some_and(|id| controller.load_session(&id));
                            if loaded {
                                print_transcript(
                                    &mut renderer,
                                    controller.conversation().messages(),
                                );
                            } else {
                                renderer.print_error("No such conversation.");
                            }
                        }
                        ChatCommand::Delete(selector) => {
                            match resolve_session(&controller.sessions(), &selector) {
                                Some(id) => {
                                    controller.delete_session(&id);
                                    renderer.print_info("Conversation deleted.");
                                }
                                None => renderer.print_error("No such conversation."),
                            }
                        }
                        ChatCommand::Image(path) => match DiagnosisImage::from_path(&path) {
                            Ok(image) => {
                                println!("agriagent:");
                                controller.send_image(image, &mut renderer).await;
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::City(name) => {
                            controller.set_city(Some(name.clone()));
                            renderer.print_info(&format!("City set to {name}."));
                        }
                        ChatCommand::Lang(code) => match code.parse::<Language>() {
                            Ok(language) => {
                                controller.set_language(language);
                                renderer.print_info(&format!("Language set to {language}."));
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Weather(city) => {
                            let city = city.or_else(|| controller.city().map(String::from));
                            match city {
                                Some(city) => match client.weather(&city).await {
                                    Ok(report) => renderer.print_weather(&report),
                                    Err(err) => renderer.print_error(&err.to_string()),
                                },
                                None => renderer.print_error(
                                    "No city set. Use /city <name> or /weather <name>.",
                                ),
                            }
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - stream the reply
                println!("agriagent:");
                controller.send(line, &mut renderer).await;
                if interrupted.load(Ordering::Relaxed) {
                    renderer.print_interrupted();
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// Resolves a `/load` or `/delete` selector to a session id.
///
/// Accepts a 1-based number from the `/history` listing or a full id.
fn resolve_session(sessions: &[Session], selector: &str) -> Option<String> {
    if let Ok(index) = selector.parse::<usize>() {
        if index < 1 {
            return None;
        }
        return sessions.get(index - 1).map(|s| s.id.clone());
    }
    sessions
        .iter()
        .find(|s| s.id == selector)
        .map(|s| s.id.clone())
}

/// Replays a restored conversation to the console.
fn print_transcript(renderer: &mut ChatRenderer, messages: &[Message]) {
    for message in messages {
        let speaker = if message.is_user() { "vous" } else { "agriagent" };
        renderer.print_info(&format!("{speaker}: {}", message.content));
    }
}
