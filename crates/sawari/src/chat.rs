// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive booking conversation over the full adapter stack.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use sawari_config::SawariConfig;
use sawari_core::{CustomerIdentity, InboundMessage, SawariError};

use crate::build_stack;

/// Runs a REPL conversation as a single local user.
pub async fn run(config: &SawariConfig) -> Result<(), SawariError> {
    let agent = build_stack(config).await?;

    println!(
        "{} Booking assistant ready. Type your trip request, or 'reset' to start over (Ctrl-D to quit).",
        "sawari:".cyan().bold()
    );

    let mut editor = DefaultEditor::new().map_err(|e| SawariError::Internal(e.to_string()))?;
    let user_id = whoami();
    info!(user_id = user_id.as_str(), "chat session started");

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let text = line.trim();
                if text.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(text);

                let inbound = InboundMessage {
                    user_id: user_id.clone(),
                    text: text.to_string(),
                    identity: CustomerIdentity {
                        id: user_id.clone(),
                        name: user_id.clone(),
                        phone: String::new(),
                        profile_image: String::new(),
                    },
                    source_channel: "app".into(),
                    pickup_hint: None,
                    drop_hint: None,
                };

                match agent.handle_message(inbound).await {
                    Ok(reply) => {
                        println!("{} {}", "sawari:".cyan().bold(), reply.reply_text);
                        if reply.trip_created {
                            println!("{}", "  [trip created]".green());
                        }
                        if reply.trip_cancelled {
                            println!("{}", "  [trip cancelled]".yellow());
                        }
                    }
                    Err(e) => eprintln!("{} {e}", "error:".red().bold()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(SawariError::Internal(e.to_string())),
        }
    }

    println!("bye");
    Ok(())
}

/// Local user id for the REPL session.
fn whoami() -> String {
    std::env::var("USER").unwrap_or_else(|_| "local".to_string())
}
