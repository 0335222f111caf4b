//! Command-line parsing and execution

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use evolution_client::files::file_name;
use evolution_client::{
    ApiResponse, EvolutionClient, EvolutionError, InstanceSession, WebhookEvent, validate_number,
};
use nu_ansi_term::Color;
use serde_json::Value;

/// A parsed invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List every instance on the server
    Instances,
    /// Connection state of one instance
    State { name: String },
    /// Pick the open instance with this name
    Select { name: String },
    /// Send a text to one or more comma-separated recipients
    SendText { numbers: Vec<String>, text: String },
    /// Send a local file
    SendMedia {
        number: String,
        path: PathBuf,
        caption: String,
    },
    /// Print the webhook event catalog
    WebhookEvents,
    /// Normalize a phone number or group id
    Validate { number: String },
    Help,
    Version,
}

impl Command {
    /// Whether the command talks to the server
    pub fn needs_client(&self) -> bool {
        !matches!(
            self,
            Self::WebhookEvents | Self::Validate { .. } | Self::Help | Self::Version
        )
    }

    /// Whether the command runs against `EVOLUTION_INSTANCE`
    pub fn needs_instance(&self) -> bool {
        matches!(self, Self::SendText { .. } | Self::SendMedia { .. })
    }
}

/// Parse arguments, program name excluded
pub fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    let Some(command) = args.first() else {
        return Ok(Command::Help);
    };
    let rest = &args[1..];

    match command.as_str() {
        "--help" | "-h" | "help" => Ok(Command::Help),
        "--version" | "-v" => Ok(Command::Version),
        "instances" => Ok(Command::Instances),
        "webhook-events" => Ok(Command::WebhookEvents),
        "state" => Ok(Command::State {
            name: required(rest, 0, "state <name>")?,
        }),
        "select" => Ok(Command::Select {
            name: required(rest, 0, "select <name>")?,
        }),
        "validate" => Ok(Command::Validate {
            number: required(rest, 0, "validate <number>")?,
        }),
        "send-text" => {
            let numbers = required(rest, 0, "send-text <number> <text>")?;
            let text = required(rest, 1, "send-text <number> <text>")?;
            Ok(Command::SendText {
                numbers: numbers
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(String::from)
                    .collect(),
                text,
            })
        }
        "send-media" => Ok(Command::SendMedia {
            number: required(rest, 0, "send-media <number> <path> [caption]")?,
            path: PathBuf::from(required(rest, 1, "send-media <number> <path> [caption]")?),
            caption: rest.get(2).cloned().unwrap_or_default(),
        }),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn required(args: &[String], index: usize, usage: &str) -> Result<String, String> {
    args.get(index)
        .cloned()
        .ok_or_else(|| format!("Usage: evolution-cli {}", usage))
}

/// Run a command against the server. Returns `false` when it failed.
pub async fn run(
    command: Command,
    client: &EvolutionClient,
    instance: Option<&str>,
) -> anyhow::Result<bool> {
    let session = match (command.needs_instance(), instance) {
        (true, Some(name)) => Some(client.instance(name)),
        (true, None) => anyhow::bail!("EVOLUTION_INSTANCE not set"),
        (false, _) => None,
    };

    match command {
        Command::Instances => Ok(print_outcome(client.instances().fetch_instances().await)),
        Command::State { name } => Ok(print_outcome(
            client.instances().connection_state(&name).await,
        )),
        Command::Select { name } => select(client, &name).await,
        Command::SendText { numbers, text } => {
            let session = session.context("no instance session")?;
            send_text(client, &session, &numbers, &text).await
        }
        Command::SendMedia {
            number,
            path,
            caption,
        } => {
            let session = session.context("no instance session")?;
            let result = session
                .media()
                .send_media(&number, &path, &file_name(&path), &caption, Duration::ZERO)
                .await;
            Ok(match result {
                Ok(envelope) => print_envelope(&envelope),
                Err(e) => print_envelope(&e.into_envelope()),
            })
        }
        Command::WebhookEvents | Command::Validate { .. } | Command::Help | Command::Version => {
            Ok(run_offline(&command))
        }
    }
}

async fn select(client: &EvolutionClient, name: &str) -> anyhow::Result<bool> {
    match client.select_instance(name).await {
        Ok(Some(session)) => {
            let info = serde_json::to_value(session.info())?;
            print_json(&info);
            Ok(true)
        }
        Ok(None) => {
            eprintln!(
                "{}",
                Color::Yellow.paint(format!(
                    "Instância '{}' não encontrada ou desconectada.",
                    name
                ))
            );
            Ok(false)
        }
        Err(e) => Ok(print_outcome(Err(e))),
    }
}

/// Sends one after the other, pacing with the configured bulk delay
async fn send_text(
    client: &EvolutionClient,
    session: &InstanceSession,
    numbers: &[String],
    text: &str,
) -> anyhow::Result<bool> {
    let delay = client.send_delay();
    let messages = session.messages();
    let mut all_sent = true;

    for (index, number) in numbers.iter().enumerate() {
        let pause = if index + 1 < numbers.len() {
            delay.pause(index as u32)
        } else {
            Duration::ZERO
        };
        tracing::info!("Sending to {} ({}/{})", number, index + 1, numbers.len());
        all_sent &= print_outcome(messages.send_text(number, text, pause).await);
    }

    Ok(all_sent)
}

/// Commands answered without a server
pub fn run_offline(command: &Command) -> bool {
    match command {
        Command::WebhookEvents => {
            for event in WebhookEvent::ALL {
                println!("{:>2}  {}", event.code(), event);
            }
            true
        }
        Command::Validate { number } => match validate_number(number) {
            Some(normalized) => {
                println!("{}", normalized);
                true
            }
            None => {
                eprintln!(
                    "{}",
                    Color::Red.paint(EvolutionError::InvalidNumber(number.clone()).to_string())
                );
                false
            }
        },
        Command::Help => {
            print_help();
            true
        }
        Command::Version => {
            println!("evolution-cli {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => false,
    }
}

fn print_outcome(result: evolution_client::Result<Value>) -> bool {
    match result {
        Ok(value) => {
            print_json(&value);
            true
        }
        Err(e) => print_envelope(&e.into_envelope()),
    }
}

fn print_envelope(envelope: &ApiResponse) -> bool {
    let color = if envelope.success {
        Color::Green
    } else {
        Color::Red
    };
    eprintln!("{}", color.bold().paint(&envelope.message));
    match serde_json::to_value(envelope) {
        Ok(value) => print_json(&value),
        Err(e) => eprintln!("{}", e),
    }
    envelope.success
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", value),
    }
}

/// Print help message
pub fn print_help() {
    println!("evolution-cli - Evolution API command-line client");
    println!();
    println!("Usage:");
    println!("  evolution-cli instances                              List instances");
    println!("  evolution-cli state <name>                           Connection state");
    println!("  evolution-cli select <name>                          Select an open instance");
    println!("  evolution-cli send-text <number[,number...]> <text>  Send a text message");
    println!("  evolution-cli send-media <number> <path> [caption]   Send a file");
    println!("  evolution-cli webhook-events                         List webhook event codes");
    println!("  evolution-cli validate <number>                      Normalize a number");
    println!("  evolution-cli --help                                 Show this help message");
    println!("  evolution-cli --version                              Show version");
    println!();
    println!("Environment Variables:");
    println!("  EVOLUTION_API_URL       Server base URL (required)");
    println!("  EVOLUTION_API_KEY       Global API key (required)");
    println!("  EVOLUTION_INSTANCE      Instance used by send-text and send-media");
    println!("  EVOLUTION_TIMEOUT_SECS  Request timeout");
    println!("  EVOLUTION_DELAY_MIN     Bulk send delay lower bound (default: 5)");
    println!("  EVOLUTION_DELAY_MAX     Bulk send delay upper bound (default: 30)");
    println!("  EVOLUTION_DELAY_CONST   Rounds per delay step (default: 10)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_empty_is_help() {
        assert_eq!(parse(&[]).unwrap(), Command::Help);
        assert_eq!(parse(&["-h"]).unwrap(), Command::Help);
        assert_eq!(parse(&["--version"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_parse_instance_commands() {
        assert_eq!(parse(&["instances"]).unwrap(), Command::Instances);
        assert_eq!(
            parse(&["state", "bot1"]).unwrap(),
            Command::State {
                name: "bot1".to_string()
            }
        );
        assert_eq!(
            parse(&["select", "bot1"]).unwrap(),
            Command::Select {
                name: "bot1".to_string()
            }
        );
        assert!(parse(&["state"]).is_err());
    }

    #[test]
    fn test_parse_send_text_splits_recipients() {
        let command = parse(&["send-text", "11952735931, 12345@g.us,", "Olá"]).unwrap();
        assert_eq!(
            command,
            Command::SendText {
                numbers: vec!["11952735931".to_string(), "12345@g.us".to_string()],
                text: "Olá".to_string()
            }
        );
        assert!(command.needs_client());
        assert!(command.needs_instance());
        assert!(parse(&["send-text", "11952735931"]).is_err());
    }

    #[test]
    fn test_parse_send_media_caption_optional() {
        let command = parse(&["send-media", "11952735931", "foto.jpg"]).unwrap();
        assert_eq!(
            command,
            Command::SendMedia {
                number: "11952735931".to_string(),
                path: PathBuf::from("foto.jpg"),
                caption: String::new()
            }
        );

        let command = parse(&["send-media", "11952735931", "foto.jpg", "Legenda"]).unwrap();
        assert!(matches!(command, Command::SendMedia { caption, .. } if caption == "Legenda"));
    }

    #[test]
    fn test_parse_unknown() {
        let err = parse(&["bogus"]).unwrap_err();
        assert!(err.contains("bogus"));
    }

    #[test]
    fn test_offline_commands() {
        assert!(!Command::WebhookEvents.needs_client());
        assert!(run_offline(&Command::Validate {
            number: "11952735931".to_string()
        }));
        assert!(!run_offline(&Command::Validate {
            number: "123".to_string()
        }));
        assert!(!Command::Instances.needs_instance());
    }
}
