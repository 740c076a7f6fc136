use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use edumate_client::routes::feature::Prompter;
use edumate_client::services::diagram::TerminalDiagramRenderer;
use edumate_client::services::voice::{CommandRecognizer, CommandSpeaker, ConsoleSpeaker, LineRecognizer};
use edumate_client::{ChatClient, Config, HttpBackend, Intent, TerminalView, Turn};

const HELP: &str = "\
Commands:
  <text>                 ask EduMate a question
  /quiz [topic]          generate a quiz
  /summary [topic]       summarize a chapter
  /countdown             days left until exams
  /plan [subject, days]  build a study plan
  /mindmap [topic]       draw a mind map
  /mic                   dictate a question and hear the answer
  /session               show the session id
  /quit                  leave";

#[derive(Parser)]
#[command(name = "edumate", about = "Terminal client for the EduMate study assistant")]
struct Cli {
    /// Backend base URL (overrides EDUMATE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Disable speech input and output
    #[arg(long)]
    no_voice: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Say(String),
    Feature(Intent, Option<String>),
    Mic,
    Session,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Command {
        let line = line.trim();
        let Some(cmd) = line.strip_prefix('/') else {
            return Command::Say(line.to_string());
        };
        let (name, rest) = cmd.split_once(char::is_whitespace).unwrap_or((cmd, ""));
        let rest = rest.trim();

        match name.to_lowercase().as_str() {
            "quit" | "exit" => Command::Quit,
            "help" => Command::Help,
            "session" => Command::Session,
            "mic" | "voice" => Command::Mic,
            other => match Intent::parse(other) {
                Some(Intent::Ask) => Command::Say(rest.to_string()),
                Some(intent) => {
                    Command::Feature(intent, (!rest.is_empty()).then(|| rest.to_string()))
                }
                None => Command::Unknown(other.to_string()),
            },
        }
    }
}

/// Answers prompts from inline command arguments, falling back to stdin.
struct ConsolePrompter<'a> {
    lines: &'a mut Lines<BufReader<Stdin>>,
    preset: Option<String>,
}

#[async_trait]
impl Prompter for ConsolePrompter<'_> {
    async fn prompt(&mut self, question: &str) -> Option<String> {
        if let Some(answer) = self.preset.take() {
            return Some(answer);
        }
        println!("{question}");
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to read prompt answer");
                None
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("edumate_client=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if cli.no_voice {
        config.voice_enabled = false;
    }

    let backend = HttpBackend::new(&config).context("Failed to build HTTP client")?;
    let mut client = ChatClient::new(backend, TerminalView::default())
        .with_diagram_renderer(TerminalDiagramRenderer);
    if config.voice_enabled {
        client = match &config.tts_command {
            Some(cmd) => client.with_speaker(CommandSpeaker::new(cmd.clone(), &config.speech_lang)),
            None => client.with_speaker(ConsoleSpeaker),
        };
    }

    info!(api_url = %config.api_url, "EduMate client ready");
    println!("📚 EduMate is ready. Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match Command::parse(&line) {
            Command::Say(text) => {
                client.send_message(&text).await;
            }
            Command::Feature(intent, preset) => {
                let mut prompter = ConsolePrompter { lines: &mut lines, preset };
                if let Err(e) = client.request_feature(intent, &mut prompter).await {
                    warn!(error = %e, "feature request rejected");
                }
            }
            Command::Mic if !config.voice_enabled => println!("Voice is disabled."),
            Command::Mic => {
                let turn = match &config.stt_command {
                    Some(cmd) => {
                        let mut recognizer = CommandRecognizer::new(cmd.clone(), &config.speech_lang);
                        client.capture_voice(&mut recognizer).await
                    }
                    None => {
                        let mut recognizer = LineRecognizer::new(&mut lines);
                        client.capture_voice(&mut recognizer).await
                    }
                };
                if turn == Turn::Stopped {
                    println!("🎤 Stopped listening.");
                }
            }
            Command::Session => println!("Your Session ID: {}", client.session_id()),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(name) => println!("Unknown command /{name}. Type /help."),
        }
    }

    info!(session_id = %client.session_id(), "chat session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("what is pH?"), Command::Say("what is pH?".into()));
        assert_eq!(Command::parse("/quiz"), Command::Feature(Intent::Quiz, None));
        assert_eq!(
            Command::parse("/plan Science, 3"),
            Command::Feature(Intent::StudyPlan, Some("Science, 3".into()))
        );
        assert_eq!(Command::parse("/ask why"), Command::Say("why".into()));
        assert_eq!(Command::parse(" /QUIT "), Command::Quit);
        assert_eq!(Command::parse("/mic"), Command::Mic);
        assert_eq!(Command::parse("/dance"), Command::Unknown("dance".into()));
    }
}
