//! Speech input and output.
//!
//! Recognition and synthesis are external services; this module holds the
//! microphone state machine and the adapters the client talks to.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, Lines};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::VoiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Listening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicAction {
    Start,
    Stop,
}

/// idle -> listening -> (recognized | stopped) -> idle
#[derive(Debug, Default)]
pub struct VoiceCapture {
    state: CaptureState,
}

impl VoiceCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Mic button pressed.
    pub fn toggle(&mut self) -> MicAction {
        match self.state {
            CaptureState::Idle => {
                self.state = CaptureState::Listening;
                MicAction::Start
            }
            CaptureState::Listening => {
                self.state = CaptureState::Idle;
                MicAction::Stop
            }
        }
    }

    /// Recognition ended, with or without a result.
    pub fn finish(&mut self) {
        self.state = CaptureState::Idle;
    }
}

#[async_trait]
pub trait Recognizer: Send {
    /// Listen for one utterance. `Ok(None)` when nothing was recognized.
    async fn listen(&mut self) -> Result<Option<String>, VoiceError>;

    fn stop(&mut self) {}
}

pub trait Speaker: Send {
    /// Speak `text`, cancelling anything still being spoken.
    fn speak(&mut self, text: &str);
}

/// Placeholder in command arguments replaced by the speech language.
const LANG_PLACEHOLDER: &str = "{lang}";

fn build_command(program: &[String], lang: &str) -> Option<Command> {
    let (bin, args) = program.split_first()?;
    let mut cmd = Command::new(bin);
    cmd.args(args.iter().map(|a| a.replace(LANG_PLACEHOLDER, lang)));
    Some(cmd)
}

/// Prints what would be spoken.
#[derive(Debug, Default)]
pub struct ConsoleSpeaker;

impl Speaker for ConsoleSpeaker {
    fn speak(&mut self, text: &str) {
        println!("🔊 {text}");
    }
}

/// Hands text to an external TTS program, e.g. `espeak -v {lang}`.
#[derive(Debug)]
pub struct CommandSpeaker {
    program: Vec<String>,
    lang: String,
    current: Option<Child>,
}

impl CommandSpeaker {
    pub fn new(program: Vec<String>, lang: impl Into<String>) -> Self {
        Self { program, lang: lang.into(), current: None }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) {
        if let Some(mut previous) = self.current.take() {
            if let Err(e) = previous.start_kill() {
                debug!(error = %e, "previous utterance already finished");
            }
        }

        let Some(mut cmd) = build_command(&self.program, &self.lang) else {
            return;
        };
        match cmd.arg(text).stdout(Stdio::null()).stderr(Stdio::null()).spawn() {
            Ok(child) => self.current = Some(child),
            Err(e) => warn!(program = %self.program[0], error = %e, "failed to start speech synthesis"),
        }
    }
}

/// Runs an external STT program and takes its stdout as the transcript.
#[derive(Debug)]
pub struct CommandRecognizer {
    program: Vec<String>,
    lang: String,
}

impl CommandRecognizer {
    pub fn new(program: Vec<String>, lang: impl Into<String>) -> Self {
        Self { program, lang: lang.into() }
    }
}

#[async_trait]
impl Recognizer for CommandRecognizer {
    async fn listen(&mut self) -> Result<Option<String>, VoiceError> {
        let Some(mut cmd) = build_command(&self.program, &self.lang) else {
            return Ok(None);
        };
        let output = cmd.stdin(Stdio::null()).kill_on_drop(true).output().await?;
        if !output.status.success() {
            return Err(VoiceError::ExitStatus(output.status.code().unwrap_or(-1)));
        }
        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!transcript.is_empty()).then_some(transcript))
    }
}

/// Takes one typed line as the dictated utterance.
pub struct LineRecognizer<'a, R> {
    lines: &'a mut Lines<R>,
}

impl<'a, R> LineRecognizer<'a, R> {
    pub fn new(lines: &'a mut Lines<R>) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl<'a, R> Recognizer for LineRecognizer<'a, R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn listen(&mut self) -> Result<Option<String>, VoiceError> {
        println!("🎤 Listening… (dictate one line, empty line stops)");
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};

    #[test]
    fn mic_toggles() {
        let mut capture = VoiceCapture::new();
        assert_eq!(capture.state(), CaptureState::Idle);
        assert_eq!(capture.toggle(), MicAction::Start);
        assert_eq!(capture.state(), CaptureState::Listening);
        assert_eq!(capture.toggle(), MicAction::Stop);
        assert_eq!(capture.state(), CaptureState::Idle);

        capture.toggle();
        capture.finish();
        assert_eq!(capture.state(), CaptureState::Idle);
    }

    #[test]
    fn lang_placeholder() {
        let program = vec!["espeak".to_string(), "-v".to_string(), "{lang}".to_string()];
        let cmd = build_command(&program, "en-US").unwrap();
        let args: Vec<_> = cmd.as_std().get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["-v", "en-US"]);
        assert!(build_command(&[], "en-US").is_none());
    }

    #[tokio::test]
    async fn line_recognizer() {
        let input: &[u8] = b"  what is osmosis \n\n";
        let mut lines = BufReader::new(input).lines();
        let mut rec = LineRecognizer::new(&mut lines);
        assert_eq!(rec.listen().await.unwrap().as_deref(), Some("what is osmosis"));
        assert_eq!(rec.listen().await.unwrap(), None);
        assert_eq!(rec.listen().await.unwrap(), None);
    }
}
