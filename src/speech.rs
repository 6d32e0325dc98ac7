//! Spoken feedback.
//!
//! Results are announced by an external text-to-speech program (`espeak-ng`,
//! `say`, ...). Speaking never blocks the caller: the program is spawned and
//! left to finish on its own. Captures are acknowledged with the terminal
//! bell whether or not a speech program is configured.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

/// Fire-and-forget audio feedback.
pub trait SpeechNotifier: Send + Sync {
    /// Speak `text` aloud.
    fn speak(&self, text: &str);

    /// Play the short notification sound that acknowledges a scan.
    fn chime(&self);
}

/// Where the scan chime is written. The terminal turns BEL into a beep.
pub type Bell = Arc<Mutex<dyn Write + Send>>;

/// Bell on the process's standard output.
#[must_use]
pub fn stdout_bell() -> Bell {
    Arc::new(Mutex::new(io::stdout()))
}

fn ring(bell: &Bell) {
    match bell.lock() {
        Ok(mut out) => {
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
        Err(_) => log::warn!("Bell output poisoned, chime skipped"),
    }
}

/// Speaks by spawning a command with the text as its final argument.
#[derive(Clone)]
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
    bell: Bell,
}

impl CommandSpeech {
    /// Build from a command line split into words, e.g. `["espeak-ng", "-v", "zh"]`.
    ///
    /// Returns `None` for an empty command.
    #[must_use]
    pub fn from_command(command: &[String], bell: Bell) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            bell,
        })
    }

    /// The command that would run for `text`.
    #[must_use]
    pub fn command_for(&self, text: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

impl SpeechNotifier for CommandSpeech {
    fn speak(&self, text: &str) {
        log::info!("Speaking: {}", text);
        match self.command_for(text).spawn() {
            Ok(mut child) => {
                log::trace!("Speech process {} started", child.id());
                // Reap in the background so finished speech does not linger as a zombie.
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(e) => log::warn!("Failed to start speech command {}: {}", self.program, e),
        }
    }

    fn chime(&self) {
        ring(&self.bell);
    }
}

/// Logs what would have been spoken and still rings the bell.
/// Used when no speech command is configured.
#[derive(Clone)]
pub struct TextOnlySpeech {
    bell: Bell,
}

impl TextOnlySpeech {
    #[must_use]
    pub fn new(bell: Bell) -> Self {
        Self { bell }
    }
}

impl SpeechNotifier for TextOnlySpeech {
    fn speak(&self, text: &str) {
        log::info!("No speech command configured, would say: {}", text);
    }

    fn chime(&self) {
        ring(&self.bell);
    }
}

/// No sound at all (`--silent`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeech;

impl SpeechNotifier for SilentSpeech {
    fn speak(&self, text: &str) {
        log::info!("Muted, not saying: {}", text);
    }

    fn chime(&self) {}
}

/// Pick the notifier for a configured speech command. The chime rings on `bell` either way.
#[must_use]
pub fn from_config(command: &[String], bell: Bell) -> Box<dyn SpeechNotifier> {
    match CommandSpeech::from_command(command, bell.clone()) {
        Some(speech) => Box::new(speech),
        None => Box::new(TextOnlySpeech::new(bell)),
    }
}
