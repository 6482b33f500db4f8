//! Voice announcer boundary.
//!
//! The orchestrator hands short text cues to an [`Announcer`] and never looks at
//! the outcome. Implementations own voice selection, cancellation of the previous
//! utterance, and their own error reporting.
//!
//! [`CommandAnnouncer`] runs a text-to-speech program (e.g. `espeak-ng`) from a
//! background thread. All communication is via a channel: cues in, nothing out.

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, warn};

/// Renders short spoken cues. Fire-and-forget.
pub trait Announcer: Send {
    /// Speaks `text`, interrupting whatever is currently being spoken.
    fn speak(&self, text: &str);

    /// Cuts off the current utterance, if any.
    fn silence(&self) {}
}

/// Writes cues to the log instead of speaking them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn speak(&self, text: &str) {
        if !text.trim().is_empty() {
            info!(cue = text, "announce");
        }
    }
}

/// Collects cues in memory. Clones share the same buffer, so a host (or a test)
/// can keep one handle and give the other to the orchestrator.
#[derive(Debug, Default, Clone)]
pub struct MemoryAnnouncer {
    cues: Arc<Mutex<Vec<String>>>,
}

impl MemoryAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every cue spoken so far, oldest first.
    pub fn cues(&self) -> Vec<String> {
        self.cues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent cue.
    pub fn last(&self) -> Option<String> {
        self.cues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Announcer for MemoryAnnouncer {
    fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.cues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_owned());
    }
}

/// Messages sent to the speech worker thread.
#[derive(Debug)]
enum Utterance {
    Say(String),
    Silence,
}

/// Speaks cues by spawning an external TTS program, one process per cue.
///
/// A new cue kills the previous process if it is still talking. A program that
/// cannot be spawned is logged and the cue dropped; the workout is never affected.
pub struct CommandAnnouncer {
    tx: Option<Sender<Utterance>>,
    worker: Option<JoinHandle<()>>,
}

impl CommandAnnouncer {
    /// Starts the speech worker. `args` are placed before the cue text, e.g.
    /// `["-v", "en"]` for `espeak-ng -v en "<cue>"`.
    pub fn spawn(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        let (tx, rx) = crossbeam_channel::unbounded();
        let worker = std::thread::Builder::new()
            .name("repargnou-voice".into())
            .spawn(move || voice_worker_loop(program, args, rx));

        match worker {
            Ok(handle) => Self { tx: Some(tx), worker: Some(handle) },
            Err(err) => {
                warn!(%err, "could not start the voice thread, cues will be dropped");
                Self { tx: None, worker: None }
            }
        }
    }

    fn send(&self, utterance: Utterance) {
        if let Some(tx) = &self.tx {
            if tx.send(utterance).is_err() {
                debug!("voice thread gone, cue dropped");
            }
        }
    }
}

impl Announcer for CommandAnnouncer {
    fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.send(Utterance::Say(text.to_owned()));
    }

    fn silence(&self) {
        self.send(Utterance::Silence);
    }
}

impl Drop for CommandAnnouncer {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Loops over incoming utterances until every sender is dropped.
fn voice_worker_loop(program: String, args: Vec<String>, rx: Receiver<Utterance>) {
    let mut current: Option<Child> = None;

    for utterance in rx {
        if let Some(child) = current.take() {
            interrupt(child);
        }
        match utterance {
            Utterance::Say(text) => {
                let spawned = Command::new(&program)
                    .args(&args)
                    .arg(&text)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn();
                match spawned {
                    Ok(child) => current = Some(child),
                    Err(err) => warn!(%err, program = %program, "speech command failed"),
                }
            }
            Utterance::Silence => {}
        }
    }

    if let Some(child) = current.take() {
        interrupt(child);
    }
}

/// Kills a still-running utterance and reaps the process.
fn interrupt(mut child: Child) {
    if let Ok(None) = child.try_wait() {
        let _ = child.kill();
    }
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_announcer_ignores_blank_cues() {
        let announcer = MemoryAnnouncer::new();
        let handle = announcer.clone();
        announcer.speak("Go!");
        announcer.speak("   ");
        announcer.speak("");
        assert_eq!(handle.cues(), vec!["Go!".to_owned()]);
        assert_eq!(handle.last().as_deref(), Some("Go!"));
    }

    #[test]
    fn missing_speech_program_is_swallowed() {
        let announcer =
            CommandAnnouncer::spawn("repargnou-no-such-tts-program", Vec::new());
        announcer.speak("Next set!");
        announcer.silence();
        drop(announcer);
    }
}
