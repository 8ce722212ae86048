use std::env;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// One-shot sink for phase announcements. Implementations must be
/// fire-and-forget; the timer never waits on speech.
pub trait Announcer {
    fn speak(&mut self, text: &str);
}

/// Swallows everything. Used when no TTS program is available and by
/// headless tests that don't inspect announcements.
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn speak(&mut self, _text: &str) {}
}

/// Records announcements for inspection in tests.
#[derive(Default)]
pub struct RecordingAnnouncer {
    pub spoken: Vec<String>,
}

impl Announcer for RecordingAnnouncer {
    fn speak(&mut self, text: &str) {
        self.spoken.push(text.to_string());
    }
}

/// Speaks by spawning an external text-to-speech program. A new
/// utterance kills any still-running previous one, so announcements
/// supersede rather than queue.
pub struct CommandAnnouncer {
    program: String,
    child: Option<Child>,
}

const TTS_CANDIDATES: [&str; 3] = ["espeak", "spd-say", "say"];

impl CommandAnnouncer {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            child: None,
        }
    }

    /// Pick the first known TTS program found on PATH.
    pub fn detect() -> Option<Self> {
        TTS_CANDIDATES
            .iter()
            .find(|p| find_on_path(p).is_some())
            .map(|p| Self::new(*p))
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Announcer for CommandAnnouncer {
    fn speak(&mut self, text: &str) {
        self.cancel();
        self.child = Command::new(&self.program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .ok();
    }
}

impl Drop for CommandAnnouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn find_on_path(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
