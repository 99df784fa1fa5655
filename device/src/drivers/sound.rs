//! Audio samples played through an external player process.

use crate::traits::sound::Sample;
use core::fmt;
use embassy_time::Duration;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration as StdDuration, Instant as StdInstant};
use xshell::Cmd;

pub const DEFAULT_PLAYER: &[&str] = &["ogg123", "-q"];
pub const DEFAULT_PROBE: &[&str] = &["soxi", "-D"];

const REAP_INTERVAL: StdDuration = StdDuration::from_millis(20);
const MAX_BUDGET: StdDuration = StdDuration::from_secs(24 * 60 * 60);

#[derive(Debug)]
pub enum SoundError {
    EmptyCommand,
    Probe(xshell::Error),
    /// The probe did not print a positive number of seconds.
    Length(String),
    Spawn(std::io::Error),
}

impl fmt::Display for SoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundError::EmptyCommand => write!(f, "empty player or probe command"),
            SoundError::Probe(e) => write!(f, "probing sample length: {}", e),
            SoundError::Length(out) => write!(f, "unusable sample length {:?}", out),
            SoundError::Spawn(e) => write!(f, "starting player: {}", e),
        }
    }
}

impl std::error::Error for SoundError {}

impl From<xshell::Error> for SoundError {
    fn from(error: xshell::Error) -> Self {
        SoundError::Probe(error)
    }
}

struct Playback {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// A sound file handed to a player command line, e.g. `ogg123 -q <path>`.
pub struct CommandSample {
    path: PathBuf,
    player: Vec<String>,
    length: Duration,
    playback: Option<Playback>,
}

impl CommandSample {
    pub fn new<S: AsRef<str>>(
        path: impl Into<PathBuf>,
        player: &[S],
        length: Duration,
    ) -> Result<Self, SoundError> {
        if player.is_empty() {
            return Err(SoundError::EmptyCommand);
        }
        Ok(Self {
            path: path.into(),
            player: player.iter().map(|s| s.as_ref().to_string()).collect(),
            length,
            playback: None,
        })
    }

    /// Load a sample, asking `probe` for its length in seconds.
    pub fn probe<S: AsRef<str>, T: AsRef<str>>(
        path: impl Into<PathBuf>,
        player: &[S],
        probe: &[T],
    ) -> Result<Self, SoundError> {
        let path = path.into();
        let length = probe_length(&path, probe)?;
        log::debug!("{} is {} ms long", path.display(), length.as_millis());
        Self::new(path, player, length)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .map(|p| !p.handle.is_finished())
            .unwrap_or(false)
    }
}

fn spawn_player(player: &[String], path: &Path) -> std::io::Result<Child> {
    Command::new(&player[0])
        .args(&player[1..])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

fn probe_length<T: AsRef<str>>(path: &Path, probe: &[T]) -> Result<Duration, SoundError> {
    let (program, args) = probe.split_first().ok_or(SoundError::EmptyCommand)?;
    let out = Cmd::new(program.as_ref())
        .args(args.iter().map(|a| a.as_ref()))
        .arg(path)
        .echo_cmd(false)
        .read()?;
    match out.trim().parse::<f64>() {
        Ok(secs) if secs > 0.0 && secs.is_finite() => {
            Ok(Duration::from_micros((secs * 1_000_000.0) as u64))
        }
        _ => Err(SoundError::Length(out)),
    }
}

/// Total playing time for one play plus `loops` repetitions, at most a day.
fn play_budget(length: Duration, loops: f64) -> StdDuration {
    let plays = 1.0 + loops;
    if plays.is_nan() || plays <= 0.0 {
        return StdDuration::ZERO;
    }
    let micros = length.as_micros() as f64 * plays;
    if micros >= MAX_BUDGET.as_micros() as f64 {
        MAX_BUDGET
    } else {
        StdDuration::from_micros(micros as u64)
    }
}

impl Sample for CommandSample {
    type Error = SoundError;

    fn play(&mut self, loops: f64) -> Result<(), Self::Error> {
        self.stop()?;

        let budget = play_budget(self.length, loops);
        let first = spawn_player(&self.player, &self.path).map_err(SoundError::Spawn)?;
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = stop.clone();
        let player = self.player.clone();
        let path = self.path.clone();

        let handle = thread::spawn(move || {
            let deadline = StdInstant::now() + budget;
            let mut child = first;
            loop {
                match reap(&mut child, deadline, &stopped) {
                    Exit::Finished if StdInstant::now() < deadline => {}
                    Exit::Failed(status) => {
                        log::warn!("Player for {} exited with {}", path.display(), status);
                        return;
                    }
                    _ => return,
                }
                // Clip ended inside the budget: go round again.
                match spawn_player(&player, &path) {
                    Ok(next) => child = next,
                    Err(e) => {
                        log::warn!("Restarting {} failed: {}", path.display(), e);
                        return;
                    }
                }
            }
        });

        self.playback.replace(Playback { stop, handle });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        if let Some(playback) = self.playback.take() {
            playback.stop.store(true, Ordering::Release);
            if playback.handle.join().is_err() {
                log::warn!("Player thread for {} panicked", self.path.display());
            }
        }
        Ok(())
    }

    fn length(&self) -> Duration {
        self.length
    }
}

impl Drop for CommandSample {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

enum Exit {
    /// The clip played to the end.
    Finished,
    Failed(ExitStatus),
    /// Playback was cut off.
    Killed,
}

/// Wait for the player to exit on its own, killing it once playback is
/// stopped or the deadline passes.
fn reap(child: &mut Child, deadline: StdInstant, stop: &AtomicBool) -> Exit {
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => return Exit::Finished,
            Ok(Some(status)) => return Exit::Failed(status),
            Ok(None) => {}
            Err(e) => {
                log::warn!("Checking player failed: {}", e);
                let _ = child.kill();
                return Exit::Killed;
            }
        }
        if stop.load(Ordering::Acquire) || StdInstant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Exit::Killed;
        }
        thread::sleep(REAP_INTERVAL);
    }
}
