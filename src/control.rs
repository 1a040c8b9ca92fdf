//! Remote control via Unix socket
//!
//! Accepts line commands over a Unix socket and forwards them to the main loop,
//! which applies them to the pad between frames.

use crate::error::{PadError, Result};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/pixelpad.sock";

/// Commands that can be sent over the socket
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Reset,
    /// Square cells of N pixels
    PixelSize(u32),
    /// Fixed columns and rows
    Grid(u32, u32),
    Brush(f32),
    Export,
    Quit,
}

impl Command {
    /// Parse one line of the socket protocol; unknown or malformed lines are `None`
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();
        let cmd = match (words.next()?, words.next(), words.next()) {
            ("reset" | "clear" | "r", None, None) => Command::Reset,
            ("export" | "e", None, None) => Command::Export,
            ("quit" | "exit" | "q", None, None) => Command::Quit,
            ("size", Some(n), None) => Command::PixelSize(n.parse().ok()?),
            ("grid", Some(cols), Some(rows)) => Command::Grid(cols.parse().ok()?, rows.parse().ok()?),
            ("brush", Some(n), None) => Command::Brush(n.parse().ok()?),
            _ => return None,
        };
        if words.next().is_some() {
            return None;
        }
        Some(cmd)
    }
}

/// Controller that listens for commands on a Unix socket
pub struct Controller {
    path: PathBuf,
    receiver: Receiver<Command>,
    _listener_thread: thread::JoinHandle<()>,
}

impl Controller {
    /// Bind the socket, replacing any stale socket file, and start listening
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let _ = std::fs::remove_file(&path);

        let listener = UnixListener::bind(&path)
            .map_err(|e| PadError::Control(format!("failed to bind {}: {}", path.display(), e)))?;

        // Non-blocking so the thread can notice a closed socket
        listener
            .set_nonblocking(true)
            .map_err(|e| PadError::Control(format!("failed to set non-blocking: {}", e)))?;

        let (sender, receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::listener_loop(listener, sender);
        });

        debug!(path = %path.display(), "control socket listening");
        Ok(Self {
            path,
            receiver,
            _listener_thread: handle,
        })
    }

    fn listener_loop(listener: UnixListener, sender: Sender<Command>) {
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    let sender = sender.clone();
                    thread::spawn(move || {
                        Self::handle_client(stream, sender);
                    });
                },
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(50));
                },
                Err(e) => {
                    warn!(error = %e, "control socket closed");
                    break;
                },
            }
        }
    }

    fn handle_client(stream: UnixStream, sender: Sender<Command>) {
        // Accepted streams inherit non-blocking mode on some platforms
        let _ = stream.set_nonblocking(false);
        let reader = BufReader::new(stream);
        for line in reader.lines().map_while(std::result::Result::ok) {
            match Command::parse(&line) {
                Some(cmd) => {
                    if sender.send(cmd).is_err() {
                        break;
                    }
                },
                None => debug!(line = %line.trim(), "ignoring unknown control command"),
            }
        }
    }

    /// Get any pending commands (non-blocking)
    pub fn poll(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        while let Ok(cmd) = self.receiver.try_recv() {
            commands.push(cmd);
        }
        commands
    }

    pub fn socket_path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        // Clean up the socket file
        let _ = std::fs::remove_file(&self.path);
    }
}
