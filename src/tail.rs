//! Log tailing - streams newly appended log content to the console

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tokio::time;
use tracing::debug;

/// Idle sleep between polls when neither log produced a line.
pub const POLL_INTERVAL: Duration = Duration::from_millis(300);

/// A log file opened at end-of-file, read one line at a time.
pub struct LogTail {
    reader: BufReader<File>,
    tag: String,
}

impl LogTail {
    /// Open `path` for tailing, seeking to the end so pre-existing
    /// content is never replayed.
    pub fn open_end(path: &Path, tag: &str) -> Result<Self> {
        let mut file = File::open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        file.seek(SeekFrom::End(0))?;

        Ok(Self {
            reader: BufReader::new(file),
            tag: tag.to_string(),
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Read one newly appended line, or `None` if nothing is available.
    ///
    /// The line is returned verbatim: a trailing newline is preserved,
    /// and a partially written line (no newline yet) is passed through
    /// as-is, with the remainder showing up on a later poll. Child output
    /// is never inspected: bytes that are not valid UTF-8 are printed
    /// lossily, and read errors are swallowed so a misbehaving log can
    /// never abort the supervisor.
    pub fn next_chunk(&mut self) -> Option<String> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => Some(String::from_utf8_lossy(&buf).into_owned()),
            Err(err) => {
                debug!("read error on {} log: {err}", self.tag);
                None
            }
        }
    }
}

/// Poll the tails and print new lines until SIGINT or SIGTERM arrives.
///
/// Each iteration reads at most one line per tail, printed with a
/// `[name] ` prefix. When no tail produced a line the loop sleeps for
/// [`POLL_INTERVAL`]; a signal preempts the sleep, so shutdown is not
/// delayed by an idle poll.
pub async fn tail_loop(tails: &mut [LogTail]) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    loop {
        let mut idle = true;
        for tail in tails.iter_mut() {
            if let Some(line) = tail.next_chunk() {
                print!("[{}] {}", tail.tag(), line);
                idle = false;
            }
        }
        if !idle {
            let _ = std::io::stdout().flush();
        }

        let pause = if idle { POLL_INTERVAL } else { Duration::ZERO };
        tokio::select! {
            _ = sigint.recv() => break,
            _ = sigterm.recv() => break,
            _ = time::sleep(pause) => {}
        }
    }

    Ok(())
}
