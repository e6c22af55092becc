//! Running the build tool as a child process
//!
//! Output is always captured. With `stream` set each line is also echoed to
//! our own stdout/stderr as it arrives.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{self, Result};

/// How often a child with a deadline is polled
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Lines of output kept for a failure report
const FAILURE_TAIL_LINES: usize = 200;

/// A fully described invocation of an external program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    pub envs: Vec<(String, String)>,
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured output of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Both streams, stdout first
    pub fn combined(&self) -> String {
        let mut all = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        all.push_str(&self.stdout);
        if !all.is_empty() && !all.ends_with('\n') && !self.stderr.is_empty() {
            all.push('\n');
        }
        all.push_str(&self.stderr);
        all
    }

    /// The last lines of [`Captured::combined`], as attached to failures
    pub fn tail(&self) -> String {
        let combined = self.combined();
        let lines: Vec<&str> = combined.lines().collect();
        let start = lines.len().saturating_sub(FAILURE_TAIL_LINES);
        lines[start..].join("\n")
    }
}

#[derive(Clone, Copy)]
enum Echo {
    Stdout,
    Stderr,
}

/// A reader thread and the text it has captured so far
struct Drain {
    buffer: Arc<Mutex<String>>,
    handle: JoinHandle<()>,
}

impl Drain {
    /// Output captured up to now, without waiting for the stream to close
    fn snapshot(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Wait for the stream to close and take everything it produced
    fn finish(self) -> String {
        let _ = self.handle.join();
        std::mem::take(&mut *self.buffer.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

fn drain<R: Read + Send + 'static>(reader: R, echo: Option<Echo>) -> Drain {
    let buffer = Arc::new(Mutex::new(String::new()));
    let captured = Arc::clone(&buffer);
    let handle = thread::spawn(move || {
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    match echo {
                        Some(Echo::Stdout) => {
                            let _ = io::stdout().lock().write_all(&line);
                        }
                        Some(Echo::Stderr) => {
                            let _ = io::stderr().lock().write_all(&line);
                        }
                        None => {}
                    }
                    captured
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push_str(&String::from_utf8_lossy(&line));
                }
            }
        }
    });
    Drain { buffer, handle }
}

/// Run `command` to completion.
///
/// A non-zero exit is a `BuildFailed` error carrying the tail of the output;
/// exceeding `timeout` kills the child and yields `BuildTimedOut` with the
/// output captured until then.
pub fn run(command: &ToolCommand, stream: bool, timeout: Option<Duration>) -> Result<Captured> {
    tracing::debug!(command = %command, dir = %command.dir.display(), "spawning");

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .current_dir(&command.dir)
        .envs(command.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| error::build::spawn_failed(&command.program, e.to_string()))?;

    let stdout = child
        .stdout
        .take()
        .map(|out| drain(out, stream.then_some(Echo::Stdout)));
    let stderr = child
        .stderr
        .take()
        .map(|err| drain(err, stream.then_some(Echo::Stderr)));

    let status = match timeout {
        Some(limit) => wait_with_deadline(&mut child, command, limit)?,
        None => Some(
            child
                .wait()
                .map_err(|e| error::build::spawn_failed(&command.program, e.to_string()))?,
        ),
    };

    let Some(status) = status else {
        // Reader threads are left detached; grandchildren may still hold the pipes.
        let partial = Captured {
            stdout: stdout.as_ref().map(Drain::snapshot).unwrap_or_default(),
            stderr: stderr.as_ref().map(Drain::snapshot).unwrap_or_default(),
        };
        return Err(error::build::timed_out(
            command.to_string(),
            timeout.map_or(0, |limit| limit.as_secs()),
            partial.tail(),
        ));
    };

    let captured = Captured {
        stdout: stdout.map(Drain::finish).unwrap_or_default(),
        stderr: stderr.map(Drain::finish).unwrap_or_default(),
    };

    if status.success() {
        tracing::debug!(command = %command, "finished");
        Ok(captured)
    } else {
        Err(error::build::failed(
            command.to_string(),
            status.to_string(),
            captured.tail(),
        ))
    }
}

/// Wait for `child` until `limit` has passed; `None` means it was killed.
fn wait_with_deadline(
    child: &mut Child,
    command: &ToolCommand,
    limit: Duration,
) -> Result<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) if started.elapsed() >= limit => {
                tracing::warn!(command = %command, seconds = limit.as_secs(), "killing build tool");
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(error::build::spawn_failed(&command.program, e.to_string())),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::BuilderError;

    fn sh(script: &str) -> ToolCommand {
        ToolCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            dir: std::env::temp_dir(),
            envs: Vec::new(),
        }
    }

    #[test]
    fn test_captures_both_streams() {
        let captured = run(&sh("echo out; echo err >&2"), false, None).unwrap();
        assert_eq!(captured.stdout, "out\n");
        assert_eq!(captured.stderr, "err\n");
        assert_eq!(captured.combined(), "out\nerr\n");
    }

    #[test]
    fn test_streaming_still_captures() {
        let captured = run(&sh("echo streamed"), true, None).unwrap();
        assert_eq!(captured.stdout, "streamed\n");
    }

    #[test]
    fn test_environment_and_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut command = sh("printf '%s' \"$GOFLAGS\" > flags.txt");
        command.dir = temp.path().to_path_buf();
        command.envs = vec![("GOFLAGS".to_string(), "-trimpath".to_string())];

        run(&command, false, None).unwrap();
        assert_eq!(
            std::fs::read_to_string(temp.path().join("flags.txt")).unwrap(),
            "-trimpath"
        );
    }

    #[test]
    fn test_non_zero_exit() {
        let err = run(&sh("echo compiling; echo boom >&2; exit 3"), false, None).unwrap_err();
        match err {
            BuilderError::BuildFailed { output, status, .. } => {
                assert!(output.contains("compiling"));
                assert!(output.contains("boom"));
                assert!(status.contains('3'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_program() {
        let command = ToolCommand {
            program: "definitely-not-a-real-go-binary".to_string(),
            args: Vec::new(),
            dir: std::env::temp_dir(),
            envs: Vec::new(),
        };
        let err = run(&command, false, None).unwrap_err();
        assert!(matches!(err, BuilderError::BuildSpawnFailed { .. }));
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let err = run(&sh("exec sleep 10"), false, Some(Duration::from_millis(200))).unwrap_err();
        assert!(matches!(err, BuilderError::BuildTimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_keeps_output_so_far() {
        let err = run(
            &sh("echo fetching modules; echo still waiting >&2; exec sleep 10"),
            false,
            Some(Duration::from_millis(500)),
        )
        .unwrap_err();
        let BuilderError::BuildTimedOut { output, .. } = err else {
            panic!("expected BuildTimedOut");
        };
        assert!(output.contains("fetching modules"), "{output}");
        assert!(output.contains("still waiting"), "{output}");
    }

    #[test]
    fn test_finishes_within_deadline() {
        let captured = run(&sh("echo quick"), false, Some(Duration::from_secs(10))).unwrap();
        assert_eq!(captured.stdout, "quick\n");
    }

    #[test]
    fn test_failure_output_is_truncated() {
        let err = run(&sh("seq 1 500; exit 1"), false, None).unwrap_err();
        let BuilderError::BuildFailed { output, .. } = err else {
            panic!("expected BuildFailed");
        };
        assert_eq!(output.lines().count(), FAILURE_TAIL_LINES);
        assert!(output.ends_with("500"));
    }

    #[test]
    fn test_display() {
        let command = ToolCommand {
            program: "go".to_string(),
            args: vec!["run".to_string(), "build/ci.go".to_string(), "install".to_string()],
            dir: PathBuf::from("."),
            envs: Vec::new(),
        };
        assert_eq!(command.to_string(), "go run build/ci.go install");
    }
}
