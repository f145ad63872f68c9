//! Node.js syntax check

use super::{ScriptCheck, ScriptValidator};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Syntax-checks scripts by running them through `node`
#[derive(Debug, Clone)]
pub struct NodeValidator {
    name: String,
    program: PathBuf,
    timeout: Duration,
}

impl NodeValidator {
    /// Use `program` with a per-invocation `timeout`
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        let program = program.into();
        let name = program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "node".to_string());
        Self {
            name,
            program,
            timeout,
        }
    }

    /// Find `engine` on `PATH`
    pub fn detect(engine: &str, timeout: Duration) -> Option<Self> {
        which::which(engine)
            .ok()
            .map(|path| Self::new(path, timeout).named(engine))
    }

    fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Run the engine; `Ok(None)` means it was killed after the timeout
    ///
    /// Both pipes are drained on their own threads while the child runs, so
    /// an engine writing more than a pipe buffer of diagnostics cannot stall.
    fn run(&self, args: &[&str]) -> io::Result<Option<Output>> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(Output {
                    status,
                    stdout: collect(stdout),
                    stderr: collect(stderr),
                }));
            }
            if start.elapsed() > self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                // Readers may still be blocked on a grandchild holding the pipe
                return Ok(None);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Read `pipe` to the end on a helper thread
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn collect(reader: JoinHandle<Vec<u8>>) -> Vec<u8> {
    reader.join().unwrap_or_default()
}

impl ScriptValidator for NodeValidator {
    fn engine(&self) -> String {
        self.name.clone()
    }

    fn check(&self, source: &str) -> ScriptCheck {
        match self.run(&["--check", "-e", source]) {
            Ok(Some(output)) if output.status.success() => return ScriptCheck::Accepted,
            // node refuses --check together with -e; parse via the Function constructor
            Ok(Some(output)) => debug!(
                status = ?output.status,
                "--check unsupported for inline source, falling back"
            ),
            Ok(None) => return ScriptCheck::TimedOut(self.timeout),
            Err(e) => return ScriptCheck::Unavailable(e.to_string()),
        }

        let wrapped = format!("new Function({})", js_string_literal(source));
        match self.run(&["-e", &wrapped]) {
            Ok(Some(output)) if output.status.success() => ScriptCheck::Accepted,
            Ok(Some(output)) => {
                ScriptCheck::Rejected(String::from_utf8_lossy(&output.stderr).trim().to_string())
            }
            Ok(None) => ScriptCheck::TimedOut(self.timeout),
            Err(e) => ScriptCheck::Unavailable(e.to_string()),
        }
    }
}

/// Quote `source` as a JavaScript string literal
fn js_string_literal(source: &str) -> String {
    // A JSON string is a valid JS string literal
    serde_json::Value::String(source.to_string()).to_string()
}
