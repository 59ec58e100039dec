// ABOUTME: Child process helpers for the container, kubectl and helm CLIs.
// ABOUTME: Streams stdout and stderr line by line into the output sink.

use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::output::Output;

/// Render a command for logs and error messages.
pub(crate) fn describe(command: &Command) -> String {
    let std = command.as_std();
    std::iter::once(std.get_program())
        .chain(std.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `command` to completion, relaying its output and optionally feeding `stdin`.
pub(crate) async fn stream(
    mut command: Command,
    stdin: Option<Vec<u8>>,
    output: &mut Output,
) -> io::Result<ExitStatus> {
    command
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!("Running {}", describe(&command));
    let mut child = command.spawn()?;

    // Feed stdin from its own task so a chatty child cannot deadlock on a full pipe
    let writer = match (stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => Some(tokio::spawn(async move {
            pipe.write_all(&input).await?;
            pipe.shutdown().await
        })),
        _ => None,
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("child stderr was not captured"))?;
    let mut stdout = BufReader::new(stdout);
    let mut stderr = BufReader::new(stderr);
    let (mut stdout_line, mut stderr_line) = (Vec::new(), Vec::new());
    let (mut stdout_open, mut stderr_open) = (true, true);

    // Partial reads stay in the line buffers when the other branch wins
    while stdout_open || stderr_open {
        tokio::select! {
            read = stdout.read_until(b'\n', &mut stdout_line), if stdout_open => match read? {
                0 => stdout_open = false,
                _ => relay(&mut stdout_line, output),
            },
            read = stderr.read_until(b'\n', &mut stderr_line), if stderr_open => match read? {
                0 => stderr_open = false,
                _ => relay(&mut stderr_line, output),
            },
        }
    }

    if let Some(writer) = writer {
        match writer.await {
            // The child may exit before reading everything; its status says why
            Ok(Err(e)) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
            Ok(_) => {}
            Err(e) => return Err(io::Error::other(e)),
        }
    }

    child.wait().await
}

/// Child output is not guaranteed to be UTF-8; invalid bytes are replaced.
fn relay(line: &mut Vec<u8>, output: &mut Output) {
    output.line(String::from_utf8_lossy(line).trim_end_matches(['\r', '\n']));
    line.clear();
}

/// Run `command` and capture its stdout.
pub(crate) async fn capture(mut command: Command) -> io::Result<(ExitStatus, String)> {
    command.stdin(Stdio::null()).kill_on_drop(true);
    tracing::debug!("Running {}", describe(&command));
    let out = command.output().await?;
    Ok((out.status, String::from_utf8_lossy(&out.stdout).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputMode;
    use std::sync::{Arc, Mutex};

    #[test]
    fn describe_joins_program_and_args() {
        let mut command = Command::new("docker");
        command.args(["tag", "app", "app:v1"]);
        assert_eq!(describe(&command), "docker tag app app:v1");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stream_feeds_stdin_and_reports_status() {
        let mut command = Command::new("sh");
        command.args(["-c", "cat >/dev/null; exit 3"]);

        let status = stream(command, Some(b"kind: Service\n".to_vec()), &mut Output::sink())
            .await
            .unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stream_relays_output_that_is_not_utf8() {
        let buf = Shared::default();
        let mut output = Output::with_writer(OutputMode::Normal, buf.clone());
        let mut command = Command::new("sh");
        command.args(["-c", r"printf 'Step 1\n\377\376 progress\nno newline'; exit 0"]);

        let status = stream(command, None, &mut output).await.unwrap();

        assert!(status.success());
        assert_eq!(
            buf.contents(),
            "    Step 1\n    \u{fffd}\u{fffd} progress\n    no newline\n"
        );
    }

    #[test]
    fn relay_strips_line_endings_and_clears_the_buffer() {
        let buf = Shared::default();
        let mut output = Output::with_writer(OutputMode::Normal, buf.clone());
        let mut line = b"\xff built\r\n".to_vec();

        relay(&mut line, &mut output);

        assert!(line.is_empty());
        assert_eq!(buf.contents(), "    \u{fffd} built\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn capture_returns_stdout() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo sha256:abc"]);

        let (status, stdout) = capture(command).await.unwrap();
        assert!(status.success());
        assert_eq!(stdout.trim(), "sha256:abc");
    }
}
