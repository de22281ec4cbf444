use std::{io::ErrorKind, process::Stdio};

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::trace;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("couldn't run `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with code {}: {output}", .code.map_or_else(|| "none".to_owned(), |c| c.to_string()))]
    Failed {
        program: String,
        code: Option<i32>,
        output: String,
    },
}

/// Runs external programs on behalf of the clients that drive a CLI.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Runs `program` with `args`, feeding it `stdin` if provided, and returns stdout followed by
    /// stderr.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<String, CommandError>;
}

/// [`CommandExecutor`] spawning real processes.
#[derive(Debug, Default, Clone)]
pub struct Shell;

#[async_trait]
impl CommandExecutor for Shell {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<String, CommandError> {
        trace!("running `{} {}`", program, args.join(" "));

        let io_error = |source| CommandError::Io {
            program: program.to_owned(),
            source,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(io_error)?;

        // stdin has to be fed while the output is drained
        let pipe = child.stdin.take();
        let feed = async move {
            if let (Some(input), Some(mut pipe)) = (stdin, pipe) {
                match pipe.write_all(input.as_bytes()).await {
                    // the program exited without reading everything, its status decides
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                        trace!("`{}` closed its stdin early", program)
                    }
                    result => result?,
                }
            }
            Ok::<_, std::io::Error>(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        fed.map_err(io_error)?;
        let output = output.map_err(io_error)?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(CommandError::Failed {
                program: program.to_owned(),
                code: output.status.code(),
                output: combined,
            });
        }

        Ok(combined)
    }
}
