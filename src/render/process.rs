// External-process renderer
//
// Each call spawns the configured command on a private current-thread tokio
// runtime and waits for it under a deadline. A child that overruns is
// killed when its wait future is dropped.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};

use crate::audio::{read_render_output, AudioBuffer};
use crate::config::RendererCommand;
use crate::error::RenderError;
use crate::render::{Renderer, OUTPUT_PLACEHOLDER, PRESET_PLACEHOLDER};

/// Replace `{preset}` and `{output}` in every argument
pub fn substitute_args(args: &[String], preset: &Path, output: &Path) -> Vec<String> {
    let preset = preset.display().to_string();
    let output = output.display().to_string();
    args.iter()
        .map(|arg| {
            arg.replace(PRESET_PLACEHOLDER, &preset)
                .replace(OUTPUT_PLACEHOLDER, &output)
        })
        .collect()
}

/// Renderer backed by an external command
pub struct ProcessRenderer {
    label: String,
    command: RendererCommand,
    sample_rate: u32,
    runtime: Runtime,
}

impl ProcessRenderer {
    /// Create a renderer for `command`
    ///
    /// # Arguments
    /// * `label` - Name used in logs ("reference", "candidate")
    /// * `command` - Program, argument template, timeout and output format
    /// * `sample_rate` - Rate assumed for headerless float output
    pub fn new(
        label: impl Into<String>,
        command: RendererCommand,
        sample_rate: u32,
    ) -> io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            label: label.into(),
            command,
            sample_rate,
            runtime,
        })
    }

    pub fn command(&self) -> &RendererCommand {
        &self.command
    }

    async fn run(&self, args: Vec<String>) -> Result<std::process::Output, RenderError> {
        let program = self.command.program.clone();
        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| RenderError::SpawnFailed {
                program: program.clone(),
                reason: err.to_string(),
            })?;

        let deadline = Duration::from_millis(self.command.timeout_ms);
        match tokio::time::timeout(deadline, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(err)) => Err(RenderError::SpawnFailed {
                program,
                reason: err.to_string(),
            }),
            Err(_) => Err(RenderError::Timeout {
                program,
                timeout_ms: self.command.timeout_ms,
            }),
        }
    }
}

impl Renderer for ProcessRenderer {
    fn name(&self) -> &str {
        &self.label
    }

    fn render(&self, preset: &Path, output: &Path) -> Result<AudioBuffer, RenderError> {
        let args = substitute_args(&self.command.args, preset, output);
        tracing::debug!(
            renderer = %self.label,
            program = %self.command.program,
            ?args,
            "spawning renderer"
        );

        let started = Instant::now();
        let result = self.runtime.block_on(self.run(args))?;
        let elapsed_ms = started.elapsed().as_millis();

        if !result.status.success() {
            return Err(RenderError::AbnormalExit {
                program: self.command.program.clone(),
                code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        let buffer = read_render_output(output, self.command.output_format, self.sample_rate)?;
        tracing::debug!(
            renderer = %self.label,
            elapsed_ms = elapsed_ms as u64,
            samples = buffer.len(),
            "render finished"
        );
        Ok(buffer)
    }
}
