//! Source transpilation capability.
//!
//! The compiler never interprets model logic; it only hands source text to a
//! transpiler and stitches the results together in source order.
use crate::source::SourceFile;
use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

pub trait Transpiler {
    /// Turn one author source into portable script text.
    fn transpile(&self, source: &SourceFile) -> Result<String>;
}

/// Transpile each source and join the outputs with newlines, preserving order.
pub fn transpile_all(transpiler: &dyn Transpiler, sources: &[SourceFile]) -> Result<String> {
    let mut outputs = Vec::with_capacity(sources.len());
    for source in sources {
        let script = transpiler
            .transpile(source)
            .with_context(|| format!("transpile {}", source.path.display()))?;
        outputs.push(script);
    }
    Ok(outputs.join("\n"))
}

/// Sources that are already plain script pass through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughTranspiler;

impl Transpiler for PassthroughTranspiler {
    fn transpile(&self, source: &SourceFile) -> Result<String> {
        Ok(source.text.clone())
    }
}

/// Runs an external command with the source on stdin and script on stdout.
#[derive(Debug, Clone)]
pub struct CommandTranspiler {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandTranspiler {
    /// Parse a shell-style command line and resolve its program on `PATH`.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut words = shell_words::split(command)
            .with_context(|| format!("parse transpiler command: {command}"))?;
        if words.is_empty() {
            return Err(anyhow!("transpiler command is empty"));
        }
        let program = words.remove(0);
        let resolved = which::which(&program)
            .with_context(|| format!("locate transpiler program {program}"))?;
        Ok(Self {
            program: resolved,
            args: words,
        })
    }
}

impl Transpiler for CommandTranspiler {
    fn transpile(&self, source: &SourceFile) -> Result<String> {
        let start = Instant::now();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn transpiler: {}", self.program.display()))?;

        // Write stdin on its own thread; stdout and stderr drain meanwhile.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("transpiler stdin was not captured"))?;
        let text = source.text.clone();
        let writer = thread::spawn(move || stdin.write_all(text.as_bytes()));

        let output = child.wait_with_output().context("wait for transpiler")?;
        let written = writer
            .join()
            .map_err(|_| anyhow!("transpiler stdin writer panicked"))?;
        let elapsed_ms = start.elapsed().as_millis();

        tracing::info!(
            elapsed_ms,
            source_bytes = source.text.len(),
            output_bytes = output.stdout.len(),
            "transpile complete"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "transpiler failed ({}): {}",
                output.status,
                stderr.trim()
            ));
        }
        written.context("write source to transpiler stdin")?;

        String::from_utf8(output.stdout).context("decode transpiler stdout as UTF-8")
    }
}
