//! Framing for emitted model scripts.

/// Opens the strict-mode module wrapper every model script starts with.
pub const PROLOGUE: &str = "(function() {\n'use strict';\n";
/// Closes the wrapper opened by [`PROLOGUE`].
pub const EPILOGUE: &str = "})();\n";

/// Accumulates the script body; framing is added by [`ScriptWriter::finish`].
#[derive(Debug, Default)]
pub struct ScriptWriter {
    body: String,
}

impl ScriptWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block of code, terminating it with a newline if it lacks one.
    pub fn push(&mut self, code: &str) {
        if code.is_empty() {
            return;
        }
        self.body.push_str(code);
        if !code.ends_with('\n') {
            self.body.push('\n');
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn finish(self) -> String {
        format!("{PROLOGUE}{}{EPILOGUE}", self.body)
    }
}
