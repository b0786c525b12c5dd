//! Terminal emitter: human-readable diagnostic output with optional ANSI
//! color, grounded on `ori_diagnostic::emitter::terminal`.

use crate::{Diagnostic, Reporter, Severity};
use std::io::{self, Write};

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Writes diagnostics to any `Write` sink (stderr in `watc`, an in-memory
/// buffer in tests), optionally colorized.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    pub fn new(writer: W) -> Self {
        Self::with_color_mode(writer, ColorMode::Auto, false)
    }

    fn severity_color(&self, severity: Severity) -> &'static str {
        if !self.colors {
            return "";
        }
        match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        }
    }

    fn reset(&self) -> &'static str {
        if self.colors {
            colors::RESET
        } else {
            ""
        }
    }

    pub fn emit(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        let color = self.severity_color(diagnostic.severity);
        let reset = self.reset();
        let source = diagnostic.source_name.as_deref().unwrap_or("<script>");
        writeln!(
            self.writer,
            "{color}{severity}[{code}]{reset}: {message}",
            severity = diagnostic.severity,
            code = diagnostic.kind.code(),
            message = diagnostic.message,
        )?;
        writeln!(
            self.writer,
            "  --> {source}:{start}",
            start = diagnostic.span.start
        )?;
        let secondary = if self.colors { colors::SECONDARY } else { "" };
        for label in &diagnostic.labels {
            writeln!(
                self.writer,
                "  {secondary}note{reset}: {message} ({span})",
                message = label.message,
                span = label.span.start,
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Reporter for TerminalEmitter<W> {
    fn on_error(&mut self, diagnostic: Diagnostic) {
        // A formatting failure here has no recovery path worth taking;
        // the parse itself already recorded the diagnostic in the
        // `DiagnosticQueue` this emitter sits behind.
        let _ = self.emit(&diagnostic);
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use wat_ir::Span;

    #[test]
    fn emits_message_and_code() {
        let mut buf = Vec::new();
        {
            let mut emitter =
                TerminalEmitter::with_color_mode(&mut buf, ColorMode::Never, false);
            emitter
                .emit(&Diagnostic::error(ErrorKind::Syntactic, "bad token", Span::DUMMY))
                .unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("bad token"));
        assert!(text.contains("wat::syntax"));
    }
}
