//! Structured shader compile and link diagnostics.
//!
//! Drivers report problems as a free-form info log. [`ShaderDiagnostic`]
//! keeps the raw log and splits it into [`DiagnosticMessage`]s, picking up
//! the source line from the three layouts seen in practice:
//!
//! - `ERROR: 0:12: 'x' : undeclared identifier` (ANGLE, WebGL)
//! - `0:12(5): error: 'x' undeclared` (Mesa)
//! - `0(12) : error C1008: undefined variable "x"` (NVIDIA)

use std::fmt;

/// The pipeline stage a shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One line of a driver info log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub severity: Severity,
    /// 1-based line in the shader source, when the driver reports one.
    pub line: Option<u32>,
    pub text: String,
}

impl DiagnosticMessage {
    /// Parses a single info-log line. Blank lines yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        // ANGLE: "ERROR: 0:12: message"
        for (prefix, severity) in [("ERROR:", Severity::Error), ("WARNING:", Severity::Warning)] {
            if let Some(rest) = raw.strip_prefix(prefix) {
                let rest = rest.trim_start();
                let (line, text) = match split_colon_location(rest) {
                    Some((line, text)) => (Some(line), text),
                    None => (None, rest),
                };
                return Some(Self {
                    severity,
                    line,
                    text: text.trim().to_string(),
                });
            }
        }

        // Mesa: "0:12(5): error: message"
        let mesa = raw
            .split_once(": ")
            .and_then(|(location, rest)| Some((mesa_line(location)?, rest)));
        if let Some((line, rest)) = mesa {
            return Some(Self::with_severity(Some(line), rest));
        }

        // NVIDIA: "0(12) : error C1008: message"
        let nvidia = raw
            .split_once(" : ")
            .and_then(|(location, rest)| Some((nvidia_line(location)?, rest)));
        if let Some((line, rest)) = nvidia {
            return Some(Self::with_severity(Some(line), rest));
        }

        Some(Self::with_severity(None, raw))
    }

    fn with_severity(line: Option<u32>, text: &str) -> Self {
        let text = text.trim();
        let lower = text.to_ascii_lowercase();
        let (severity, text) = if lower.starts_with("warning") {
            (Severity::Warning, strip_label(text))
        } else if lower.starts_with("error") {
            (Severity::Error, strip_label(text))
        } else {
            (Severity::Error, text)
        };
        Self {
            severity,
            line,
            text: text.to_string(),
        }
    }
}

/// Drops a leading `error:` / `warning C7050:` style label.
fn strip_label(text: &str) -> &str {
    match text.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => text,
    }
}

/// "0:12: message" -> (12, "message")
fn split_colon_location(text: &str) -> Option<(u32, &str)> {
    let mut parts = text.splitn(3, ':');
    let _source = parts.next()?.trim().parse::<u32>().ok()?;
    let line = parts.next()?.trim().parse::<u32>().ok()?;
    Some((line, parts.next().unwrap_or("")))
}

/// "0:12(5)" -> 12
fn mesa_line(location: &str) -> Option<u32> {
    let (source, rest) = location.split_once(':')?;
    source.parse::<u32>().ok()?;
    let line = rest.split_once('(').map_or(rest, |(line, _)| line);
    line.parse().ok()
}

/// "0(12)" -> 12
fn nvidia_line(location: &str) -> Option<u32> {
    let (source, rest) = location.split_once('(')?;
    source.parse::<u32>().ok()?;
    rest.strip_suffix(')')?.parse().ok()
}

/// A failed compile or link, with the driver's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDiagnostic {
    /// The stage that failed to compile, or `None` for a link failure.
    pub stage: Option<ShaderStage>,
    pub log: String,
    pub messages: Vec<DiagnosticMessage>,
}

impl ShaderDiagnostic {
    pub fn compile(stage: ShaderStage, log: impl Into<String>) -> Self {
        Self::from_log(Some(stage), log.into())
    }

    pub fn link(log: impl Into<String>) -> Self {
        Self::from_log(None, log.into())
    }

    fn from_log(stage: Option<ShaderStage>, log: String) -> Self {
        let messages = log.lines().filter_map(DiagnosticMessage::parse).collect();
        Self {
            stage,
            log,
            messages,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
    }

    pub fn first_error(&self) -> Option<&DiagnosticMessage> {
        self.errors().next()
    }
}

impl fmt::Display for ShaderDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stage {
            Some(stage) => write!(f, "{stage} shader failed to compile")?,
            None => write!(f, "shader program failed to link")?,
        }
        match self.first_error() {
            Some(DiagnosticMessage {
                line: Some(line),
                text,
                ..
            }) => write!(f, " (line {line}: {text})"),
            Some(DiagnosticMessage { text, .. }) => write!(f, " ({text})"),
            None if self.log.trim().is_empty() => write!(f, " (no info log)"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_log() {
        let diag = ShaderDiagnostic::compile(
            ShaderStage::Fragment,
            "ERROR: 0:7: 'vColour' : undeclared identifier\n\
             ERROR: 0:7: 'assign' : cannot convert\n",
        );
        assert_eq!(diag.messages.len(), 2);
        assert_eq!(
            diag.messages[0],
            DiagnosticMessage {
                severity: Severity::Error,
                line: Some(7),
                text: "'vColour' : undeclared identifier".into(),
            }
        );
        assert_eq!(
            diag.to_string(),
            "fragment shader failed to compile (line 7: 'vColour' : undeclared identifier)"
        );
    }

    #[test]
    fn test_mesa_log() {
        let msg = DiagnosticMessage::parse("0:12(5): error: `position' undeclared").unwrap();
        assert_eq!(msg.severity, Severity::Error);
        assert_eq!(msg.line, Some(12));
        assert_eq!(msg.text, "`position' undeclared");

        let msg = DiagnosticMessage::parse("0:3(1): warning: extension not supported").unwrap();
        assert_eq!(msg.severity, Severity::Warning);
        assert_eq!(msg.line, Some(3));
    }

    #[test]
    fn test_nvidia_log() {
        let log = "0(21) : error C1008: undefined variable \"uv\"";
        let msg = DiagnosticMessage::parse(log).unwrap();
        assert_eq!(msg.severity, Severity::Error);
        assert_eq!(msg.line, Some(21));
        assert_eq!(msg.text, "undefined variable \"uv\"");
    }

    #[test]
    fn test_unlocated_link_log() {
        let diag = ShaderDiagnostic::link("error: linking with uncompiled/unspecialized shader");
        assert_eq!(diag.stage, None);
        assert_eq!(diag.messages[0].line, None);
        assert_eq!(
            diag.to_string(),
            "shader program failed to link (linking with uncompiled/unspecialized shader)"
        );
    }

    #[test]
    fn test_empty_log() {
        let diag = ShaderDiagnostic::compile(ShaderStage::Vertex, "  \n");
        assert!(diag.messages.is_empty());
        assert_eq!(diag.to_string(), "vertex shader failed to compile (no info log)");
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let diag = ShaderDiagnostic::compile(
            ShaderStage::Vertex,
            "WARNING: 0:2: extension 'GL_OES_standard_derivatives' is not supported",
        );
        assert_eq!(diag.errors().count(), 0);
        assert_eq!(diag.messages[0].severity, Severity::Warning);
    }
}
