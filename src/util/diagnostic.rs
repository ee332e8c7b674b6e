//! User-facing error reports.
//!
//! Every error printed by the CLI carries its cause chain and, when the
//! underlying error knows one, an actionable suggestion.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use crate::builder::errors::BuildError;
use crate::core::errors::RecipeError;
use crate::ops::package::PackageError;

/// A report rendered to stderr when a command fails.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    /// Error code, e.g. `gantry::build::configure_failed`
    pub code: Option<String>,
    /// Cause chain, outermost first
    pub context: Vec<String>,
    /// Rendered as `help:` lines
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            code: None,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Build a report from an error and its cause chain.
    ///
    /// The outermost message is the headline; each cause becomes a context
    /// line. Codes and help come from the first typed error in the chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let mut diag = Diagnostic::error(err.to_string());

        for cause in err.chain().skip(1) {
            diag = diag.with_context(cause.to_string());
        }

        for cause in err.chain() {
            let typed: Option<&dyn MietteDiagnostic> =
                if let Some(e) = cause.downcast_ref::<RecipeError>() {
                    Some(e)
                } else if let Some(e) = cause.downcast_ref::<BuildError>() {
                    Some(e)
                } else if let Some(e) = cause.downcast_ref::<PackageError>() {
                    Some(e)
                } else {
                    None
                };

            let Some(typed) = typed else { continue };

            diag.code = typed.code().map(|c| c.to_string());
            if let Some(help) = typed.help() {
                diag = diag.with_suggestion(help.to_string());
            }
            if let Some(build) = cause.downcast_ref::<BuildError>() {
                diag = diag.with_context(format!("command: {}", build.command()));
            }
            break;
        }

        diag
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Render as `error[code]: message` followed by causes and help.
    pub fn format(&self, color: bool) -> String {
        let mut out = String::new();

        let label = if color { "\x1b[1;31merror\x1b[0m" } else { "error" };

        match self.code {
            Some(ref code) => {
                out.push_str(&format!("{}[{}]: {}\n", label, code, self.message))
            }
            None => out.push_str(&format!("{}: {}\n", label, self.message)),
        }

        for ctx in &self.context {
            out.push_str(&format!("  caused by: {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            let help = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            for suggestion in &self.suggestions {
                out.push_str(&format!("{}: {}\n", help, suggestion));
            }
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("failed to build gigamonkey")
            .with_context("cmake exited with code 2")
            .with_suggestion("Check the CMake output above");

        let output = diag.format(false);
        assert!(output.starts_with("error: failed to build gigamonkey"));
        assert!(output.contains("caused by: cmake exited with code 2"));
        assert!(output.contains("help: Check the CMake output above"));
    }

    #[test]
    fn test_from_error_uses_typed_help() {
        let err = anyhow::Error::from(RecipeError::InvalidCoreCount("four".to_string()))
            .context("failed to configure gigamonkey");

        let diag = Diagnostic::from_error(&err);
        assert_eq!(diag.message, "failed to configure gigamonkey");
        assert_eq!(diag.code.as_deref(), Some("gantry::build::invalid_core_count"));
        assert_eq!(diag.context, vec!["invalid core count `four`".to_string()]);
        assert!(diag.suggestions[0].contains("positive integer"));
    }

    #[test]
    fn test_build_failure_reports_command() {
        let err: anyhow::Error = BuildError::BuildFailed {
            command: "cmake --build build".to_string(),
            code: Some(2),
        }
        .into();

        let diag = Diagnostic::from_error(&err);
        assert_eq!(diag.message, "cmake build failed with exit code: 2");
        assert_eq!(diag.context, vec!["command: cmake --build build".to_string()]);
        assert!(diag.suggestions[0].contains("--verbose"));
    }

    #[test]
    fn test_untyped_error_has_no_code() {
        let err = Err::<(), _>(std::io::Error::other("disk full"))
            .context("failed to copy headers")
            .unwrap_err();

        let diag = Diagnostic::from_error(&err);
        assert!(diag.code.is_none());
        assert!(diag.suggestions.is_empty());
        assert_eq!(diag.context, vec!["disk full".to_string()]);
    }
}
