//! Diagnostic rendering for the terminal.

use miette::{GraphicalReportHandler, LabeledSpan, NamedSource, Severity, SourceCode, SourceSpan};
use quill_diagnostics::{Diagnostic, DiagnosticSeverity};
use std::fmt;

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// A [`Diagnostic`] with its source attached, in the shape miette renders.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SourceDiagnostic {
    message: String,
    code: u32,
    severity: DiagnosticSeverity,
    source_text: Option<NamedSource<String>>,
    span: Option<SourceSpan>,
}

impl SourceDiagnostic {
    pub fn new(diagnostic: &Diagnostic) -> Self {
        let (source_text, span) = match &diagnostic.location {
            Some(location) => {
                let range = location.span.to_range();
                (
                    Some(NamedSource::new(location.file_name(), location.text.text().to_string())),
                    Some(SourceSpan::from((range.start, range.len()))),
                )
            }
            None => (None, None),
        };
        Self {
            message: diagnostic.message_text.clone(),
            code: diagnostic.code,
            severity: diagnostic.severity,
            source_text,
            span,
        }
    }
}

impl miette::Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("QS{}", self.code)))
    }

    fn severity(&self) -> Option<Severity> {
        Some(match self.severity {
            DiagnosticSeverity::Error => Severity::Error,
            DiagnosticSeverity::Warning => Severity::Warning,
        })
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.source_text.as_ref().map(|source| source as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(None, span))))
    }
}

/// Writes diagnostics to stderr, either through miette's graphical handler
/// or as plain `file(line,column): message` lines.
pub struct Reporter {
    pretty: bool,
    handler: GraphicalReportHandler,
}

impl Reporter {
    pub fn new(pretty: bool) -> Self {
        Self {
            pretty,
            handler: GraphicalReportHandler::new(),
        }
    }

    pub fn report(&self, diagnostic: &Diagnostic) {
        if !self.pretty {
            eprintln!("{}", diagnostic);
            return;
        }
        let mut out = String::new();
        match self.handler.render_report(&mut out, &SourceDiagnostic::new(diagnostic)) {
            Ok(()) => eprint!("{}", out),
            Err(_) => eprintln!("{}", diagnostic),
        }
    }

    pub fn summary(&self, errors: usize, warnings: usize) {
        if errors == 0 && warnings == 0 {
            return;
        }
        let text = format!("Found {} and {}.", plural(errors, "error"), plural(warnings, "warning"));
        if !self.pretty {
            eprintln!("{}", text);
        } else if errors > 0 {
            eprintln!("{}{}{}", RED, text, RESET);
        } else {
            eprintln!("{}{}{}", YELLOW, text, RESET);
        }
    }

    pub fn error(&self, message: &str) {
        if self.pretty {
            eprintln!("{}error{}: {}", RED, RESET, message);
        } else {
            eprintln!("error: {}", message);
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic as _;
    use quill_core::text::{SourceText, TextLocation, TextSpan};
    use quill_diagnostics::messages;

    #[test]
    fn test_source_diagnostic_carries_span_and_code() {
        let text = SourceText::shared("main.qs", "var x = y");
        let location = TextLocation::new(text, TextSpan::new(8, 1));
        let diagnostic = Diagnostic::with_location(location, &messages::UNDEFINED_VARIABLE, &["y"]);

        let rendered = SourceDiagnostic::new(&diagnostic);
        assert_eq!(rendered.to_string(), diagnostic.message_text);
        assert_eq!(rendered.severity(), Some(Severity::Error));
        assert!(rendered.source_code().is_some());
        let labels: Vec<LabeledSpan> = rendered.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 8);
        assert_eq!(labels[0].len(), 1);
    }

    #[test]
    fn test_global_diagnostic_has_no_source() {
        let diagnostic = Diagnostic::new(&messages::MISSING_ENTRY_POINT, &[]);
        let rendered = SourceDiagnostic::new(&diagnostic);
        assert!(rendered.source_code().is_none());
        assert!(rendered.labels().is_none());
        assert_eq!(rendered.code().map(|code| code.to_string()), Some("QS2208".to_string()));
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "error"), "1 error");
        assert_eq!(plural(0, "warning"), "0 warnings");
    }
}
