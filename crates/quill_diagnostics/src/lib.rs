//! quill_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every stage of the pipeline reports problems by pushing [`Diagnostic`]s
//! into a [`DiagnosticBag`]; nothing is thrown. The message templates live in
//! [`messages`] so wording stays stable across the compiler and its tests.

use quill_core::text::{TextLocation, TextSpan};
use std::cmp::{Ordering, Reverse};
use std::fmt;

/// How serious a diagnostic is. Errors block handing the program on to an
/// evaluator or code generator; warnings never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message template with a code and severity.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1003, 2001).
    pub code: u32,
    /// The severity of this diagnostic.
    pub severity: DiagnosticSeverity,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Where the diagnostic occurred. `None` only for whole-program problems.
    pub location: Option<TextLocation>,
    /// The resolved message.
    pub message_text: String,
    /// The diagnostic code.
    pub code: u32,
    /// The severity.
    pub severity: DiagnosticSeverity,
}

impl Diagnostic {
    /// Create a diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            location: None,
            message_text: format_message(message.message, args),
            code: message.code,
            severity: message.severity,
        }
    }

    /// Create a diagnostic at a location.
    pub fn with_location(location: TextLocation, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            location: Some(location),
            message_text: format_message(message.message, args),
            code: message.code,
            severity: message.severity,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == DiagnosticSeverity::Warning
    }

    pub fn span(&self) -> Option<TextSpan> {
        self.location.as_ref().map(|location| location.span)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.location.as_ref().map(|location| location.file_name())
    }
}

impl fmt::Display for Diagnostic {
    /// `file(line,column): message`, or `severity: message` without a location.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.message_text),
            None => write!(f, "{}: {}", self.severity, self.message_text),
        }
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// An ordered list of diagnostics accumulated during compilation.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report a message at a location.
    pub fn report(&mut self, location: TextLocation, message: &DiagnosticMessage, args: &[&str]) {
        self.add(Diagnostic::with_location(location, message, args));
    }

    /// Report a whole-program message with no location.
    pub fn report_global(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        self.add(Diagnostic::new(message, args));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn extend_from_slice(&mut self, diagnostics: &[Diagnostic]) {
        self.diagnostics.extend_from_slice(diagnostics);
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Sort by file name, then span start, then span length descending, so the
    /// widest diagnostic at a position comes first. Locationless diagnostics
    /// sort before everything else. The sort is stable.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(compare_diagnostics);
    }
}

impl<'b> IntoIterator for &'b DiagnosticBag {
    type Item = &'b Diagnostic;
    type IntoIter = std::slice::Iter<'b, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl FromIterator<Diagnostic> for DiagnosticBag {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

fn compare_diagnostics(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    let key = |d: &Diagnostic| {
        d.location
            .as_ref()
            .map(|l| (l.file_name().to_string(), l.span.start, Reverse(l.span.length)))
    };
    key(a).cmp(&key(b))
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, severity: DiagnosticSeverity::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, severity: DiagnosticSeverity::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Lexical errors (1000-1099)
    // ========================================================================
    pub const BAD_CHARACTER_INPUT: DiagnosticMessage = diag!(1001, Error, "Bad character input: '{0}'");
    pub const INVALID_NUMBER: DiagnosticMessage = diag!(1002, Error, "The number {0} isn't a valid int");
    pub const STRING_LITERAL_NOT_TERMINATED: DiagnosticMessage = diag!(1003, Error, "String literal not terminated");
    pub const INVALID_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1004, Error, "Invalid escape sequence");
    pub const UNTERMINATED_MULTILINE_COMMENT: DiagnosticMessage = diag!(1005, Error, "Unterminated multiline comment");

    // ========================================================================
    // Syntax errors (1100-1199)
    // ========================================================================
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1101, Error, "Unexpected `{0}`, expected `{1}`");

    // ========================================================================
    // Declarations and names (2000-2099)
    // ========================================================================
    pub const SYMBOL_ALREADY_DECLARED: DiagnosticMessage = diag!(2001, Error, "Symbol '{0}' is already declared");
    pub const SYMBOL_HIDES_SYMBOL: DiagnosticMessage = diag!(2002, Warning, "{0} '{1}' hides {2} '{1}'");
    pub const UNDEFINED_VARIABLE: DiagnosticMessage = diag!(2003, Error, "Variable '{0}' doesn't exist");
    pub const UNDEFINED_FUNCTION: DiagnosticMessage = diag!(2004, Error, "Function '{0}' doesn't exist");
    pub const UNDEFINED_TYPE: DiagnosticMessage = diag!(2005, Error, "Type '{0}' doesn't exist");
    pub const NOT_A_FUNCTION: DiagnosticMessage = diag!(2006, Error, "Unexpected symbol kind '{0}', expected '{1}' to be a function");
    pub const CANNOT_ASSIGN: DiagnosticMessage = diag!(2007, Error, "Variable '{0}' is read-only and cannot be assigned to");
    pub const LABEL_ALREADY_DECLARED: DiagnosticMessage = diag!(2008, Error, "Label '{0}' is already declared");
    pub const UNDEFINED_LABEL: DiagnosticMessage = diag!(2009, Error, "Label '{0}' doesn't exist");

    // ========================================================================
    // Types and operators (2100-2199)
    // ========================================================================
    pub const CANNOT_CONVERT: DiagnosticMessage = diag!(2101, Error, "Cannot convert '{0}' to '{1}'");
    pub const CANNOT_CONVERT_IMPLICITLY: DiagnosticMessage = diag!(2102, Error, "Cannot convert '{0}' to '{1}'. An explicit conversion exists (are you missing a cast?)");
    pub const UNDEFINED_UNARY_OPERATOR: DiagnosticMessage = diag!(2103, Error, "Unary operator '{0}' cannot be applied to type '{1}'");
    pub const UNDEFINED_BINARY_OPERATOR: DiagnosticMessage = diag!(2104, Error, "Binary operator '{0}' cannot be applied to types '{1}' and '{2}'");
    pub const WRONG_ARGUMENT_COUNT: DiagnosticMessage = diag!(2105, Error, "Function '{0}' requires {1} arguments but was given {2}");
    pub const EXPRESSION_MUST_HAVE_VALUE: DiagnosticMessage = diag!(2106, Error, "Expression must have a value");
    pub const INVALID_EXPRESSION_STATEMENT: DiagnosticMessage = diag!(2107, Error, "Only assignment and call expressions can be used as a statement");

    // ========================================================================
    // Statements and program structure (2200-2299)
    // ========================================================================
    pub const INVALID_BREAK_OR_CONTINUE: DiagnosticMessage = diag!(2201, Error, "The keyword '{0}' can only be used inside of loops");
    pub const INVALID_RETURN_EXPRESSION: DiagnosticMessage = diag!(2202, Error, "'{0}' does not have a return type and cannot return a value of type '{1}'");
    pub const MISSING_RETURN_EXPRESSION: DiagnosticMessage = diag!(2203, Error, "An expression of type '{0}' is expected");
    pub const INVALID_RETURN_WITH_VALUE_IN_GLOBAL_STATEMENTS: DiagnosticMessage = diag!(2204, Error, "The 'return' keyword cannot be followed by an expression in global statements");
    pub const ONLY_ONE_FILE_CAN_HAVE_GLOBAL_STATEMENTS: DiagnosticMessage = diag!(2205, Error, "At most one file can have global statements");
    pub const CANNOT_MIX_MAIN_AND_GLOBAL_STATEMENTS: DiagnosticMessage = diag!(2206, Error, "Cannot declare main function when global statements are used");
    pub const MAIN_MUST_HAVE_CORRECT_SIGNATURE: DiagnosticMessage = diag!(2207, Error, "main must not take arguments and not return anything");
    pub const MISSING_ENTRY_POINT: DiagnosticMessage = diag!(2208, Error, "The program has no entry point; declare a 'main' function or write global statements");

    // ========================================================================
    // Control flow (7000-7099)
    // ========================================================================
    pub const NOT_ALL_CODE_PATHS_RETURN: DiagnosticMessage = diag!(7001, Error, "Not all code paths of function '{0}' return a value of type '{1}'");
    pub const UNREACHABLE_CODE: DiagnosticMessage = diag!(7002, Warning, "Unreachable code detected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::text::SourceText;
    use std::sync::Arc;

    fn location(text: &Arc<SourceText>, start: u32, length: u32) -> TextLocation {
        TextLocation::new(text.clone(), TextSpan::new(start, length))
    }

    #[test]
    fn test_format_message() {
        let msg = format_message("Binary operator '{0}' cannot be applied to types '{1}' and '{2}'", &["+", "int", "bool"]);
        assert_eq!(msg, "Binary operator '+' cannot be applied to types 'int' and 'bool'");
    }

    #[test]
    fn test_hides_message_repeats_name() {
        let diag = Diagnostic::new(&messages::SYMBOL_HIDES_SYMBOL, &["Parameter", "x", "global variable"]);
        assert_eq!(diag.message_text, "Parameter 'x' hides global variable 'x'");
        assert!(diag.is_warning());
    }

    #[test]
    fn test_diagnostic_display() {
        let text = SourceText::shared("test.qs", "var x = 1\nvar x = 2");
        let diag = Diagnostic::with_location(location(&text, 14, 1), &messages::SYMBOL_ALREADY_DECLARED, &["x"]);
        assert_eq!(diag.to_string(), "test.qs(2,5): Symbol 'x' is already declared");
    }

    #[test]
    fn test_diagnostic_without_location() {
        let diag = Diagnostic::new(&messages::MISSING_ENTRY_POINT, &[]);
        assert!(diag.location.is_none());
        assert!(diag.is_error());
        assert!(diag.to_string().starts_with("error: "));
    }

    #[test]
    fn test_diagnostic_bag_counts() {
        let mut bag = DiagnosticBag::new();
        assert!(bag.is_empty());
        bag.report_global(&messages::MISSING_ENTRY_POINT, &[]);
        bag.report_global(&messages::UNREACHABLE_CODE, &[]);
        assert!(bag.has_errors());
        assert_eq!(bag.error_count(), 1);
        assert_eq!(bag.warning_count(), 1);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_sort_by_file_then_start_then_widest() {
        let a = SourceText::shared("a.qs", "0123456789");
        let b = SourceText::shared("b.qs", "0123456789");
        let mut bag = DiagnosticBag::new();
        bag.report(location(&b, 1, 1), &messages::UNEXPECTED_TOKEN, &["x", "y"]);
        bag.report(location(&a, 5, 1), &messages::UNREACHABLE_CODE, &[]);
        bag.report(location(&a, 2, 1), &messages::UNDEFINED_VARIABLE, &["narrow"]);
        bag.report(location(&a, 2, 4), &messages::UNDEFINED_VARIABLE, &["wide"]);
        bag.sort();

        let order: Vec<(&str, u32, u32)> = bag
            .iter()
            .map(|d| (d.file_name().unwrap(), d.span().unwrap().start, d.span().unwrap().length))
            .collect();
        assert_eq!(order, vec![("a.qs", 2, 4), ("a.qs", 2, 1), ("a.qs", 5, 1), ("b.qs", 1, 1)]);
    }
}
