//! SyntaxKind enum - every token, trivia and node kind of the language.

/// The kind of a token, trivia piece or syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SyntaxKind {
    // ========================================================================
    // Special tokens
    // ========================================================================
    BadToken,
    EndOfFileToken,

    // ========================================================================
    // Trivia
    // ========================================================================
    WhitespaceTrivia,
    LineBreakTrivia,
    SingleLineCommentTrivia,
    MultiLineCommentTrivia,
    SkippedTextTrivia,

    // ========================================================================
    // Literal and identifier tokens
    // ========================================================================
    NumberToken,
    StringToken,
    IdentifierToken,

    // ========================================================================
    // Punctuation
    // ========================================================================
    PlusToken,
    PlusEqualsToken,
    PlusPlusToken,
    MinusToken,
    MinusEqualsToken,
    MinusMinusToken,
    StarToken,
    StarEqualsToken,
    SlashToken,
    SlashEqualsToken,
    PercentToken,
    PercentEqualsToken,
    BangToken,
    BangEqualsToken,
    TildeToken,
    AmpersandToken,
    AmpersandEqualsToken,
    AmpersandAmpersandToken,
    PipeToken,
    PipeEqualsToken,
    PipePipeToken,
    HatToken,
    HatEqualsToken,
    EqualsToken,
    EqualsEqualsToken,
    LessToken,
    LessOrEqualsToken,
    GreaterToken,
    GreaterOrEqualsToken,
    OpenParenthesisToken,
    CloseParenthesisToken,
    OpenBraceToken,
    CloseBraceToken,
    ColonToken,
    CommaToken,

    // ========================================================================
    // Keywords
    // ========================================================================
    BreakKeyword,
    ContinueKeyword,
    DoKeyword,
    ElseKeyword,
    FalseKeyword,
    ForKeyword,
    FunctionKeyword,
    GotoKeyword,
    IfKeyword,
    LetKeyword,
    ReturnKeyword,
    ToKeyword,
    TrueKeyword,
    VarKeyword,
    WhileKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    CompilationUnit,
    FunctionDeclaration,
    GlobalStatement,
    Parameter,
    TypeClause,
    ElseClause,

    // Statements
    BlockStatement,
    VariableDeclaration,
    IfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    LabelStatement,
    GotoStatement,
    ExpressionStatement,

    // Expressions
    LiteralExpression,
    NameExpression,
    UnaryExpression,
    BinaryExpression,
    ParenthesizedExpression,
    AssignmentExpression,
    CallExpression,
    PrefixExpression,
    PostfixExpression,
}

impl SyntaxKind {
    /// Every kind, in declaration order.
    pub const ALL: &'static [SyntaxKind] = &[
        SyntaxKind::BadToken,
        SyntaxKind::EndOfFileToken,
        SyntaxKind::WhitespaceTrivia,
        SyntaxKind::LineBreakTrivia,
        SyntaxKind::SingleLineCommentTrivia,
        SyntaxKind::MultiLineCommentTrivia,
        SyntaxKind::SkippedTextTrivia,
        SyntaxKind::NumberToken,
        SyntaxKind::StringToken,
        SyntaxKind::IdentifierToken,
        SyntaxKind::PlusToken,
        SyntaxKind::PlusEqualsToken,
        SyntaxKind::PlusPlusToken,
        SyntaxKind::MinusToken,
        SyntaxKind::MinusEqualsToken,
        SyntaxKind::MinusMinusToken,
        SyntaxKind::StarToken,
        SyntaxKind::StarEqualsToken,
        SyntaxKind::SlashToken,
        SyntaxKind::SlashEqualsToken,
        SyntaxKind::PercentToken,
        SyntaxKind::PercentEqualsToken,
        SyntaxKind::BangToken,
        SyntaxKind::BangEqualsToken,
        SyntaxKind::TildeToken,
        SyntaxKind::AmpersandToken,
        SyntaxKind::AmpersandEqualsToken,
        SyntaxKind::AmpersandAmpersandToken,
        SyntaxKind::PipeToken,
        SyntaxKind::PipeEqualsToken,
        SyntaxKind::PipePipeToken,
        SyntaxKind::HatToken,
        SyntaxKind::HatEqualsToken,
        SyntaxKind::EqualsToken,
        SyntaxKind::EqualsEqualsToken,
        SyntaxKind::LessToken,
        SyntaxKind::LessOrEqualsToken,
        SyntaxKind::GreaterToken,
        SyntaxKind::GreaterOrEqualsToken,
        SyntaxKind::OpenParenthesisToken,
        SyntaxKind::CloseParenthesisToken,
        SyntaxKind::OpenBraceToken,
        SyntaxKind::CloseBraceToken,
        SyntaxKind::ColonToken,
        SyntaxKind::CommaToken,
        SyntaxKind::BreakKeyword,
        SyntaxKind::ContinueKeyword,
        SyntaxKind::DoKeyword,
        SyntaxKind::ElseKeyword,
        SyntaxKind::FalseKeyword,
        SyntaxKind::ForKeyword,
        SyntaxKind::FunctionKeyword,
        SyntaxKind::GotoKeyword,
        SyntaxKind::IfKeyword,
        SyntaxKind::LetKeyword,
        SyntaxKind::ReturnKeyword,
        SyntaxKind::ToKeyword,
        SyntaxKind::TrueKeyword,
        SyntaxKind::VarKeyword,
        SyntaxKind::WhileKeyword,
        SyntaxKind::CompilationUnit,
        SyntaxKind::FunctionDeclaration,
        SyntaxKind::GlobalStatement,
        SyntaxKind::Parameter,
        SyntaxKind::TypeClause,
        SyntaxKind::ElseClause,
        SyntaxKind::BlockStatement,
        SyntaxKind::VariableDeclaration,
        SyntaxKind::IfStatement,
        SyntaxKind::WhileStatement,
        SyntaxKind::DoWhileStatement,
        SyntaxKind::ForStatement,
        SyntaxKind::BreakStatement,
        SyntaxKind::ContinueStatement,
        SyntaxKind::ReturnStatement,
        SyntaxKind::LabelStatement,
        SyntaxKind::GotoStatement,
        SyntaxKind::ExpressionStatement,
        SyntaxKind::LiteralExpression,
        SyntaxKind::NameExpression,
        SyntaxKind::UnaryExpression,
        SyntaxKind::BinaryExpression,
        SyntaxKind::ParenthesizedExpression,
        SyntaxKind::AssignmentExpression,
        SyntaxKind::CallExpression,
        SyntaxKind::PrefixExpression,
        SyntaxKind::PostfixExpression,
    ];

    /// Whether this is a reserved word.
    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::BreakKeyword && self <= SyntaxKind::WhileKeyword
    }

    /// Whether this is an operator or punctuation token.
    pub fn is_punctuation(self) -> bool {
        self >= SyntaxKind::PlusToken && self <= SyntaxKind::CommaToken
    }

    pub fn is_trivia(self) -> bool {
        self >= SyntaxKind::WhitespaceTrivia && self <= SyntaxKind::SkippedTextTrivia
    }

    pub fn is_comment(self) -> bool {
        matches!(self, SyntaxKind::SingleLineCommentTrivia | SyntaxKind::MultiLineCommentTrivia)
    }

    /// Whether this kind is produced by the lexer as a token.
    pub fn is_token(self) -> bool {
        !self.is_trivia() && self < SyntaxKind::CompilationUnit
    }

    pub fn is_statement(self) -> bool {
        self >= SyntaxKind::BlockStatement && self <= SyntaxKind::ExpressionStatement
    }

    pub fn is_expression(self) -> bool {
        self >= SyntaxKind::LiteralExpression && self <= SyntaxKind::PostfixExpression
    }

    /// `=` or one of the compound assignment operators.
    pub fn is_assignment_operator(self) -> bool {
        self == SyntaxKind::EqualsToken || self.is_compound_assignment()
    }

    pub fn is_compound_assignment(self) -> bool {
        self.compound_assignment_operator().is_some()
    }

    /// For `+=` and friends, the binary operator applied before the store.
    pub fn compound_assignment_operator(self) -> Option<SyntaxKind> {
        match self {
            SyntaxKind::PlusEqualsToken => Some(SyntaxKind::PlusToken),
            SyntaxKind::MinusEqualsToken => Some(SyntaxKind::MinusToken),
            SyntaxKind::StarEqualsToken => Some(SyntaxKind::StarToken),
            SyntaxKind::SlashEqualsToken => Some(SyntaxKind::SlashToken),
            SyntaxKind::PercentEqualsToken => Some(SyntaxKind::PercentToken),
            SyntaxKind::AmpersandEqualsToken => Some(SyntaxKind::AmpersandToken),
            SyntaxKind::PipeEqualsToken => Some(SyntaxKind::PipeToken),
            SyntaxKind::HatEqualsToken => Some(SyntaxKind::HatToken),
            _ => None,
        }
    }

    /// `++` and `--`.
    pub fn is_increment_or_decrement(self) -> bool {
        matches!(self, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
    }

    /// Get the text of a keyword kind.
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::BreakKeyword => Some("break"),
            SyntaxKind::ContinueKeyword => Some("continue"),
            SyntaxKind::DoKeyword => Some("do"),
            SyntaxKind::ElseKeyword => Some("else"),
            SyntaxKind::FalseKeyword => Some("false"),
            SyntaxKind::ForKeyword => Some("for"),
            SyntaxKind::FunctionKeyword => Some("function"),
            SyntaxKind::GotoKeyword => Some("goto"),
            SyntaxKind::IfKeyword => Some("if"),
            SyntaxKind::LetKeyword => Some("let"),
            SyntaxKind::ReturnKeyword => Some("return"),
            SyntaxKind::ToKeyword => Some("to"),
            SyntaxKind::TrueKeyword => Some("true"),
            SyntaxKind::VarKeyword => Some("var"),
            SyntaxKind::WhileKeyword => Some("while"),
            _ => None,
        }
    }

    /// Look up a keyword from its text.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "break" => Some(SyntaxKind::BreakKeyword),
            "continue" => Some(SyntaxKind::ContinueKeyword),
            "do" => Some(SyntaxKind::DoKeyword),
            "else" => Some(SyntaxKind::ElseKeyword),
            "false" => Some(SyntaxKind::FalseKeyword),
            "for" => Some(SyntaxKind::ForKeyword),
            "function" => Some(SyntaxKind::FunctionKeyword),
            "goto" => Some(SyntaxKind::GotoKeyword),
            "if" => Some(SyntaxKind::IfKeyword),
            "let" => Some(SyntaxKind::LetKeyword),
            "return" => Some(SyntaxKind::ReturnKeyword),
            "to" => Some(SyntaxKind::ToKeyword),
            "true" => Some(SyntaxKind::TrueKeyword),
            "var" => Some(SyntaxKind::VarKeyword),
            "while" => Some(SyntaxKind::WhileKeyword),
            _ => None,
        }
    }

    /// Get the text of a punctuation kind.
    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::PlusToken => Some("+"),
            SyntaxKind::PlusEqualsToken => Some("+="),
            SyntaxKind::PlusPlusToken => Some("++"),
            SyntaxKind::MinusToken => Some("-"),
            SyntaxKind::MinusEqualsToken => Some("-="),
            SyntaxKind::MinusMinusToken => Some("--"),
            SyntaxKind::StarToken => Some("*"),
            SyntaxKind::StarEqualsToken => Some("*="),
            SyntaxKind::SlashToken => Some("/"),
            SyntaxKind::SlashEqualsToken => Some("/="),
            SyntaxKind::PercentToken => Some("%"),
            SyntaxKind::PercentEqualsToken => Some("%="),
            SyntaxKind::BangToken => Some("!"),
            SyntaxKind::BangEqualsToken => Some("!="),
            SyntaxKind::TildeToken => Some("~"),
            SyntaxKind::AmpersandToken => Some("&"),
            SyntaxKind::AmpersandEqualsToken => Some("&="),
            SyntaxKind::AmpersandAmpersandToken => Some("&&"),
            SyntaxKind::PipeToken => Some("|"),
            SyntaxKind::PipeEqualsToken => Some("|="),
            SyntaxKind::PipePipeToken => Some("||"),
            SyntaxKind::HatToken => Some("^"),
            SyntaxKind::HatEqualsToken => Some("^="),
            SyntaxKind::EqualsToken => Some("="),
            SyntaxKind::EqualsEqualsToken => Some("=="),
            SyntaxKind::LessToken => Some("<"),
            SyntaxKind::LessOrEqualsToken => Some("<="),
            SyntaxKind::GreaterToken => Some(">"),
            SyntaxKind::GreaterOrEqualsToken => Some(">="),
            SyntaxKind::OpenParenthesisToken => Some("("),
            SyntaxKind::CloseParenthesisToken => Some(")"),
            SyntaxKind::OpenBraceToken => Some("{"),
            SyntaxKind::CloseBraceToken => Some("}"),
            SyntaxKind::ColonToken => Some(":"),
            SyntaxKind::CommaToken => Some(","),
            _ => None,
        }
    }

    /// The fixed source text of a keyword or punctuation kind.
    pub fn fixed_text(self) -> Option<&'static str> {
        self.keyword_text().or_else(|| self.punctuation_text())
    }

    /// How a token of this kind is named in "unexpected token" diagnostics.
    pub fn describe(self) -> &'static str {
        if let Some(text) = self.fixed_text() {
            return text;
        }
        match self {
            SyntaxKind::IdentifierToken => "identifier",
            SyntaxKind::NumberToken => "number",
            SyntaxKind::StringToken => "string",
            SyntaxKind::EndOfFileToken => "end of file",
            SyntaxKind::BadToken => "bad token",
            _ => "node",
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_complete_and_ordered() {
        for (index, kind) in SyntaxKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
        }
        assert_eq!(SyntaxKind::ALL.last(), Some(&SyntaxKind::PostfixExpression));
    }

    #[test]
    fn test_keyword_round_trip() {
        for kind in SyntaxKind::ALL.iter().copied().filter(|k| k.is_keyword()) {
            let text = kind.keyword_text().unwrap();
            assert_eq!(SyntaxKind::from_keyword(text), Some(kind));
        }
        assert_eq!(SyntaxKind::from_keyword("int"), None);
    }

    #[test]
    fn test_fixed_text_only_for_fixed_tokens() {
        for kind in SyntaxKind::ALL.iter().copied() {
            let fixed = kind.is_keyword() || kind.is_punctuation();
            assert_eq!(kind.fixed_text().is_some(), fixed, "{kind}");
        }
    }

    #[test]
    fn test_compound_assignment_operator() {
        assert_eq!(SyntaxKind::PlusEqualsToken.compound_assignment_operator(), Some(SyntaxKind::PlusToken));
        assert_eq!(SyntaxKind::HatEqualsToken.compound_assignment_operator(), Some(SyntaxKind::HatToken));
        assert!(SyntaxKind::EqualsToken.is_assignment_operator());
        assert!(!SyntaxKind::EqualsEqualsToken.is_assignment_operator());
    }

    #[test]
    fn test_kind_categories_are_disjoint() {
        for kind in SyntaxKind::ALL.iter().copied() {
            let categories = [kind.is_trivia(), kind.is_token(), kind.is_statement(), kind.is_expression()];
            assert!(categories.iter().filter(|&&c| c).count() <= 1, "{kind}");
        }
        assert!(SyntaxKind::IdentifierToken.is_token());
        assert!(SyntaxKind::ForStatement.is_statement());
        assert!(SyntaxKind::CallExpression.is_expression());
        assert!(!SyntaxKind::CompilationUnit.is_token());
    }

    #[test]
    fn test_describe() {
        assert_eq!(SyntaxKind::IdentifierToken.describe(), "identifier");
        assert_eq!(SyntaxKind::EndOfFileToken.describe(), "end of file");
        assert_eq!(SyntaxKind::CloseBraceToken.describe(), "}");
    }
}
