//! Token types for the SQL lexer

/// Token categories produced by the lexer.
///
/// Keywords are not distinguished here: the grammar is small enough that the
/// parser matches keyword text case-insensitively on `Ident` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, keyword or quoted literal (single quotes kept in the
    /// text, double quotes stripped).
    Ident,
    /// Unsigned integer literal.
    Int,
    /// Punctuation or operator, including the merged `<=`, `<>` and `>=`.
    /// Characters outside the token alphabet also land here, one per
    /// token, so the parser sees them instead of the lexer dropping
    /// them.
    Punct,
    /// End of input.
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    pub fn eof(line: usize, column: usize) -> Self {
        Self::new(TokenKind::Eof, "", line, column)
    }

    /// Case-insensitive keyword match against an `Ident` token.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Ident && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Exact punctuation match.
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }
}
