//! SQL lexer - converts SQL text into tokens
//!
//! Lexing never fails. An unterminated quote consumes to end of input,
//! and a character outside the token alphabet is passed through as a
//! punctuation token: malformed fragments surface as parse errors
//! against the emitted tokens instead of as lexer errors.

use super::token::{Token, TokenKind};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Consumes the whole input, always ending with a single `Eof` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;

        let Some(ch) = self.current_char() else {
            return Token::eof(line, column);
        };

        match ch {
            '\'' | '"' => self.read_quoted(ch, line, column),
            '0'..='9' => self.read_number(line, column),
            'a'..='z' | 'A'..='Z' | '_' => self.read_identifier(line, column),
            '<' => {
                self.advance();
                // <= and <> are one token
                match self.current_char() {
                    Some('=') => {
                        self.advance();
                        Token::new(TokenKind::Punct, "<=", line, column)
                    }
                    Some('>') => {
                        self.advance();
                        Token::new(TokenKind::Punct, "<>", line, column)
                    }
                    _ => Token::new(TokenKind::Punct, "<", line, column),
                }
            }
            '>' => {
                self.advance();
                // >= is one token
                if self.current_char() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::Punct, ">=", line, column)
                } else {
                    Token::new(TokenKind::Punct, ">", line, column)
                }
            }
            _ => {
                // everything else, known punctuation or not, is a single
                // punct token; the parser rejects the ones it has no rule for
                self.advance();
                Token::new(TokenKind::Punct, ch.to_string(), line, column)
            }
        }
    }

    fn read_identifier(&mut self, line: usize, column: usize) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Ident, text, line, column)
    }

    fn read_number(&mut self, line: usize, column: usize) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Int, text, line, column)
    }

    /// Reads a quoted run as an identifier-like token.
    ///
    /// Single quotes stay in the token text so value typing can still tell
    /// the literal was quoted; double quotes are delimiters only and are
    /// stripped. An unterminated quote consumes to end of input.
    fn read_quoted(&mut self, quote: char, line: usize, column: usize) -> Token {
        self.advance();

        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if ch == quote {
                self.advance();
                break;
            }
            text.push(ch);
            self.advance();
        }

        if quote == '\'' {
            text = format!("'{}'", text);
        }

        Token::new(TokenKind::Ident, text, line, column)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.position += 1;
        }
    }
}
