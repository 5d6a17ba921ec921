use crate::parser::{tokens::{Token, TokenKind}, ParseError};

/// Character cursor that splits statement text into tokens.
#[derive(Debug, Default)]
pub struct Lexer {
    pub position: usize,
    pub length: usize,
    pub text_v: Vec<char>,
}

impl Lexer {
    pub fn new(query: &str) -> Self {
        let text_v: Vec<char> = query.chars().collect();
        Self {
            position: 0,
            length: text_v.len(),
            text_v,
        }
    }

    pub fn eof(&self) -> bool {
        self.position >= self.length
    }

    pub fn current(&self) -> char {
        if self.position < self.length {
            return self.text_v[self.position];
        }

        '\0'
    }

    pub fn peek(&self, ahead: usize) -> char {
        self.text_v.get(self.position + ahead).copied().unwrap_or('\0')
    }

    pub fn next(&mut self) {
        self.position += 1;
    }

    pub fn jump(&mut self, ahead: usize) {
        self.position = (self.position + ahead).min(self.length);
    }

    pub fn text_from_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.length);
        self.text_v[start..end].iter().collect()
    }

    pub fn text_from_pivot(&self, pivot: usize) -> String {
        self.text_from_range(pivot, self.position)
    }

    fn error(&self, message: &str, pivot: usize) -> ParseError {
        ParseError::new(message, pivot, self.position.max(pivot + 1), &self.text_v)
    }

    /// Skips whitespace, `-- line` comments and `/* block */` comments.
    pub fn next_non_whitespace(&mut self) -> Result<(), ParseError> {
        loop {
            if self.current().is_whitespace() {
                self.next();
                continue;
            }
            if self.current() == '-' && self.peek(1) == '-' {
                while !self.eof() && self.current() != '\n' {
                    self.next();
                }
                continue;
            }
            if self.current() == '/' && self.peek(1) == '*' {
                let pivot = self.position;
                self.jump(2);
                loop {
                    if self.eof() {
                        return Err(self.error("Unterminated comment", pivot));
                    }
                    if self.current() == '*' && self.peek(1) == '/' {
                        self.jump(2);
                        break;
                    }
                    self.next();
                }
                continue;
            }
            return Ok(());
        }
    }

    pub fn tokenize(mut self) -> Result<(Vec<Token>, Vec<char>), ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.next_non_whitespace()?;
            if self.eof() {
                tokens.push(Token::new(TokenKind::Eof, self.length, self.length));
                break;
            }
            tokens.push(self.next_token()?);
        }
        Ok((tokens, self.text_v))
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let pivot = self.position;
        let current = self.current();

        if current.is_ascii_digit() {
            return self.number();
        }
        if current == '\'' {
            let text = self.delimited('\'', "Unterminated string literal")?;
            return Ok(Token::new(TokenKind::Str(text), pivot, self.position));
        }
        if current == '"' {
            let text = self.delimited('"', "Unterminated quoted identifier")?;
            if text.is_empty() {
                return Err(self.error("Empty quoted identifier", pivot));
            }
            return Ok(Token::new(TokenKind::QuotedIdent(text), pivot, self.position));
        }
        if Self::is_word_start(current) {
            while Self::is_word_part(self.current()) {
                self.next();
            }
            return Ok(Token::new(TokenKind::Word(self.text_from_pivot(pivot)), pivot, self.position));
        }

        let (kind, width) = match (current, self.peek(1)) {
            ('<', '>') => (TokenKind::NotEq, 2),
            ('<', '=') => (TokenKind::LtEq, 2),
            ('>', '=') => (TokenKind::GtEq, 2),
            ('!', '=') => (TokenKind::BangEq, 2),
            ('|', '|') => (TokenKind::Concat, 2),
            (',', _) => (TokenKind::Comma, 1),
            ('.', _) => (TokenKind::Dot, 1),
            ('(', _) => (TokenKind::LParen, 1),
            (')', _) => (TokenKind::RParen, 1),
            (';', _) => (TokenKind::Semicolon, 1),
            ('*', _) => (TokenKind::Star, 1),
            ('+', _) => (TokenKind::Plus, 1),
            ('-', _) => (TokenKind::Minus, 1),
            ('/', _) => (TokenKind::Slash, 1),
            ('%', _) => (TokenKind::Percent, 1),
            ('=', _) => (TokenKind::Eq, 1),
            ('<', _) => (TokenKind::Lt, 1),
            ('>', _) => (TokenKind::Gt, 1),
            _ => {
                self.next();
                return Err(self.error("Unexpected character", pivot));
            }
        };
        self.jump(width);
        Ok(Token::new(kind, pivot, self.position))
    }

    fn number(&mut self) -> Result<Token, ParseError> {
        let pivot = self.position;
        while self.current().is_ascii_digit() {
            self.next();
        }
        if self.current() == '.' && !Self::is_word_start(self.peek(1)) {
            self.next();
            while self.current().is_ascii_digit() {
                self.next();
            }
        }
        if matches!(self.current(), 'e' | 'E') {
            let sign = matches!(self.peek(1), '+' | '-');
            let digit_at = if sign { 2 } else { 1 };
            if !self.peek(digit_at).is_ascii_digit() {
                self.jump(digit_at);
                return Err(self.error("Invalid exponent in numeric literal", pivot));
            }
            self.jump(digit_at);
            while self.current().is_ascii_digit() {
                self.next();
            }
        }
        if Self::is_word_start(self.current()) {
            self.next();
            return Err(self.error("Invalid numeric literal", pivot));
        }
        Ok(Token::new(TokenKind::Number(self.text_from_pivot(pivot)), pivot, self.position))
    }

    /// Reads a `'`/`"` delimited run where a doubled delimiter is an escape.
    fn delimited(&mut self, delimiter: char, message: &str) -> Result<String, ParseError> {
        let pivot = self.position;
        self.next();
        let mut text = String::new();
        loop {
            if self.eof() {
                return Err(self.error(message, pivot));
            }
            let current = self.current();
            if current == delimiter {
                if self.peek(1) == delimiter {
                    text.push(delimiter);
                    self.jump(2);
                    continue;
                }
                self.next();
                return Ok(text);
            }
            text.push(current);
            self.next();
        }
    }

    fn is_word_start(ch: char) -> bool {
        ch.is_alphabetic() || ch == '_'
    }

    fn is_word_part(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '$'
    }
}
