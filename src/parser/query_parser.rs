use crate::parser::{
    tokens::{Lexer, Token, TokenKind},
    ParseError, ParserConfig, QueryComparers, WordComparer,
};

/// Token cursor shared by every `parse` function of the syntax tree.
#[derive(Debug)]
pub struct QueryParser {
    pub tokens: Vec<Token>,
    pub position: usize,
    pub text_v: Vec<char>,
    pub config: ParserConfig,
}

impl QueryParser {
    pub fn new(query: &str, config: &ParserConfig) -> Result<Self, ParseError> {
        let (tokens, text_v) = Lexer::new(query).tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            text_v,
            config: config.clone(),
        })
    }

    pub fn eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub fn current(&self) -> &Token {
        self.peek(0)
    }

    /// The lexer always closes the stream with `Eof`, so looking past the end
    /// keeps answering `Eof`.
    pub fn peek(&self, ahead: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.position + ahead).min(last)]
    }

    pub fn next(&mut self) {
        if !self.eof() {
            self.position += 1;
        }
    }

    pub fn jump(&mut self, ahead: usize) {
        for _ in 0..ahead {
            self.next();
        }
    }

    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.position.min(self.tokens.len())..]
    }

    pub fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    pub fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.next();
            return true;
        }
        false
    }

    pub fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.consume(kind) {
            return Ok(());
        }
        self.error(&format!("Expected '{}'", kind)).err()
    }

    pub fn keyword(&self, comparer: &WordComparer) -> bool {
        comparer.compare(self.remaining())
    }

    pub fn consume_keyword(&mut self, comparer: &WordComparer) -> bool {
        if self.keyword(comparer) {
            self.jump(comparer.length);
            return true;
        }
        false
    }

    pub fn expect_keyword(&mut self, comparer: &WordComparer) -> Result<(), ParseError> {
        if self.consume_keyword(comparer) {
            return Ok(());
        }
        self.error(&format!("Expected {}", comparer.phrase())).err()
    }

    /// True when the tokens ahead, after any run of `(`, open a `SELECT`.
    pub fn query_ahead(&self) -> bool {
        let mut ahead = 0;
        while self.peek(ahead).kind == TokenKind::LParen {
            ahead += 1;
        }
        self.peek(ahead).is_word("SELECT")
    }

    /// Reads one identifier segment: a non-reserved word, with the configured
    /// casing applied, or a quoted identifier as written.
    pub fn identifier_part(&mut self) -> Option<String> {
        let part = match &self.current().kind {
            TokenKind::Word(word) if !QueryComparers::is_reserved(word) => {
                self.config.unquoted_casing.apply(word)
            },
            TokenKind::QuotedIdent(name) => name.clone(),
            _ => return None,
        };
        self.next();
        Some(part)
    }

    pub fn error(&self, message: &str) -> ParseError {
        self.error_at(message, self.current())
    }

    pub fn error_at(&self, message: &str, token: &Token) -> ParseError {
        ParseError::new(message, token.start, token.end, &self.text_v)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{tokens::TokenKind, Casing, ParserConfig, QueryParser, COMPARERS};

    #[test]
    pub fn test_cursor_stays_on_eof() {
        let mut parser = QueryParser::new("a", &ParserConfig::default()).expect("Failed to lex");

        parser.next();
        parser.next();

        assert!(parser.eof());
        assert_eq!(parser.peek(5).kind, TokenKind::Eof);
    }

    #[test]
    pub fn test_keyword_phrase_consumed() {
        let mut parser = QueryParser::new("order by x", &ParserConfig::default()).expect("Failed to lex");

        assert!(parser.consume_keyword(&COMPARERS.order_by));
        assert_eq!(parser.identifier_part(), Some("x".to_string()));
    }

    #[test]
    pub fn test_identifier_part_applies_casing_to_unquoted_only() {
        let config = ParserConfig::default().with_unquoted_casing(Casing::ToUpper);
        let mut parser = QueryParser::new("abc \"abc\" from", &config).expect("Failed to lex");

        assert_eq!(parser.identifier_part(), Some("ABC".to_string()));
        assert_eq!(parser.identifier_part(), Some("abc".to_string()));
        assert_eq!(parser.identifier_part(), None);
    }

    #[test]
    pub fn test_query_ahead_skips_parentheses() {
        let parser = QueryParser::new("((SELECT 1))", &ParserConfig::default()).expect("Failed to lex");

        assert!(parser.query_ahead());
    }

    #[test]
    pub fn test_expect_reports_position() {
        let mut parser = QueryParser::new("a b", &ParserConfig::default()).expect("Failed to lex");
        parser.next();

        match parser.expect(&TokenKind::Comma) {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.message, "Expected ','");
                assert_eq!(err.start, 2);
                assert_eq!(err.text, "b");
            },
        }
    }
}
