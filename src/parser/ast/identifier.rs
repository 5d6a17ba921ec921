use std::fmt::{self, Display};

use crate::parser::{tokens::TokenKind, ParseError, QueryParser};

pub const STAR: &str = "*";

/// A possibly-qualified name: `a`, `t.a`, `*`, `t.*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub names: Vec<String>,
}

impl Identifier {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn simple(name: &str) -> Self {
        Self { names: vec![name.to_string()] }
    }

    pub fn qualified(relation: &str, name: &str) -> Self {
        Self { names: vec![relation.to_string(), name.to_string()] }
    }

    pub fn star() -> Self {
        Self::simple(STAR)
    }

    pub fn is_star(&self) -> bool {
        self.names.last().is_some_and(|name| name == STAR)
    }

    pub fn is_simple(&self) -> bool {
        self.names.len() == 1
    }

    pub fn last(&self) -> &str {
        self.names.last().map(String::as_str).unwrap_or_default()
    }

    /// Segments joined with `.`, unquoted.
    pub fn qualified_name(&self) -> String {
        self.names.join(".")
    }

    /// Key under which a select-list alias is stored and looked up.
    pub fn alias_key(&self) -> String {
        self.qualified_name().to_lowercase()
    }

    pub fn parse(parser: &mut QueryParser) -> Result<Self, ParseError> {
        let Some(first) = parser.identifier_part() else {
            return parser.error("Expected identifier").err();
        };

        let mut names = vec![first];
        while parser.check(&TokenKind::Dot) {
            parser.next();
            if parser.consume(&TokenKind::Star) {
                names.push(STAR.to_string());
                break;
            }
            match parser.identifier_part() {
                Some(part) => names.push(part),
                None => return parser.error("Expected identifier after '.'").err(),
            }
        }

        Ok(Self { names })
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, name) in self.names.iter().enumerate() {
            if index > 0 {
                write!(f, ".")?;
            }
            if name == STAR {
                write!(f, "{}", STAR)?;
            } else {
                write!(f, "\"{}\"", name.replace('"', "\"\""))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::Identifier, ParserConfig, QueryParser};

    fn parse(text: &str) -> Identifier {
        let mut parser = QueryParser::new(text, &ParserConfig::default()).expect("Failed to lex");
        Identifier::parse(&mut parser).expect("Failed to parse identifier")
    }

    #[test]
    pub fn test_identifier_qualified() {
        let result = parse("tableA.columnA");

        assert_eq!(result.names, vec!["tableA", "columnA"]);
        assert_eq!(result.qualified_name(), "tableA.columnA");
        assert_eq!(result.alias_key(), "tablea.columna");
        assert!(!result.is_star());
    }

    #[test]
    pub fn test_identifier_qualified_star() {
        let result = parse("t.*");

        assert!(result.is_star());
        assert_eq!(result.to_string(), "\"t\".*");
    }

    #[test]
    pub fn test_identifier_quoted_segments() {
        let result = parse("\"My Table\".col");

        assert_eq!(result.names, vec!["My Table", "col"]);
        assert_eq!(result.to_string(), "\"My Table\".\"col\"");
    }

    #[test]
    pub fn test_identifier_reserved_word_rejected() {
        let mut parser = QueryParser::new("from", &ParserConfig::default()).expect("Failed to lex");

        match Identifier::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.message, "Expected identifier"),
        }
    }
}
