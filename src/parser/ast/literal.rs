use ordered_float::NotNan;
use std::fmt::{self, Display};

use crate::parser::{tokens::TokenKind, ParseError, QueryParser, COMPARERS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Exact numeric, kept as written so `0.50` stays `0.50`.
    Exact(String),
    Approx(NotNan<f64>),
    String(String),
    Bool(bool),
    Null,
}

impl Literal {
    pub fn exact(text: &str) -> Self {
        Literal::Exact(text.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    /// The exact numeric as an integer, when it has no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Literal::Exact(text) => text.parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn from_number(text: &str) -> Option<Self> {
        if text.contains(['e', 'E']) {
            let value = text.parse::<f64>().ok()?;
            return NotNan::new(value).ok().map(Literal::Approx);
        }
        Some(Literal::Exact(text.to_string()))
    }

    pub fn parse(parser: &mut QueryParser) -> Result<Option<Self>, ParseError> {
        let literal = match &parser.current().kind {
            TokenKind::Number(text) => match Self::from_number(text) {
                Some(literal) => literal,
                None => return parser.error("Invalid numeric literal").err(),
            },
            TokenKind::Str(text) => Literal::String(text.clone()),
            _ if parser.keyword(&COMPARERS.b_true) => Literal::Bool(true),
            _ if parser.keyword(&COMPARERS.b_false) => Literal::Bool(false),
            _ if parser.keyword(&COMPARERS.null) => Literal::Null,
            _ => return Ok(None),
        };
        parser.next();
        Ok(Some(literal))
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Exact(text) => write!(f, "{}", text),
            Literal::Approx(value) => write!(f, "{:E}", value.into_inner()),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Bool(true) => write!(f, "TRUE"),
            Literal::Bool(false) => write!(f, "FALSE"),
            Literal::Null => write!(f, "NULL"),
        }
    }
}
