use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::parser::{tokens::TokenKind, ParseError, QueryParser};

pub const DEFAULT_DECIMAL_PRECISION: u32 = 19;

/// SQL column and expression types known to the catalog and the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Type of a bare `NULL` literal.
    Null,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal { precision: u32, scale: u32 },
    Real,
    Double,
    Char(u32),
    /// `None` when declared without a length.
    Varchar(Option<u32>),
    Date,
    Timestamp,
}

impl DataType {
    pub fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::TinyInt | DataType::SmallInt | DataType::Integer | DataType::BigInt)
    }

    pub fn is_character(&self) -> bool {
        matches!(self, DataType::Char(_) | DataType::Varchar(_))
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, DataType::Date | DataType::Timestamp)
    }

    fn numeric_rank(&self) -> Option<u8> {
        match self {
            DataType::TinyInt => Some(1),
            DataType::SmallInt => Some(2),
            DataType::Integer => Some(3),
            DataType::BigInt => Some(4),
            DataType::Decimal { .. } => Some(5),
            DataType::Real => Some(6),
            DataType::Double => Some(7),
            _ => None,
        }
    }

    /// Least restrictive type able to hold values of both `a` and `b`.
    ///
    /// `Null` yields to the other side. Returns `None` when the two types have
    /// no common representative (e.g. `BOOLEAN` and `DATE`).
    pub fn promote(a: DataType, b: DataType) -> Option<DataType> {
        use DataType::*;
        if a == b {
            return Some(a);
        }
        match (a, b) {
            (Null, other) | (other, Null) => Some(other),
            (Decimal { precision: p1, scale: s1 }, Decimal { precision: p2, scale: s2 }) => {
                Some(Decimal { precision: p1.max(p2), scale: s1.max(s2) })
            },
            (x, y) if x.is_numeric() && y.is_numeric() => {
                if x.numeric_rank() >= y.numeric_rank() { Some(x) } else { Some(y) }
            },
            (x, y) if x.is_character() && y.is_character() => Some(Varchar(None)),
            (x, y) if x.is_datetime() && y.is_datetime() => Some(Timestamp),
            _ => None,
        }
    }

    /// Whether values of the two types can be compared with `=`, `<` and friends.
    pub fn comparable(a: DataType, b: DataType) -> bool {
        DataType::promote(a, b).is_some() || (a.is_character() && b.is_datetime()) || (a.is_datetime() && b.is_character())
    }

    pub fn parse(parser: &mut QueryParser) -> Result<Self, ParseError> {
        let Some(word) = parser.current().word().map(str::to_uppercase) else {
            return parser.error("Expected data type").err();
        };
        let start = parser.current().clone();
        parser.next();

        let ty = match word.as_str() {
            "BOOLEAN" => DataType::Boolean,
            "TINYINT" => DataType::TinyInt,
            "SMALLINT" => DataType::SmallInt,
            "INT" | "INTEGER" => DataType::Integer,
            "BIGINT" => DataType::BigInt,
            "DECIMAL" | "NUMERIC" | "DEC" => {
                let args = Self::parse_lengths(parser)?;
                match args.as_slice() {
                    [] => DataType::Decimal { precision: DEFAULT_DECIMAL_PRECISION, scale: 0 },
                    [precision] => DataType::Decimal { precision: *precision, scale: 0 },
                    [precision, scale] => DataType::Decimal { precision: *precision, scale: *scale },
                    _ => return parser.error_at("Too many arguments for DECIMAL", &start).err(),
                }
            },
            "REAL" => DataType::Real,
            "FLOAT" => DataType::Double,
            "DOUBLE" => {
                if parser.current().is_word("PRECISION") {
                    parser.next();
                }
                DataType::Double
            },
            "CHAR" | "CHARACTER" => match Self::parse_lengths(parser)?.as_slice() {
                [] => DataType::Char(1),
                [length] => DataType::Char(*length),
                _ => return parser.error_at("Too many arguments for CHAR", &start).err(),
            },
            "VARCHAR" => match Self::parse_lengths(parser)?.as_slice() {
                [] => DataType::Varchar(None),
                [length] => DataType::Varchar(Some(*length)),
                _ => return parser.error_at("Too many arguments for VARCHAR", &start).err(),
            },
            "DATE" => DataType::Date,
            "TIMESTAMP" => DataType::Timestamp,
            _ => return parser.error_at("Unknown data type", &start).err(),
        };

        Ok(ty)
    }

    fn parse_lengths(parser: &mut QueryParser) -> Result<Vec<u32>, ParseError> {
        let mut lengths = vec![];
        if !parser.consume(&TokenKind::LParen) {
            return Ok(lengths);
        }
        loop {
            let length = match &parser.current().kind {
                TokenKind::Number(text) => text.parse::<u32>().ok(),
                _ => None,
            };
            match length {
                Some(length) => lengths.push(length),
                None => return parser.error("Expected type length").err(),
            }
            parser.next();
            if !parser.consume(&TokenKind::Comma) {
                break;
            }
        }
        parser.expect(&TokenKind::RParen)?;
        Ok(lengths)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Null => write!(f, "NULL"),
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::TinyInt => write!(f, "TINYINT"),
            DataType::SmallInt => write!(f, "SMALLINT"),
            DataType::Integer => write!(f, "INTEGER"),
            DataType::BigInt => write!(f, "BIGINT"),
            DataType::Decimal { precision, scale } => write!(f, "DECIMAL({}, {})", precision, scale),
            DataType::Real => write!(f, "REAL"),
            DataType::Double => write!(f, "DOUBLE"),
            DataType::Char(length) => write!(f, "CHAR({})", length),
            DataType::Varchar(Some(length)) => write!(f, "VARCHAR({})", length),
            DataType::Varchar(None) => write!(f, "VARCHAR"),
            DataType::Date => write!(f, "DATE"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
        }
    }
}
