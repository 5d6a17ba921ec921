use std::fmt::{self, Display};

use crate::parser::{
    ast::{Identifier, JoinKind, Literal, Operator, OrderBy, SqlNode, DataType},
    tokens::TokenKind,
    ParseError, QueryParser, COMPARERS,
};

/// Application of an operator or named function to positional operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operator: Operator,
    pub operands: Vec<SqlNode>,
    /// `DISTINCT` quantifier of an aggregate call.
    pub distinct: bool,
}

impl Call {
    pub fn new(operator: Operator, operands: Vec<SqlNode>) -> Self {
        Self { operator, operands, distinct: false }
    }

    pub fn function(name: &str, operands: Vec<SqlNode>) -> Self {
        Self::new(Operator::Function(name.to_string()), operands)
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn operand(&self, index: usize) -> Option<&SqlNode> {
        self.operands.get(index)
    }

    pub fn function_name(&self) -> Option<&str> {
        self.operator.function_name()
    }

    pub fn parse_function(parser: &mut QueryParser) -> Result<Self, ParseError> {
        let Some(name) = parser.current().word().map(str::to_string) else {
            return parser.error("Expected function name").err();
        };
        parser.next();
        parser.expect(&TokenKind::LParen)?;

        let distinct = parser.consume_keyword(&COMPARERS.distinct);
        if !distinct {
            parser.consume_keyword(&COMPARERS.all);
        }

        let mut operands = vec![];
        if parser.consume(&TokenKind::RParen) {
            return Ok(Self::function(&name, operands).with_distinct(distinct));
        }

        if parser.consume(&TokenKind::Star) {
            operands.push(SqlNode::Identifier(Identifier::star()));
        } else {
            operands = SqlNode::parse_list(parser)?;
        }
        parser.expect(&TokenKind::RParen)?;

        Ok(Self::function(&name, operands).with_distinct(distinct))
    }

    /// Parses both CASE forms; the simple form is normalized to the searched
    /// form by comparing its operand in every WHEN branch.
    pub fn parse_case(parser: &mut QueryParser) -> Result<Self, ParseError> {
        parser.expect_keyword(&COMPARERS.case)?;

        let value = if parser.keyword(&COMPARERS.when) || parser.keyword(&COMPARERS.r#else) {
            None
        } else {
            Some(SqlNode::parse(parser)?)
        };

        let mut operands = vec![];
        while parser.consume_keyword(&COMPARERS.when) {
            let condition = SqlNode::parse(parser)?;
            let condition = match &value {
                Some(value) => SqlNode::call(Operator::Eq, vec![value.clone(), condition]),
                None => condition,
            };
            parser.expect_keyword(&COMPARERS.then)?;
            operands.push(condition);
            operands.push(SqlNode::parse(parser)?);
        }
        if operands.is_empty() {
            return parser.error("Expected WHEN").err();
        }

        let otherwise = if parser.consume_keyword(&COMPARERS.r#else) {
            SqlNode::parse(parser)?
        } else {
            SqlNode::Literal(Literal::Null)
        };
        operands.push(otherwise);
        parser.expect_keyword(&COMPARERS.end)?;

        Ok(Self::new(Operator::Case, operands))
    }

    pub fn parse_cast(parser: &mut QueryParser) -> Result<Self, ParseError> {
        parser.expect_keyword(&COMPARERS.cast)?;
        parser.expect(&TokenKind::LParen)?;
        let value = SqlNode::parse(parser)?;
        parser.expect_keyword(&COMPARERS.alias)?;
        let ty = DataType::parse(parser)?;
        parser.expect(&TokenKind::RParen)?;

        Ok(Self::new(Operator::Cast, vec![value, SqlNode::TypeSpec(ty)]))
    }

    pub fn parse_exists(parser: &mut QueryParser) -> Result<Self, ParseError> {
        parser.expect_keyword(&COMPARERS.exists)?;
        parser.expect(&TokenKind::LParen)?;
        let query = OrderBy::parse_query(parser)?;
        parser.expect(&TokenKind::RParen)?;

        Ok(Self::new(Operator::Exists, vec![query]))
    }

    fn fmt_join(&self, kind: JoinKind, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(left), Some(right)) = (self.operand(0), self.operand(1)) else {
            return Err(fmt::Error);
        };

        let left_needs_parens = kind != JoinKind::Comma && left.join_kind() == Some(JoinKind::Comma);
        if left_needs_parens {
            write!(f, "({})", left)?;
        } else {
            SqlNode::fmt_operand(f, left, 0)?;
        }

        match kind {
            JoinKind::Comma => write!(f, ", ")?,
            _ => write!(f, " {} ", kind)?,
        }

        if right.join_kind().is_some() {
            write!(f, "({})", right)?;
        } else {
            SqlNode::fmt_operand(f, right, 0)?;
        }

        if let Some(condition) = self.operand(2) {
            write!(f, " ON ")?;
            SqlNode::fmt_operand(f, condition, 0)?;
        }
        Ok(())
    }

    fn fmt_list(&self, f: &mut fmt::Formatter<'_>, items: &[SqlNode]) -> fmt::Result {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            SqlNode::fmt_operand(f, item, 0)?;
        }
        Ok(())
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precedence = self.operator.precedence();
        let first = self.operand(0).ok_or(fmt::Error);

        match &self.operator {
            Operator::As => {
                SqlNode::fmt_operand(f, first?, 1)?;
                write!(f, " AS ")?;
                SqlNode::fmt_operand(f, self.operand(1).ok_or(fmt::Error)?, 0)
            },
            Operator::Or
            | Operator::And
            | Operator::Plus
            | Operator::Minus
            | Operator::Times
            | Operator::Divide
            | Operator::Mod
            | Operator::Concat => {
                let symbol = self.operator.infix().ok_or(fmt::Error)?;
                SqlNode::fmt_operand(f, first?, precedence)?;
                write!(f, " {} ", symbol)?;
                SqlNode::fmt_operand(f, self.operand(1).ok_or(fmt::Error)?, precedence + 1)
            },
            Operator::Eq
            | Operator::NotEq
            | Operator::Lt
            | Operator::LtEq
            | Operator::Gt
            | Operator::GtEq
            | Operator::Like
            | Operator::NotLike => {
                let symbol = self.operator.infix().ok_or(fmt::Error)?;
                SqlNode::fmt_operand(f, first?, precedence + 1)?;
                write!(f, " {} ", symbol)?;
                SqlNode::fmt_operand(f, self.operand(1).ok_or(fmt::Error)?, precedence + 1)
            },
            Operator::Not => {
                write!(f, "NOT ")?;
                SqlNode::fmt_operand(f, first?, precedence)
            },
            Operator::IsNull | Operator::IsNotNull => {
                SqlNode::fmt_operand(f, first?, precedence + 1)?;
                match self.operator {
                    Operator::IsNull => write!(f, " IS NULL"),
                    _ => write!(f, " IS NOT NULL"),
                }
            },
            Operator::In | Operator::NotIn => {
                SqlNode::fmt_operand(f, first?, precedence + 1)?;
                let keyword = if self.operator == Operator::In { "IN" } else { "NOT IN" };
                write!(f, " {} (", keyword)?;
                match &self.operands[1..] {
                    [query] if query.is_query() => write!(f, "{}", query)?,
                    items => self.fmt_list(f, items)?,
                }
                write!(f, ")")
            },
            Operator::Between | Operator::NotBetween => {
                let keyword = if self.operator == Operator::Between { "BETWEEN" } else { "NOT BETWEEN" };
                SqlNode::fmt_operand(f, first?, precedence + 1)?;
                write!(f, " {} ", keyword)?;
                SqlNode::fmt_operand(f, self.operand(1).ok_or(fmt::Error)?, precedence + 1)?;
                write!(f, " AND ")?;
                SqlNode::fmt_operand(f, self.operand(2).ok_or(fmt::Error)?, precedence + 1)
            },
            Operator::Exists => write!(f, "EXISTS ({})", first?),
            Operator::UnaryMinus => {
                write!(f, "-")?;
                SqlNode::fmt_operand(f, first?, precedence + 1)
            },
            Operator::UnaryPlus => {
                write!(f, "+")?;
                SqlNode::fmt_operand(f, first?, precedence + 1)
            },
            Operator::Case => {
                write!(f, "CASE")?;
                let Some((otherwise, branches)) = self.operands.split_last() else {
                    return Err(fmt::Error);
                };
                for pair in branches.chunks(2) {
                    let [when, then] = pair else {
                        return Err(fmt::Error);
                    };
                    write!(f, " WHEN ")?;
                    SqlNode::fmt_operand(f, when, 0)?;
                    write!(f, " THEN ")?;
                    SqlNode::fmt_operand(f, then, 0)?;
                }
                write!(f, " ELSE ")?;
                SqlNode::fmt_operand(f, otherwise, 0)?;
                write!(f, " END")
            },
            Operator::Cast => {
                write!(f, "CAST(")?;
                SqlNode::fmt_operand(f, first?, 0)?;
                write!(f, " AS {})", self.operand(1).ok_or(fmt::Error)?)
            },
            Operator::Join(kind) => self.fmt_join(*kind, f),
            Operator::SetOp(kind) => {
                let left = first?;
                let right = self.operand(1).ok_or(fmt::Error)?;
                if matches!(left, SqlNode::OrderBy(_)) {
                    write!(f, "({})", left)?;
                } else {
                    write!(f, "{}", left)?;
                }
                write!(f, " {} ", kind)?;
                if matches!(right, SqlNode::Select(_)) {
                    write!(f, "{}", right)
                } else {
                    write!(f, "({})", right)
                }
            },
            Operator::Descending => {
                SqlNode::fmt_operand(f, first?, 0)?;
                write!(f, " DESC")
            },
            Operator::NullsFirst => {
                SqlNode::fmt_operand(f, first?, 0)?;
                write!(f, " NULLS FIRST")
            },
            Operator::NullsLast => {
                SqlNode::fmt_operand(f, first?, 0)?;
                write!(f, " NULLS LAST")
            },
            Operator::Function(name) => {
                write!(f, "{}(", name)?;
                if self.distinct {
                    write!(f, "DISTINCT ")?;
                }
                self.fmt_list(f, &self.operands)?;
                write!(f, ")")
            },
        }
    }
}
