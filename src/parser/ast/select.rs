use std::fmt::{self, Display};

use crate::parser::{
    ast::{Identifier, SqlNode, TableRef},
    tokens::TokenKind,
    ParseError, QueryParser, COMPARERS,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Select {
    pub distinct: bool,
    pub select_list: Vec<SqlNode>,
    pub from: Option<SqlNode>,
    pub where_clause: Option<SqlNode>,
    pub group_by: Option<Vec<SqlNode>>,
    pub having: Option<SqlNode>,
}

impl Select {
    pub fn parse(parser: &mut QueryParser) -> Result<Self, ParseError> {
        parser.expect_keyword(&COMPARERS.select)?;

        let distinct = parser.consume_keyword(&COMPARERS.distinct);
        if !distinct {
            parser.consume_keyword(&COMPARERS.all);
        }

        let mut select_list = vec![Self::parse_item(parser)?];
        while parser.consume(&TokenKind::Comma) {
            select_list.push(Self::parse_item(parser)?);
        }

        let from = if parser.consume_keyword(&COMPARERS.from) {
            Some(TableRef::parse(parser)?)
        } else {
            None
        };

        let where_clause = if parser.consume_keyword(&COMPARERS.r#where) {
            Some(SqlNode::parse(parser)?)
        } else {
            None
        };

        let group_by = if parser.consume_keyword(&COMPARERS.group_by) {
            Some(SqlNode::parse_list(parser)?)
        } else {
            None
        };

        let having = if parser.consume_keyword(&COMPARERS.having) {
            Some(SqlNode::parse(parser)?)
        } else {
            None
        };

        Ok(Self {
            distinct,
            select_list,
            from,
            where_clause,
            group_by,
            having,
        })
    }

    fn parse_item(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        if parser.consume(&TokenKind::Star) {
            return Ok(SqlNode::Identifier(Identifier::star()));
        }

        let expr = SqlNode::parse(parser)?;
        match Self::parse_alias(parser)? {
            Some(alias) => Ok(SqlNode::alias(expr, &alias)),
            None => Ok(expr),
        }
    }

    /// `[AS] name` after a select item or a table reference.
    pub fn parse_alias(parser: &mut QueryParser) -> Result<Option<String>, ParseError> {
        if parser.consume_keyword(&COMPARERS.alias) {
            return match parser.identifier_part() {
                Some(alias) => Ok(Some(alias)),
                None => parser.error("Expected alias").err(),
            };
        }
        Ok(parser.identifier_part())
    }

    /// The select list with aliases stripped.
    pub fn projections(&self) -> impl Iterator<Item = &SqlNode> {
        self.select_list.iter().map(SqlNode::unaliased)
    }
}

impl Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        for (index, item) in self.select_list.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            SqlNode::fmt_operand(f, item, 0)?;
        }

        if let Some(from) = &self.from {
            write!(f, " FROM ")?;
            SqlNode::fmt_operand(f, from, 0)?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE ")?;
            SqlNode::fmt_operand(f, where_clause, 0)?;
        }
        if let Some(group_by) = &self.group_by {
            write!(f, " GROUP BY ")?;
            for (index, item) in group_by.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                SqlNode::fmt_operand(f, item, 0)?;
            }
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING ")?;
            SqlNode::fmt_operand(f, having, 0)?;
        }
        Ok(())
    }
}
