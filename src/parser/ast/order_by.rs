use std::fmt::{self, Display};

use crate::parser::{
    ast::{Literal, Operator, Select, SetOpKind, SqlNode},
    tokens::TokenKind,
    ParseError, QueryParser, COMPARERS,
};

/// Sort keys and row limits wrapped around a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub query: SqlNode,
    /// Sort keys, possibly wrapped in `DESC` / `NULLS FIRST` / `NULLS LAST` calls.
    pub order_list: Vec<SqlNode>,
    pub offset: Option<SqlNode>,
    pub fetch: Option<SqlNode>,
}

impl OrderBy {
    pub fn new(query: SqlNode, order_list: Vec<SqlNode>) -> Self {
        Self { query, order_list, offset: None, fetch: None }
    }

    /// Parses a query: a set expression followed by the optional
    /// `ORDER BY`, `LIMIT`, `OFFSET` and `FETCH` tail. The `OrderBy` wrapper is
    /// only produced when the tail is present.
    pub fn parse_query(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let query = Self::parse_set_expression(parser)?;

        let mut order_list = vec![];
        if parser.consume_keyword(&COMPARERS.order_by) {
            order_list.push(Self::parse_key(parser)?);
            while parser.consume(&TokenKind::Comma) {
                order_list.push(Self::parse_key(parser)?);
            }
        }

        let mut offset = None;
        let mut fetch = None;
        loop {
            if fetch.is_none() && parser.consume_keyword(&COMPARERS.limit) {
                fetch = Some(Self::parse_count(parser)?);
            } else if offset.is_none() && parser.consume_keyword(&COMPARERS.offset) {
                offset = Some(Self::parse_count(parser)?);
                if !parser.consume_keyword(&COMPARERS.rows) {
                    parser.consume_keyword(&COMPARERS.row);
                }
            } else if fetch.is_none() && parser.consume_keyword(&COMPARERS.fetch) {
                if !parser.consume_keyword(&COMPARERS.first) {
                    parser.expect_keyword(&COMPARERS.next)?;
                }
                fetch = Some(Self::parse_count(parser)?);
                if !parser.consume_keyword(&COMPARERS.rows) {
                    parser.expect_keyword(&COMPARERS.row)?;
                }
                parser.expect_keyword(&COMPARERS.only)?;
            } else {
                break;
            }
        }

        if order_list.is_empty() && offset.is_none() && fetch.is_none() {
            return Ok(query);
        }

        Ok(SqlNode::OrderBy(Box::new(Self { query, order_list, offset, fetch })))
    }

    fn set_op_kind(parser: &mut QueryParser) -> Option<SetOpKind> {
        let (all, distinct) = (&COMPARERS.all, &COMPARERS.distinct);
        let kind = if parser.consume_keyword(&COMPARERS.union) {
            (SetOpKind::Union, SetOpKind::UnionAll)
        } else if parser.consume_keyword(&COMPARERS.except) {
            (SetOpKind::Except, SetOpKind::ExceptAll)
        } else if parser.consume_keyword(&COMPARERS.intersect) {
            (SetOpKind::Intersect, SetOpKind::IntersectAll)
        } else {
            return None;
        };

        if parser.consume_keyword(all) {
            return Some(kind.1);
        }
        parser.consume_keyword(distinct);
        Some(kind.0)
    }

    fn parse_set_expression(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let mut left = Self::parse_term(parser)?;
        while let Some(kind) = Self::set_op_kind(parser) {
            let right = Self::parse_term(parser)?;
            left = SqlNode::call(Operator::SetOp(kind), vec![left, right]);
        }
        Ok(left)
    }

    fn parse_term(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        if parser.consume(&TokenKind::LParen) {
            let query = Self::parse_query(parser)?;
            parser.expect(&TokenKind::RParen)?;
            return Ok(query);
        }
        if parser.keyword(&COMPARERS.select) {
            return Ok(SqlNode::Select(Box::new(Select::parse(parser)?)));
        }
        parser.error("Expected SELECT").err()
    }

    fn parse_key(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let mut key = SqlNode::parse(parser)?;
        if parser.consume_keyword(&COMPARERS.desc) {
            key = SqlNode::call(Operator::Descending, vec![key]);
        } else {
            parser.consume_keyword(&COMPARERS.asc);
        }

        if parser.consume_keyword(&COMPARERS.nulls_first) {
            key = SqlNode::call(Operator::NullsFirst, vec![key]);
        } else if parser.consume_keyword(&COMPARERS.nulls_last) {
            key = SqlNode::call(Operator::NullsLast, vec![key]);
        }
        Ok(key)
    }

    fn parse_count(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let literal = match &parser.current().kind {
            TokenKind::Number(text) => Literal::from_number(text),
            _ => None,
        };
        match literal {
            Some(literal) => {
                parser.next();
                Ok(SqlNode::Literal(literal))
            },
            None => parser.error("Expected row count").err(),
        }
    }
}

impl Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            SqlNode::OrderBy(_) => write!(f, "({})", self.query)?,
            query => write!(f, "{}", query)?,
        }

        if !self.order_list.is_empty() {
            write!(f, " ORDER BY ")?;
            for (index, key) in self.order_list.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                SqlNode::fmt_operand(f, key, 0)?;
            }
        }
        if let Some(offset) = &self.offset {
            write!(f, " OFFSET {} ROWS", offset)?;
        }
        if let Some(fetch) = &self.fetch {
            write!(f, " FETCH NEXT {} ROWS ONLY", fetch)?;
        }
        Ok(())
    }
}
