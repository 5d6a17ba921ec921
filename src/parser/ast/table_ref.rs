use crate::parser::{
    ast::{Identifier, JoinKind, Operator, OrderBy, Select, SqlNode},
    tokens::TokenKind,
    ParseError, QueryParser, COMPARERS,
};

/// Parser for the `FROM` clause: tables, derived tables and joins.
///
/// Comma joins bind weaker than keyword joins, so `a, b JOIN c` reads as
/// `a, (b JOIN c)`.
pub struct TableRef;

impl TableRef {
    pub fn parse(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let mut left = Self::parse_join_chain(parser)?;
        while parser.consume(&TokenKind::Comma) {
            let right = Self::parse_join_chain(parser)?;
            left = SqlNode::call(Operator::Join(JoinKind::Comma), vec![left, right]);
        }
        Ok(left)
    }

    fn join_kind(parser: &mut QueryParser) -> Option<JoinKind> {
        let candidates = [
            (&COMPARERS.inner_join, JoinKind::Inner),
            (&COMPARERS.left_outer_join, JoinKind::Left),
            (&COMPARERS.left_join, JoinKind::Left),
            (&COMPARERS.right_outer_join, JoinKind::Right),
            (&COMPARERS.right_join, JoinKind::Right),
            (&COMPARERS.full_outer_join, JoinKind::Full),
            (&COMPARERS.full_join, JoinKind::Full),
            (&COMPARERS.cross_join, JoinKind::Cross),
            (&COMPARERS.join, JoinKind::Inner),
        ];

        candidates
            .into_iter()
            .find(|(comparer, _)| parser.consume_keyword(comparer))
            .map(|(_, kind)| kind)
    }

    fn parse_join_chain(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let mut left = Self::parse_primary(parser)?;
        while let Some(kind) = Self::join_kind(parser) {
            let right = Self::parse_primary(parser)?;
            let mut operands = vec![left, right];
            if kind.has_condition() {
                parser.expect_keyword(&COMPARERS.on)?;
                operands.push(SqlNode::parse(parser)?);
            }
            left = SqlNode::call(Operator::Join(kind), operands);
        }
        Ok(left)
    }

    fn parse_primary(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let node = if parser.consume(&TokenKind::LParen) {
            let node = if parser.query_ahead() {
                OrderBy::parse_query(parser)?
            } else {
                Self::parse(parser)?
            };
            parser.expect(&TokenKind::RParen)?;
            node
        } else {
            SqlNode::Identifier(Identifier::parse(parser)?)
        };

        match Select::parse_alias(parser)? {
            Some(alias) => Ok(SqlNode::alias(node, &alias)),
            None => Ok(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        ast::{JoinKind, SqlNode, TableRef},
        ParserConfig, QueryParser,
    };

    fn parse(text: &str) -> SqlNode {
        let mut parser = QueryParser::new(text, &ParserConfig::default()).expect("Failed to lex");
        TableRef::parse(&mut parser).expect("Failed to parse table reference")
    }

    #[test]
    pub fn test_comma_binds_weaker_than_join() {
        let result = parse("a, b JOIN c ON b.x = c.x");

        assert_eq!(result.join_kind(), Some(JoinKind::Comma));
        assert_eq!(result.to_string(), "\"a\", (\"b\" INNER JOIN \"c\" ON \"b\".\"x\" = \"c\".\"x\")");
        assert_eq!(parse(&result.to_string()), result);
    }

    #[test]
    pub fn test_parenthesized_comma_under_join() {
        let result = parse("(a, b) CROSS JOIN c");

        assert_eq!(result.join_kind(), Some(JoinKind::Cross));
        assert_eq!(result.to_string(), "(\"a\", \"b\") CROSS JOIN \"c\"");
    }

    #[test]
    pub fn test_derived_table_with_alias() {
        let result = parse("(SELECT a FROM t) AS d");

        let (inner, alias) = result.as_alias().expect("Expected alias");
        assert!(inner.is_query());
        assert_eq!(alias.qualified_name(), "d");
        assert_eq!(result.to_string(), "(SELECT \"a\" FROM \"t\") AS \"d\"");
    }

    #[test]
    pub fn test_join_requires_on() {
        let mut parser = QueryParser::new("a JOIN b", &ParserConfig::default()).expect("Failed to lex");

        match TableRef::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.message, "Expected ON"),
        }
    }
}
