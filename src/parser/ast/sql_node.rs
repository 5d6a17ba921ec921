use std::fmt::{self, Display};

use tracing::{debug, error};

use crate::parser::{
    ast::{Call, DataType, Identifier, JoinKind, Literal, Operator, OrderBy, Select},
    tokens::TokenKind,
    ParseError, ParserConfig, QueryParser, COMPARERS,
};

/// Node of a parsed SQL statement.
///
/// Parentheses in the source never produce nodes; the canonical writer
/// (`Display`) adds back the minimal set needed to reparse the same tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlNode {
    Identifier(Identifier),
    Literal(Literal),
    TypeSpec(DataType),
    Call(Call),
    Select(Box<Select>),
    OrderBy(Box<OrderBy>),
}

impl SqlNode {
    pub fn identifier(name: &str) -> Self {
        SqlNode::Identifier(Identifier::simple(name))
    }

    pub fn call(operator: Operator, operands: Vec<SqlNode>) -> Self {
        SqlNode::Call(Call::new(operator, operands))
    }

    pub fn function(name: &str, operands: Vec<SqlNode>) -> Self {
        SqlNode::Call(Call::function(name, operands))
    }

    /// `expr AS name`.
    pub fn alias(expr: SqlNode, name: &str) -> Self {
        SqlNode::call(Operator::As, vec![expr, SqlNode::identifier(name)])
    }

    /// Splits an `AS` call into its expression and alias.
    pub fn as_alias(&self) -> Option<(&SqlNode, &Identifier)> {
        match self {
            SqlNode::Call(Call { operator: Operator::As, operands, .. }) => match operands.as_slice() {
                [expr, SqlNode::Identifier(alias)] => Some((expr, alias)),
                _ => None,
            },
            _ => None,
        }
    }

    /// The node itself, or the expression under an `AS`.
    pub fn unaliased(&self) -> &SqlNode {
        match self.as_alias() {
            Some((expr, _)) => expr,
            None => self,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            SqlNode::Identifier(identifier) => Some(identifier),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            SqlNode::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&Select> {
        match self {
            SqlNode::Select(select) => Some(select),
            _ => None,
        }
    }

    pub fn join_kind(&self) -> Option<JoinKind> {
        match self {
            SqlNode::Call(Call { operator: Operator::Join(kind), .. }) => Some(*kind),
            _ => None,
        }
    }

    /// Whether the node is a query: `SELECT`, set operation or `ORDER BY` wrapper.
    pub fn is_query(&self) -> bool {
        match self {
            SqlNode::Select(_) | SqlNode::OrderBy(_) => true,
            SqlNode::Call(call) => matches!(call.operator, Operator::SetOp(_)),
            _ => false,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            SqlNode::Call(call) => call.operator.precedence(),
            SqlNode::Select(_) | SqlNode::OrderBy(_) => 0,
            SqlNode::Identifier(_) | SqlNode::Literal(_) | SqlNode::TypeSpec(_) => 10,
        }
    }

    /// Writes `node` as an operand, parenthesized when it is a query or binds
    /// weaker than `min_precedence`.
    pub fn fmt_operand(f: &mut fmt::Formatter<'_>, node: &SqlNode, min_precedence: u8) -> fmt::Result {
        if node.is_query() || node.precedence() < min_precedence {
            write!(f, "({})", node)
        } else {
            write!(f, "{}", node)
        }
    }

    /// Parses one complete statement, with an optional trailing `;`.
    pub fn parse_statement(text: &str, config: &ParserConfig) -> Result<SqlNode, ParseError> {
        let result = QueryParser::new(text, config).and_then(|mut parser| {
            let node = OrderBy::parse_query(&mut parser)?;
            parser.consume(&TokenKind::Semicolon);
            if !parser.eof() {
                return parser.error("Unexpected token").err();
            }
            Ok(node)
        });

        match &result {
            Ok(node) => debug!(sql = text, legacy = config.legacy_syntax, "parsed statement: {:?}", node),
            Err(err) => error!(sql = text, "failed to parse statement: {}", err),
        }
        result
    }

    /// Parses a standalone scalar expression.
    pub fn parse_expression(text: &str, config: &ParserConfig) -> Result<SqlNode, ParseError> {
        let mut parser = QueryParser::new(text, config)?;
        let node = Self::parse(&mut parser)?;
        if !parser.eof() {
            return parser.error("Unexpected token").err();
        }
        Ok(node)
    }

    pub fn parse(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        Self::parse_or(parser)
    }

    pub fn parse_list(parser: &mut QueryParser) -> Result<Vec<SqlNode>, ParseError> {
        let mut items = vec![Self::parse(parser)?];
        while parser.consume(&TokenKind::Comma) {
            items.push(Self::parse(parser)?);
        }
        Ok(items)
    }

    fn parse_or(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let mut left = Self::parse_and(parser)?;
        while parser.consume_keyword(&COMPARERS.or) {
            let right = Self::parse_and(parser)?;
            left = SqlNode::call(Operator::Or, vec![left, right]);
        }
        Ok(left)
    }

    fn parse_and(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let mut left = Self::parse_not(parser)?;
        while parser.consume_keyword(&COMPARERS.and) {
            let right = Self::parse_not(parser)?;
            left = SqlNode::call(Operator::And, vec![left, right]);
        }
        Ok(left)
    }

    fn parse_not(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        if parser.consume_keyword(&COMPARERS.not) {
            let operand = Self::parse_not(parser)?;
            return Ok(SqlNode::call(Operator::Not, vec![operand]));
        }
        Self::parse_predicate(parser)
    }

    fn comparison_operator(parser: &QueryParser) -> Result<Option<Operator>, ParseError> {
        let operator = match parser.current().kind {
            TokenKind::Eq => Operator::Eq,
            TokenKind::NotEq => Operator::NotEq,
            TokenKind::BangEq if parser.config.legacy_syntax => Operator::NotEq,
            TokenKind::BangEq => {
                return parser
                    .error("Bang equal '!=' is not allowed under the current SQL conformance level")
                    .err();
            },
            TokenKind::Lt => Operator::Lt,
            TokenKind::LtEq => Operator::LtEq,
            TokenKind::Gt => Operator::Gt,
            TokenKind::GtEq => Operator::GtEq,
            _ => return Ok(None),
        };
        Ok(Some(operator))
    }

    fn parse_predicate(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let left = Self::parse_additive(parser)?;

        if let Some(operator) = Self::comparison_operator(parser)? {
            parser.next();
            let right = Self::parse_additive(parser)?;
            return Ok(SqlNode::call(operator, vec![left, right]));
        }

        if parser.consume_keyword(&COMPARERS.is_not_null) {
            return Ok(SqlNode::call(Operator::IsNotNull, vec![left]));
        }
        if parser.consume_keyword(&COMPARERS.is_null) {
            return Ok(SqlNode::call(Operator::IsNull, vec![left]));
        }

        let negated = parser.keyword(&COMPARERS.not_like)
            || parser.keyword(&COMPARERS.not_in)
            || parser.keyword(&COMPARERS.not_between);
        if negated {
            parser.next();
        }

        if parser.consume_keyword(&COMPARERS.like) {
            let pattern = Self::parse_additive(parser)?;
            let operator = if negated { Operator::NotLike } else { Operator::Like };
            return Ok(SqlNode::call(operator, vec![left, pattern]));
        }

        if parser.consume_keyword(&COMPARERS.r#in) {
            let mut operands = vec![left];
            parser.expect(&TokenKind::LParen)?;
            if parser.query_ahead() {
                operands.push(OrderBy::parse_query(parser)?);
            } else {
                operands.extend(Self::parse_list(parser)?);
            }
            parser.expect(&TokenKind::RParen)?;
            let operator = if negated { Operator::NotIn } else { Operator::In };
            return Ok(SqlNode::call(operator, operands));
        }

        if parser.consume_keyword(&COMPARERS.between) {
            let low = Self::parse_additive(parser)?;
            parser.expect_keyword(&COMPARERS.and)?;
            let high = Self::parse_additive(parser)?;
            let operator = if negated { Operator::NotBetween } else { Operator::Between };
            return Ok(SqlNode::call(operator, vec![left, low, high]));
        }

        Ok(left)
    }

    fn parse_additive(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let mut left = Self::parse_multiplicative(parser)?;
        loop {
            let operator = match parser.current().kind {
                TokenKind::Plus => Operator::Plus,
                TokenKind::Minus => Operator::Minus,
                TokenKind::Concat => Operator::Concat,
                _ => return Ok(left),
            };
            parser.next();
            let right = Self::parse_multiplicative(parser)?;
            left = SqlNode::call(operator, vec![left, right]);
        }
    }

    fn parse_multiplicative(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let mut left = Self::parse_unary(parser)?;
        loop {
            let operator = match parser.current().kind {
                TokenKind::Star => Operator::Times,
                TokenKind::Slash => Operator::Divide,
                TokenKind::Percent => Operator::Mod,
                _ => return Ok(left),
            };
            parser.next();
            let right = Self::parse_unary(parser)?;
            left = SqlNode::call(operator, vec![left, right]);
        }
    }

    fn parse_unary(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        let operator = match parser.current().kind {
            TokenKind::Minus => Operator::UnaryMinus,
            TokenKind::Plus => Operator::UnaryPlus,
            _ => return Self::parse_primary(parser),
        };
        parser.next();
        let operand = Self::parse_unary(parser)?;
        Ok(SqlNode::call(operator, vec![operand]))
    }

    fn parse_primary(parser: &mut QueryParser) -> Result<SqlNode, ParseError> {
        if let Some(literal) = Literal::parse(parser)? {
            return Ok(SqlNode::Literal(literal));
        }

        if parser.check(&TokenKind::LParen) {
            parser.next();
            let node = if parser.query_ahead() {
                OrderBy::parse_query(parser)?
            } else {
                Self::parse(parser)?
            };
            parser.expect(&TokenKind::RParen)?;
            return Ok(node);
        }

        if parser.keyword(&COMPARERS.case) {
            return Ok(SqlNode::Call(Call::parse_case(parser)?));
        }
        if parser.keyword(&COMPARERS.cast) {
            return Ok(SqlNode::Call(Call::parse_cast(parser)?));
        }
        if parser.keyword(&COMPARERS.exists) {
            return Ok(SqlNode::Call(Call::parse_exists(parser)?));
        }

        let is_function = matches!(parser.current().kind, TokenKind::Word(_))
            && parser.peek(1).kind == TokenKind::LParen;
        if is_function {
            return Ok(SqlNode::Call(Call::parse_function(parser)?));
        }

        if matches!(parser.current().kind, TokenKind::Word(_) | TokenKind::QuotedIdent(_)) {
            return Ok(SqlNode::Identifier(Identifier::parse(parser)?));
        }

        if parser.eof() {
            return parser.error("Unexpected end of input").err();
        }
        parser.error("Unexpected token").err()
    }
}

impl Display for SqlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlNode::Identifier(identifier) => write!(f, "{}", identifier),
            SqlNode::Literal(literal) => write!(f, "{}", literal),
            SqlNode::TypeSpec(ty) => write!(f, "{}", ty),
            SqlNode::Call(call) => write!(f, "{}", call),
            SqlNode::Select(select) => write!(f, "{}", select),
            SqlNode::OrderBy(order_by) => write!(f, "{}", order_by),
        }
    }
}

impl TryFrom<&str> for SqlNode {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        SqlNode::parse_statement(value, &ParserConfig::default())
    }
}
