use crate::parser::ast::{DataType, Literal, Operator, SqlNode};

/// Constructors for the expression shapes the aggregate expansions emit.
///
/// Every helper builds the exact tree the parser produces for the same
/// canonical text, so an expanded statement survives a write/reparse cycle
/// unchanged.
pub struct ExprBuilder;

impl ExprBuilder {
    pub fn number(text: &str) -> SqlNode {
        SqlNode::Literal(Literal::exact(text))
    }

    pub fn null() -> SqlNode {
        SqlNode::Literal(Literal::Null)
    }

    pub fn to_double(expr: SqlNode) -> SqlNode {
        SqlNode::call(Operator::Cast, vec![expr, SqlNode::TypeSpec(DataType::Double)])
    }

    pub fn binary(operator: Operator, left: SqlNode, right: SqlNode) -> SqlNode {
        SqlNode::call(operator, vec![left, right])
    }

    pub fn times(left: SqlNode, right: SqlNode) -> SqlNode {
        Self::binary(Operator::Times, left, right)
    }

    pub fn divide(left: SqlNode, right: SqlNode) -> SqlNode {
        Self::binary(Operator::Divide, left, right)
    }

    pub fn minus(left: SqlNode, right: SqlNode) -> SqlNode {
        Self::binary(Operator::Minus, left, right)
    }

    /// `CASE WHEN when THEN then ELSE otherwise END`
    pub fn case(when: SqlNode, then: SqlNode, otherwise: SqlNode) -> SqlNode {
        SqlNode::call(Operator::Case, vec![when, then, otherwise])
    }

    pub fn power(base: SqlNode, exponent: &str) -> SqlNode {
        SqlNode::function("POWER", vec![base, Self::number(exponent)])
    }

    pub fn sum(operand: SqlNode) -> SqlNode {
        SqlNode::function("SUM", vec![operand])
    }

    pub fn count(operand: SqlNode) -> SqlNode {
        SqlNode::function("COUNT", vec![operand])
    }

    pub fn avg(operand: SqlNode) -> SqlNode {
        SqlNode::function("AVG", vec![operand])
    }

    /// `CASE WHEN c = 0 THEN NULL ELSE c END`
    pub fn guard_empty(count: SqlNode) -> SqlNode {
        let when = Self::binary(Operator::Eq, count.clone(), Self::number("0"));
        Self::case(when, Self::null(), count)
    }

    /// `CASE WHEN c = 1 THEN NULL ELSE c - 1 END`
    pub fn guard_single(count: SqlNode) -> SqlNode {
        let when = Self::binary(Operator::Eq, count.clone(), Self::number("1"));
        let otherwise = Self::minus(count, Self::number("1"));
        Self::case(when, Self::null(), otherwise)
    }

    /// `CASE WHEN e = 0.0 THEN NULL ELSE e END`
    pub fn guard_zero(expr: SqlNode) -> SqlNode {
        let when = Self::binary(Operator::Eq, expr.clone(), Self::number("0.0"));
        Self::case(when, Self::null(), expr)
    }
}

#[cfg(test)]
mod tests {
    use crate::{desugar::ExprBuilder, parser::ast::SqlNode};

    #[test]
    pub fn test_guards_text() {
        let count = ExprBuilder::count(SqlNode::identifier("x"));

        assert_eq!(
            ExprBuilder::guard_empty(count.clone()).to_string(),
            "CASE WHEN COUNT(\"x\") = 0 THEN NULL ELSE COUNT(\"x\") END"
        );
        assert_eq!(
            ExprBuilder::guard_single(count).to_string(),
            "CASE WHEN COUNT(\"x\") = 1 THEN NULL ELSE COUNT(\"x\") - 1 END"
        );
    }

    #[test]
    pub fn test_aggregates_and_power() {
        assert_eq!(ExprBuilder::sum(SqlNode::identifier("x")).to_string(), "SUM(\"x\")");
        assert_eq!(ExprBuilder::avg(SqlNode::identifier("x")).to_string(), "AVG(\"x\")");
        assert_eq!(
            ExprBuilder::power(ExprBuilder::to_double(SqlNode::identifier("x")), "0.5").to_string(),
            "POWER(CAST(\"x\" AS DOUBLE), 0.5)"
        );
    }
}
