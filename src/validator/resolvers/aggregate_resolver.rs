use crate::{
    parser::ast::{Operator, SqlNode},
    validator::{FunctionRegistry, ValidationError},
};

pub struct AggregateResolver;

impl AggregateResolver {
    /// Whether `expr` calls an aggregate outside of any nested subquery.
    pub fn contains_aggregate(expr: &SqlNode, functions: &FunctionRegistry) -> bool {
        match expr {
            SqlNode::Call(call) => {
                if call.operator.function_name().is_some_and(|name| functions.is_aggregate(name)) {
                    return true;
                }
                if matches!(call.operator, Operator::SetOp(_)) {
                    return false;
                }
                call.operands.iter().any(|operand| Self::contains_aggregate(operand, functions))
            },
            _ => false,
        }
    }

    /// Checks that every column reference of `expr` outside an aggregate is
    /// covered by a `GROUP BY` expression.
    pub fn check_grouped(expr: &SqlNode, group_exprs: &[SqlNode], functions: &FunctionRegistry) -> Result<(), ValidationError> {
        if group_exprs.contains(expr) {
            return Ok(());
        }

        match expr {
            SqlNode::Identifier(identifier) => Err(ValidationError::NotGrouped(identifier.qualified_name())),
            SqlNode::Literal(_) | SqlNode::TypeSpec(_) | SqlNode::Select(_) | SqlNode::OrderBy(_) => Ok(()),
            SqlNode::Call(call) => {
                if call.operator.function_name().is_some_and(|name| functions.is_aggregate(name)) {
                    return Ok(());
                }
                if matches!(call.operator, Operator::SetOp(_) | Operator::Exists) {
                    return Ok(());
                }
                for operand in &call.operands {
                    if operand.is_query() {
                        continue;
                    }
                    Self::check_grouped(operand, group_exprs, functions)?;
                }
                Ok(())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::{ast::SqlNode, ParserConfig},
        validator::{AggregateResolver, FunctionRegistry, ValidationError},
    };

    fn expr(text: &str) -> SqlNode {
        SqlNode::parse_expression(text, &ParserConfig::default()).expect("Failed to parse expression")
    }

    #[test]
    pub fn test_contains_aggregate() {
        let functions = FunctionRegistry::default_registry();

        assert!(AggregateResolver::contains_aggregate(&expr("1 + SUM(a)"), &functions));
        assert!(!AggregateResolver::contains_aggregate(&expr("power(a, 2)"), &functions));
        assert!(!AggregateResolver::contains_aggregate(&expr("a IN (SELECT max(b) FROM t)"), &functions));
    }

    #[test]
    pub fn test_check_grouped() {
        let functions = FunctionRegistry::default_registry();
        let group = vec![expr("a"), expr("b + 1")];

        assert!(AggregateResolver::check_grouped(&expr("a * 2"), &group, &functions).is_ok());
        assert!(AggregateResolver::check_grouped(&expr("(b + 1) * count(c)"), &group, &functions).is_ok());
        assert_eq!(
            AggregateResolver::check_grouped(&expr("b"), &group, &functions),
            Err(ValidationError::NotGrouped("b".into()))
        );
    }
}
