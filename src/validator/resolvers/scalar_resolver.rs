use crate::{
    catalog::FieldInfo,
    parser::ast::{Call, DataType, Operator, SqlNode},
    validator::{ColumnResolver, QueryResolver, TypeInference, ValidationContext, ValidationError},
};

pub struct ScalarResolver;

impl ScalarResolver {
    /// Resolves a scalar expression: qualifies its columns, validates nested
    /// subqueries and derives its type.
    pub fn resolve(expr: &SqlNode, ctx: &ValidationContext) -> Result<(SqlNode, FieldInfo), ValidationError> {
        match expr {
            SqlNode::Identifier(identifier) => {
                let (qualified, info) = ColumnResolver::qualify_column(identifier, ctx)?;
                Ok((SqlNode::Identifier(qualified), info))
            },
            SqlNode::Literal(literal) => Ok((expr.clone(), TypeInference::infer_literal(literal))),
            SqlNode::TypeSpec(ty) => Ok((expr.clone(), FieldInfo::new(*ty, false))),
            node if node.is_query() => Self::resolve_scalar_subquery(node, ctx),
            SqlNode::Call(call) => match &call.operator {
                Operator::Function(name) => Self::resolve_function(name, call, ctx),
                Operator::Exists => Self::resolve_exists(call, ctx),
                Operator::In | Operator::NotIn if call.operands.get(1).is_some_and(SqlNode::is_query) => {
                    Self::resolve_in_subquery(call, ctx)
                },
                Operator::As => Err(ValidationError::Other(format!("Alias is not allowed here: {}", expr))),
                operator => {
                    let (operands, types) = Self::resolve_operands(&call.operands, ctx)?;
                    let info = TypeInference::infer_operator(operator, &types)?;
                    Ok((SqlNode::Call(Call::new(operator.clone(), operands).with_distinct(call.distinct)), info))
                },
            },
            _ => Err(ValidationError::Other(format!("Unsupported expression: {}", expr))),
        }
    }

    fn resolve_operands(
        operands: &[SqlNode],
        ctx: &ValidationContext,
    ) -> Result<(Vec<SqlNode>, Vec<FieldInfo>), ValidationError> {
        let mut nodes = Vec::with_capacity(operands.len());
        let mut types = Vec::with_capacity(operands.len());
        for operand in operands {
            let (node, info) = Self::resolve(operand, ctx)?;
            nodes.push(node);
            types.push(info);
        }
        Ok((nodes, types))
    }

    fn resolve_function(name: &str, call: &Call, ctx: &ValidationContext) -> Result<(SqlNode, FieldInfo), ValidationError> {
        let signature = ctx
            .functions
            .get(name)
            .ok_or_else(|| ValidationError::FunctionNotFound(name.to_string()))?;

        let star = matches!(call.operands.as_slice(), [SqlNode::Identifier(id)] if id.is_star() && id.is_simple());
        let (operands, types) = if star {
            (call.operands.clone(), vec![])
        } else {
            Self::resolve_operands(&call.operands, ctx)?
        };

        let info = signature.infer(name, &types, star)?;
        let resolved = Call::new(call.operator.clone(), operands).with_distinct(call.distinct);
        Ok((SqlNode::Call(resolved), info))
    }

    fn resolve_scalar_subquery(query: &SqlNode, ctx: &ValidationContext) -> Result<(SqlNode, FieldInfo), ValidationError> {
        let validated = QueryResolver::validate(query, ctx)?;
        match validated.columns.as_slice() {
            [column] => Ok((validated.node, FieldInfo::new(column.ty, true))),
            columns => Err(ValidationError::Other(format!(
                "Scalar subquery must return exactly one column, got {}",
                columns.len()
            ))),
        }
    }

    fn resolve_exists(call: &Call, ctx: &ValidationContext) -> Result<(SqlNode, FieldInfo), ValidationError> {
        let query = call
            .operand(0)
            .ok_or_else(|| ValidationError::Other("EXISTS requires a subquery".into()))?;
        let validated = QueryResolver::validate(query, ctx)?;
        Ok((
            SqlNode::call(Operator::Exists, vec![validated.node]),
            FieldInfo::new(DataType::Boolean, false),
        ))
    }

    fn resolve_in_subquery(call: &Call, ctx: &ValidationContext) -> Result<(SqlNode, FieldInfo), ValidationError> {
        let (Some(value), Some(query)) = (call.operand(0), call.operand(1)) else {
            return Err(ValidationError::Other("IN requires a value and a subquery".into()));
        };

        let (value, value_info) = Self::resolve(value, ctx)?;
        let validated = QueryResolver::validate(query, ctx)?;
        let [column] = validated.columns.as_slice() else {
            return Err(ValidationError::Other(format!(
                "Subquery in IN must return exactly one column, got {}",
                validated.columns.len()
            )));
        };

        let info = TypeInference::infer_operator(&call.operator, &[value_info, column.field_info()])?;
        Ok((SqlNode::call(call.operator.clone(), vec![value, validated.node]), info))
    }
}
