use crate::{
    catalog::FieldInfo,
    parser::ast::{DataType, Literal, Operator},
    validator::ValidationError,
};

#[derive(Default)]
pub struct TypeInference;

impl TypeInference {
    pub fn infer_literal(literal: &Literal) -> FieldInfo {
        match literal {
            Literal::Null => FieldInfo::new(DataType::Null, true),
            Literal::Bool(_) => FieldInfo::new(DataType::Boolean, false),
            Literal::Exact(text) => {
                if text.contains('.') {
                    let scale = text.split('.').nth(1).map(str::len).unwrap_or(0) as u32;
                    let precision = text.chars().filter(char::is_ascii_digit).count() as u32;
                    FieldInfo::new(DataType::Decimal { precision, scale }, false)
                } else if text.parse::<i32>().is_ok() {
                    FieldInfo::new(DataType::Integer, false)
                } else {
                    FieldInfo::new(DataType::BigInt, false)
                }
            },
            Literal::Approx(_) => FieldInfo::new(DataType::Double, false),
            Literal::String(value) => FieldInfo::new(DataType::Char(value.chars().count() as u32), false),
        }
    }

    fn mismatch(operator: &Operator, operands: &[FieldInfo]) -> ValidationError {
        let name = match operator.infix() {
            Some(symbol) => symbol.to_string(),
            None => format!("{:?}", operator).to_uppercase(),
        };
        ValidationError::TypeMismatch { operator: name, types: operands.iter().map(|o| o.ty).collect() }
    }

    fn any_nullable(operands: &[FieldInfo]) -> bool {
        operands.iter().any(|o| o.nullable)
    }

    fn is_boolean(field: &FieldInfo) -> bool {
        matches!(field.ty, DataType::Boolean | DataType::Null)
    }

    /// Result type of a non-function operator given its typed operands.
    ///
    /// `IN` subqueries and `EXISTS` arrive here with the subquery's single
    /// column standing in for the query operand.
    pub fn infer_operator(operator: &Operator, operands: &[FieldInfo]) -> Result<FieldInfo, ValidationError> {
        let nullable = Self::any_nullable(operands);
        match operator {
            Operator::Or | Operator::And | Operator::Not => {
                if !operands.iter().all(Self::is_boolean) {
                    return Err(Self::mismatch(operator, operands));
                }
                Ok(FieldInfo::new(DataType::Boolean, nullable))
            },
            Operator::Eq | Operator::NotEq | Operator::Lt | Operator::LtEq | Operator::Gt | Operator::GtEq => {
                let [left, right] = operands else {
                    return Err(Self::mismatch(operator, operands));
                };
                if !DataType::comparable(left.ty, right.ty) {
                    return Err(Self::mismatch(operator, operands));
                }
                Ok(FieldInfo::new(DataType::Boolean, nullable))
            },
            Operator::IsNull | Operator::IsNotNull | Operator::Exists => Ok(FieldInfo::new(DataType::Boolean, false)),
            Operator::Like | Operator::NotLike => {
                if !operands.iter().all(|o| o.ty.is_character() || o.ty == DataType::Null) {
                    return Err(Self::mismatch(operator, operands));
                }
                Ok(FieldInfo::new(DataType::Boolean, nullable))
            },
            Operator::In | Operator::NotIn | Operator::Between | Operator::NotBetween => {
                let Some((value, rest)) = operands.split_first() else {
                    return Err(Self::mismatch(operator, operands));
                };
                if !rest.iter().all(|item| DataType::comparable(value.ty, item.ty)) {
                    return Err(Self::mismatch(operator, operands));
                }
                Ok(FieldInfo::new(DataType::Boolean, nullable))
            },
            Operator::Plus | Operator::Minus | Operator::Times | Operator::Divide | Operator::Mod => {
                let mut ty = DataType::Null;
                for operand in operands {
                    if !(operand.ty.is_numeric() || operand.ty == DataType::Null) {
                        return Err(Self::mismatch(operator, operands));
                    }
                    ty = DataType::promote(ty, operand.ty).ok_or_else(|| Self::mismatch(operator, operands))?;
                }
                Ok(FieldInfo::new(ty, nullable))
            },
            Operator::UnaryMinus | Operator::UnaryPlus => match operands {
                [operand] if operand.ty.is_numeric() || operand.ty == DataType::Null => Ok(*operand),
                _ => Err(Self::mismatch(operator, operands)),
            },
            Operator::Concat => {
                if !operands.iter().all(|o| o.ty.is_character() || o.ty == DataType::Null) {
                    return Err(Self::mismatch(operator, operands));
                }
                Ok(FieldInfo::new(DataType::Varchar(None), nullable))
            },
            Operator::Case => Self::infer_case(operator, operands),
            Operator::Cast => match operands {
                [value, target] => Ok(FieldInfo::new(target.ty, value.nullable)),
                _ => Err(Self::mismatch(operator, operands)),
            },
            Operator::As
            | Operator::Join(_)
            | Operator::SetOp(_)
            | Operator::Descending
            | Operator::NullsFirst
            | Operator::NullsLast
            | Operator::Function(_) => {
                Err(ValidationError::Other(format!("{:?} is not a scalar operator", operator)))
            },
        }
    }

    fn infer_case(operator: &Operator, operands: &[FieldInfo]) -> Result<FieldInfo, ValidationError> {
        let Some((otherwise, branches)) = operands.split_last() else {
            return Err(Self::mismatch(operator, operands));
        };

        let mut ty = otherwise.ty;
        let mut nullable = otherwise.nullable;
        for pair in branches.chunks(2) {
            let [when, then] = pair else {
                return Err(Self::mismatch(operator, operands));
            };
            if !Self::is_boolean(when) {
                return Err(Self::mismatch(operator, operands));
            }
            ty = DataType::promote(ty, then.ty).ok_or_else(|| Self::mismatch(operator, operands))?;
            nullable |= then.nullable;
        }
        Ok(FieldInfo::new(ty, nullable))
    }
}
