use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    compiler::CompiledQuery,
    executor::{create_accumulator, is_primitive_aggregate, json_f},
    parser::ast::{Call, DataType, Literal, Operator, SqlNode},
};

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("{function} got non numeric argument {value}")]
    NotNumeric { function: String, value: Value },
    #[error("cannot evaluate {0}")]
    Unsupported(String),
}

/// Reference evaluator for validated single-table statements, over rows
/// keyed by qualified column name (`"emp.sal"`).
pub struct Eval;

impl Eval {
    /// Runs a compiled `SELECT`: filters by `WHERE`, then either projects
    /// every row or computes one row per group.
    pub fn run(query: &CompiledQuery, rows: &[Row]) -> Result<Vec<Row>, EvalError> {
        let Some(select) = query.node.as_select() else {
            return Err(EvalError::Unsupported(query.node.to_string()));
        };
        let names = query.column_names();

        let mut filtered = vec![];
        for row in rows {
            let keep = match &select.where_clause {
                Some(condition) => Self::eval_scalar(condition, row)? == Value::Bool(true),
                None => true,
            };
            if keep {
                filtered.push(row.clone());
            }
        }

        let aggregated = select.group_by.is_some() || select.select_list.iter().any(Self::has_aggregate);
        if !aggregated {
            return filtered
                .iter()
                .map(|row| {
                    let mut out = Row::new();
                    for (name, item) in names.iter().zip(&select.select_list) {
                        out.insert(name.to_string(), Self::eval_scalar(item, row)?);
                    }
                    Ok(out)
                })
                .collect();
        }

        let mut groups: IndexMap<String, Vec<Row>> = IndexMap::new();
        match &select.group_by {
            Some(keys) => {
                for row in filtered {
                    let key: Result<Vec<Value>, EvalError> = keys.iter().map(|k| Self::eval_scalar(k, &row)).collect();
                    groups.entry(Value::Array(key?).to_string()).or_default().push(row);
                }
            },
            None => {
                groups.insert(String::new(), filtered);
            },
        }

        let mut result = vec![];
        for group in groups.values() {
            let mut out = Row::new();
            for (name, item) in names.iter().zip(&select.select_list) {
                out.insert(name.to_string(), Self::eval_grouped(item, group)?);
            }
            result.push(out);
        }
        Ok(result)
    }

    fn has_aggregate(expr: &SqlNode) -> bool {
        match expr {
            SqlNode::Call(call) => {
                call.function_name().is_some_and(is_primitive_aggregate) || call.operands.iter().any(Self::has_aggregate)
            },
            _ => false,
        }
    }

    pub fn eval_scalar(expr: &SqlNode, row: &Row) -> Result<Value, EvalError> {
        match expr {
            SqlNode::Identifier(identifier) => Ok(row.get(&identifier.qualified_name()).cloned().unwrap_or(Value::Null)),
            SqlNode::Literal(literal) => Ok(Self::literal(literal)),
            // Target of a CAST, read back from the call itself.
            SqlNode::TypeSpec(_) => Ok(Value::Null),
            SqlNode::Call(call) => {
                let args = call
                    .operands
                    .iter()
                    .map(|operand| Self::eval_scalar(operand, row))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::apply(call, args)
            },
            other => Err(EvalError::Unsupported(other.to_string())),
        }
    }

    /// Evaluates `expr` once for a whole group. Aggregate calls consume all
    /// rows; plain columns take their value from the first row.
    pub fn eval_grouped(expr: &SqlNode, rows: &[Row]) -> Result<Value, EvalError> {
        match expr {
            SqlNode::Call(call) if call.function_name().is_some_and(is_primitive_aggregate) => {
                Self::aggregate(call, rows)
            },
            SqlNode::Call(call) => {
                let args = call
                    .operands
                    .iter()
                    .map(|operand| Self::eval_grouped(operand, rows))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::apply(call, args)
            },
            SqlNode::Identifier(_) => match rows.first() {
                Some(row) => Self::eval_scalar(expr, row),
                None => Ok(Value::Null),
            },
            other => Self::eval_scalar(other, &Row::new()),
        }
    }

    fn aggregate(call: &Call, rows: &[Row]) -> Result<Value, EvalError> {
        let name = call.function_name().unwrap_or_default();
        let mut acc = create_accumulator(name, call.distinct).ok_or_else(|| EvalError::Unsupported(call.to_string()))?;

        let star = matches!(call.operand(0), Some(SqlNode::Identifier(identifier)) if identifier.is_star());
        for row in rows {
            let arg = match call.operand(0) {
                Some(_) if star => Value::Bool(true),
                Some(operand) => Self::eval_scalar(operand, row)?,
                None => return Err(EvalError::Unsupported(call.to_string())),
            };
            acc.update(&arg)?;
        }
        Ok(acc.finalize())
    }

    fn literal(literal: &Literal) -> Value {
        match literal {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Approx(f) => json_f(f.into_inner()),
            Literal::Exact(text) => match text.parse::<i64>() {
                Ok(i) => Value::from(i),
                Err(_) => text.parse::<f64>().map(json_f).unwrap_or(Value::Null),
            },
        }
    }

    fn apply(call: &Call, args: Vec<Value>) -> Result<Value, EvalError> {
        let unsupported = || EvalError::Unsupported(call.to_string());

        match (&call.operator, args.as_slice()) {
            (Operator::As, [value, ..]) => Ok(value.clone()),
            (Operator::And, [a, b]) => Ok(Self::and(a, b)),
            (Operator::Or, [a, b]) => Ok(Self::not(&Self::and(&Self::not(a), &Self::not(b)))),
            (Operator::Not, [a]) => Ok(Self::not(a)),
            (Operator::IsNull, [a]) => Ok(Value::Bool(a.is_null())),
            (Operator::IsNotNull, [a]) => Ok(Value::Bool(!a.is_null())),
            (op, [a, b]) if op.is_comparison() => Ok(Self::compare(op, a, b)),
            (Operator::Plus | Operator::Minus | Operator::Times | Operator::Divide, [a, b]) => {
                Self::arithmetic(&call.operator, a, b)
            },
            (Operator::UnaryMinus, [a]) => Self::arithmetic(&Operator::Minus, &Value::from(0), a),
            (Operator::UnaryPlus, [a]) => Ok(a.clone()),
            (Operator::Cast, [value, _]) => Self::cast(value, call.operand(1)),
            (Operator::Case, [branches @ .., otherwise]) => {
                for pair in branches.chunks(2) {
                    if let [when, then] = pair {
                        if *when == Value::Bool(true) {
                            return Ok(then.clone());
                        }
                    }
                }
                Ok(otherwise.clone())
            },
            (Operator::Function(name), [base, exponent]) if name.eq_ignore_ascii_case("power") => {
                match (base.as_f64(), exponent.as_f64()) {
                    (Some(b), Some(e)) => Ok(json_f(b.powf(e))),
                    _ => Ok(Value::Null),
                }
            },
            _ => Err(unsupported()),
        }
    }

    fn not(a: &Value) -> Value {
        match a {
            Value::Bool(b) => Value::Bool(!b),
            _ => Value::Null,
        }
    }

    fn and(a: &Value, b: &Value) -> Value {
        match (a, b) {
            (Value::Bool(false), _) | (_, Value::Bool(false)) => Value::Bool(false),
            (Value::Bool(true), Value::Bool(true)) => Value::Bool(true),
            _ => Value::Null,
        }
    }

    fn compare(op: &Operator, a: &Value, b: &Value) -> Value {
        let ordering = match (a, b) {
            (Value::Number(x), Value::Number(y)) => x.as_f64().zip(y.as_f64()).and_then(|(x, y)| x.partial_cmp(&y)),
            (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
            (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
            _ => None,
        };
        let Some(ordering) = ordering else {
            return Value::Null;
        };

        Value::Bool(match op {
            Operator::Eq => ordering.is_eq(),
            Operator::NotEq => ordering.is_ne(),
            Operator::Lt => ordering.is_lt(),
            Operator::LtEq => ordering.is_le(),
            Operator::Gt => ordering.is_gt(),
            Operator::GtEq => ordering.is_ge(),
            _ => return Value::Null,
        })
    }

    fn arithmetic(op: &Operator, a: &Value, b: &Value) -> Result<Value, EvalError> {
        if a.is_null() || b.is_null() {
            return Ok(Value::Null);
        }

        if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
            return Ok(match op {
                Operator::Plus => Value::from(x + y),
                Operator::Minus => Value::from(x - y),
                Operator::Times => Value::from(x * y),
                _ if y == 0 => Value::Null,
                _ => Value::from(x / y),
            });
        }

        let x = a.as_f64().ok_or_else(|| EvalError::NotNumeric { function: format!("{:?}", op), value: a.clone() })?;
        let y = b.as_f64().ok_or_else(|| EvalError::NotNumeric { function: format!("{:?}", op), value: b.clone() })?;
        Ok(match op {
            Operator::Plus => json_f(x + y),
            Operator::Minus => json_f(x - y),
            Operator::Times => json_f(x * y),
            _ if y == 0.0 => Value::Null,
            _ => json_f(x / y),
        })
    }

    fn cast(value: &Value, target: Option<&SqlNode>) -> Result<Value, EvalError> {
        match (value, target) {
            (Value::Null, _) => Ok(Value::Null),
            (_, Some(SqlNode::TypeSpec(DataType::Double | DataType::Real))) => {
                Ok(value.as_f64().map(json_f).unwrap_or(Value::Null))
            },
            (_, Some(SqlNode::TypeSpec(ty))) if ty.is_integer() => {
                Ok(value.as_f64().map(|f| Value::from(f.trunc() as i64)).unwrap_or(Value::Null))
            },
            _ => Err(EvalError::Unsupported(format!("CAST({})", value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::{
        executor::{Eval, Row},
        parser::{ast::SqlNode, ParserConfig},
    };

    fn expr(text: &str) -> SqlNode {
        SqlNode::parse_expression(text, &ParserConfig::default()).expect("Failed to parse expression")
    }

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_scalar_arithmetic_and_null() {
        let r = row(json!({ "t.a": 7, "t.b": 2, "t.c": null }));

        assert_eq!(Eval::eval_scalar(&expr("t.a / t.b"), &r), Ok(json!(3)));
        assert_eq!(Eval::eval_scalar(&expr("CAST(t.a AS DOUBLE) / t.b"), &r), Ok(json!(3.5)));
        assert_eq!(Eval::eval_scalar(&expr("t.a + t.c"), &r), Ok(Value::Null));
        assert_eq!(Eval::eval_scalar(&expr("t.a / 0"), &r), Ok(Value::Null));
        assert_eq!(Eval::eval_scalar(&expr("-t.b * 1.5"), &r), Ok(json!(-3.0)));
    }

    #[test]
    pub fn test_three_valued_logic() {
        let r = row(json!({ "t.a": 1, "t.c": null }));

        assert_eq!(Eval::eval_scalar(&expr("t.a = 1 AND t.c = 1"), &r), Ok(Value::Null));
        assert_eq!(Eval::eval_scalar(&expr("t.a = 2 AND t.c = 1"), &r), Ok(json!(false)));
        assert_eq!(Eval::eval_scalar(&expr("t.a = 1 OR t.c = 1"), &r), Ok(json!(true)));
        assert_eq!(Eval::eval_scalar(&expr("t.c IS NULL"), &r), Ok(json!(true)));
    }

    #[test]
    pub fn test_case_and_power() {
        let r = row(json!({ "t.a": 0 }));

        assert_eq!(Eval::eval_scalar(&expr("CASE WHEN t.a = 0 THEN NULL ELSE t.a END"), &r), Ok(Value::Null));
        assert_eq!(Eval::eval_scalar(&expr("POWER(4, 0.5)"), &r), Ok(json!(2.0)));
    }

    #[test]
    pub fn test_grouped_expression() {
        let rows: Vec<Row> = [1, 2, 3, 4].iter().map(|v| row(json!({ "t.x": v }))).collect();

        assert_eq!(Eval::eval_grouped(&expr("SUM(t.x) * 2 + COUNT(*)"), &rows), Ok(json!(24)));
        assert_eq!(Eval::eval_grouped(&expr("AVG(t.x)"), &rows), Ok(json!(2.5)));
        assert_eq!(Eval::eval_grouped(&expr("SUM(t.x)"), &[]), Ok(Value::Null));
    }
}
