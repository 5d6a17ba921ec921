use std::collections::HashSet;

use serde_json::Value;

use crate::executor::EvalError;

/// Per-group state of one aggregate call.
///
/// The evaluator feeds the evaluated argument of every row of the group to
/// `update`, then reads the result with `finalize`.
pub trait Accumulator {
    fn update(&mut self, arg: &Value) -> Result<(), EvalError>;

    fn finalize(&self) -> Value;
}

/// Creates the accumulator of a primitive aggregate, or `None` when `name`
/// is not one. `DISTINCT` wraps it in a value set.
pub fn create_accumulator(name: &str, distinct: bool) -> Option<Box<dyn Accumulator>> {
    let inner: Box<dyn Accumulator> = match name.to_ascii_lowercase().as_str() {
        "sum" => Box::new(SumAcc::Empty),
        "count" => Box::new(CountAcc { cnt: 0 }),
        "avg" => Box::new(AvgAcc { sum: 0.0, cnt: 0 }),
        "min" => Box::new(ExtremeAcc { best: None, max: false }),
        "max" => Box::new(ExtremeAcc { best: None, max: true }),
        _ => return None,
    };

    if distinct {
        Some(Box::new(DistinctAcc { seen: HashSet::new(), inner }))
    } else {
        Some(inner)
    }
}

pub fn is_primitive_aggregate(name: &str) -> bool {
    matches!(name.to_ascii_lowercase().as_str(), "sum" | "count" | "avg" | "min" | "max")
}

fn number(v: &Value, function: &str) -> Result<f64, EvalError> {
    v.as_f64().ok_or_else(|| EvalError::NotNumeric { function: function.to_string(), value: v.clone() })
}

// Integer sums stay integers until a float shows up.
enum SumAcc {
    Empty,
    Int(i64),
    Float(f64),
}

impl Accumulator for SumAcc {
    fn update(&mut self, arg: &Value) -> Result<(), EvalError> {
        if arg.is_null() {
            return Ok(());
        }

        let next = match (&*self, arg.as_i64()) {
            (SumAcc::Empty, Some(i)) => SumAcc::Int(i),
            (SumAcc::Int(acc), Some(i)) => SumAcc::Int(acc + i),
            (SumAcc::Empty, None) => SumAcc::Float(number(arg, "SUM")?),
            (SumAcc::Int(acc), None) => SumAcc::Float(*acc as f64 + number(arg, "SUM")?),
            (SumAcc::Float(acc), _) => SumAcc::Float(acc + number(arg, "SUM")?),
        };
        *self = next;
        Ok(())
    }

    fn finalize(&self) -> Value {
        match self {
            SumAcc::Empty => Value::Null,
            SumAcc::Int(i) => Value::from(*i),
            SumAcc::Float(f) => json_f(*f),
        }
    }
}

struct CountAcc {
    cnt: i64,
}

impl Accumulator for CountAcc {
    fn update(&mut self, arg: &Value) -> Result<(), EvalError> {
        if !arg.is_null() {
            self.cnt += 1;
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        Value::from(self.cnt)
    }
}

struct AvgAcc {
    sum: f64,
    cnt: i64,
}

impl Accumulator for AvgAcc {
    fn update(&mut self, arg: &Value) -> Result<(), EvalError> {
        if arg.is_null() {
            return Ok(());
        }
        self.sum += number(arg, "AVG")?;
        self.cnt += 1;
        Ok(())
    }

    fn finalize(&self) -> Value {
        if self.cnt == 0 {
            return Value::Null;
        }
        json_f(self.sum / self.cnt as f64)
    }
}

struct ExtremeAcc {
    best: Option<f64>,
    max: bool,
}

impl Accumulator for ExtremeAcc {
    fn update(&mut self, arg: &Value) -> Result<(), EvalError> {
        if arg.is_null() {
            return Ok(());
        }
        let v = number(arg, if self.max { "MAX" } else { "MIN" })?;
        self.best = Some(match self.best {
            Some(best) if self.max => best.max(v),
            Some(best) => best.min(v),
            None => v,
        });
        Ok(())
    }

    fn finalize(&self) -> Value {
        self.best.map(json_f).unwrap_or(Value::Null)
    }
}

struct DistinctAcc {
    seen: HashSet<String>,
    inner: Box<dyn Accumulator>,
}

impl Accumulator for DistinctAcc {
    fn update(&mut self, arg: &Value) -> Result<(), EvalError> {
        if arg.is_null() || !self.seen.insert(arg.to_string()) {
            return Ok(());
        }
        self.inner.update(arg)
    }

    fn finalize(&self) -> Value {
        self.inner.finalize()
    }
}

pub fn json_f(f: f64) -> Value {
    serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn run(name: &str, distinct: bool, values: &[Value]) -> Value {
        let mut acc = create_accumulator(name, distinct).expect("Failed to create accumulator");
        for v in values {
            acc.update(v).expect("Failed to update accumulator");
        }
        acc.finalize()
    }

    #[test]
    pub fn test_sum_keeps_integers() {
        assert_eq!(run("SUM", false, &[json!(1), json!(2), Value::Null]), json!(3));
        assert_eq!(run("sum", false, &[json!(1), json!(2.5)]), json!(3.5));
        assert_eq!(run("sum", false, &[Value::Null]), Value::Null);
    }

    #[test]
    pub fn test_count_and_avg_skip_nulls() {
        assert_eq!(run("count", false, &[json!(1), Value::Null, json!("a")]), json!(2));
        assert_eq!(run("avg", false, &[json!(1), Value::Null, json!(4)]), json!(2.5));
        assert_eq!(run("avg", false, &[]), Value::Null);
    }

    #[test]
    pub fn test_distinct() {
        let values = [json!(2), json!(2), json!(3), Value::Null];
        assert_eq!(run("count", true, &values), json!(2));
        assert_eq!(run("sum", true, &values), json!(5));
    }

    #[test]
    pub fn test_min_max_and_unknown() {
        assert_eq!(run("min", false, &[json!(3), json!(-1.5)]), json!(-1.5));
        assert_eq!(run("max", false, &[json!(3), json!(-1.5)]), json!(3.0));
        assert!(create_accumulator("median", false).is_none());
    }

    #[test]
    pub fn test_not_numeric() {
        let mut acc = create_accumulator("sum", false).expect("Failed to create accumulator");
        assert!(matches!(acc.update(&json!("x")), Err(EvalError::NotNumeric { .. })));
    }
}
