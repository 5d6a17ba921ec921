use std::collections::HashMap;

use crate::{
    catalog::FieldInfo,
    parser::ast::DataType,
    validator::ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Scalar,
    Aggregate,
}

/// Kind of argument a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Any,
    Numeric,
    Character,
}

impl ArgKind {
    fn accepts(&self, ty: DataType) -> bool {
        match self {
            ArgKind::Any => true,
            ArgKind::Numeric => ty.is_numeric() || ty == DataType::Null,
            ArgKind::Character => ty.is_character() || ty == DataType::Null,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ArgKind::Any => "any",
            ArgKind::Numeric => "numeric",
            ArgKind::Character => "character",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    Fixed(DataType),
    /// Type of the first argument.
    FirstArg,
    /// Least restrictive type of all arguments.
    Promoted,
    /// `SUM`: integers widen to `BIGINT`, everything else keeps its type.
    Sum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub kind: FunctionKind,
    pub min_args: usize,
    /// `None` for variadic functions.
    pub max_args: Option<usize>,
    pub args: ArgKind,
    pub return_type: ReturnType,
}

impl FunctionSignature {
    pub fn scalar(name: &str, min_args: usize, max_args: Option<usize>, args: ArgKind, return_type: ReturnType) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            kind: FunctionKind::Scalar,
            min_args,
            max_args,
            args,
            return_type,
        }
    }

    pub fn aggregate(name: &str, arity: usize, args: ArgKind, return_type: ReturnType) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            kind: FunctionKind::Aggregate,
            min_args: arity,
            max_args: Some(arity),
            args,
            return_type,
        }
    }

    fn expected_arity(&self) -> String {
        match self.max_args {
            Some(max) if max == self.min_args => format!("{} {} argument(s)", max, self.args.describe()),
            Some(max) => format!("{} to {} {} argument(s)", self.min_args, max, self.args.describe()),
            None => format!("at least {} {} argument(s)", self.min_args, self.args.describe()),
        }
    }

    /// Checks the argument list and computes the result type and nullability.
    ///
    /// `star` marks `COUNT(*)`, whose single operand carries no type.
    pub fn infer(&self, display_name: &str, args: &[FieldInfo], star: bool) -> Result<FieldInfo, ValidationError> {
        let mismatch = || ValidationError::FunctionArgMismatch {
            name: display_name.to_string(),
            expected: self.expected_arity(),
            got: args.iter().map(|a| a.ty).collect(),
        };

        let count = if star { 1 } else { args.len() };
        if count < self.min_args || self.max_args.is_some_and(|max| count > max) {
            return Err(mismatch());
        }
        if star && self.name != "count" {
            return Err(mismatch());
        }
        if args.iter().any(|arg| !self.args.accepts(arg.ty)) {
            return Err(mismatch());
        }

        let ty = match self.return_type {
            ReturnType::Fixed(ty) => ty,
            ReturnType::FirstArg => args.first().map(|a| a.ty).unwrap_or(DataType::Null),
            ReturnType::Promoted => {
                let mut ty = DataType::Null;
                for arg in args {
                    ty = DataType::promote(ty, arg.ty).ok_or_else(|| mismatch())?;
                }
                ty
            },
            ReturnType::Sum => match args.first().map(|a| a.ty) {
                Some(ty) if ty.is_integer() => DataType::BigInt,
                Some(ty) => ty,
                None => DataType::Null,
            },
        };

        let nullable = match (self.kind, self.name.as_str()) {
            (FunctionKind::Aggregate, "count") => false,
            (FunctionKind::Aggregate, _) => true,
            (_, "coalesce") => args.iter().all(|a| a.nullable),
            (_, "nullif") => true,
            _ => args.iter().any(|a| a.nullable),
        };

        Ok(FieldInfo::new(ty, nullable))
    }
}

/// Case-insensitive registry of the functions the validator accepts.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    by_name: HashMap<String, FunctionSignature>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self { by_name: HashMap::new() }
    }

    pub fn register(&mut self, signature: FunctionSignature) {
        self.by_name.insert(signature.name.to_ascii_lowercase(), signature);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.by_name.get(&name.to_ascii_lowercase())
    }

    pub fn is_aggregate(&self, name: &str) -> bool {
        self.get(name).is_some_and(|s| s.kind == FunctionKind::Aggregate)
    }

    pub fn list(&self) -> Vec<String> {
        let mut v: Vec<_> = self.by_name.keys().cloned().collect();
        v.sort();
        v
    }

    pub fn default_registry() -> Self {
        use ArgKind::*;
        use ReturnType::*;

        let mut registry = Self::new();
        registry.register(FunctionSignature::aggregate("count", 1, Any, Fixed(DataType::BigInt)));
        registry.register(FunctionSignature::aggregate("sum", 1, Numeric, Sum));
        registry.register(FunctionSignature::aggregate("avg", 1, Numeric, FirstArg));
        registry.register(FunctionSignature::aggregate("min", 1, Any, FirstArg));
        registry.register(FunctionSignature::aggregate("max", 1, Any, FirstArg));

        for name in ["stddev_pop", "stddev_samp", "stddev", "var_pop", "var_samp", "variance"] {
            registry.register(FunctionSignature::aggregate(name, 1, Numeric, Fixed(DataType::Double)));
        }
        for name in ["covar_pop", "covar_samp", "corr", "correlation"] {
            registry.register(FunctionSignature::aggregate(name, 2, Numeric, Fixed(DataType::Double)));
        }

        registry.register(FunctionSignature::scalar("power", 2, Some(2), Numeric, Fixed(DataType::Double)));
        registry.register(FunctionSignature::scalar("sqrt", 1, Some(1), Numeric, Fixed(DataType::Double)));
        registry.register(FunctionSignature::scalar("abs", 1, Some(1), Numeric, FirstArg));
        registry.register(FunctionSignature::scalar("mod", 2, Some(2), Numeric, Promoted));
        registry.register(FunctionSignature::scalar("round", 1, Some(2), Numeric, FirstArg));
        registry.register(FunctionSignature::scalar("floor", 1, Some(1), Numeric, FirstArg));
        registry.register(FunctionSignature::scalar("ceil", 1, Some(1), Numeric, FirstArg));
        registry.register(FunctionSignature::scalar("upper", 1, Some(1), Character, FirstArg));
        registry.register(FunctionSignature::scalar("lower", 1, Some(1), Character, FirstArg));
        registry.register(FunctionSignature::scalar("char_length", 1, Some(1), Character, Fixed(DataType::Integer)));
        registry.register(FunctionSignature::scalar("coalesce", 1, None, Any, Promoted));
        registry.register(FunctionSignature::scalar("nullif", 2, Some(2), Any, FirstArg));
        registry
    }
}
