use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Comma,
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    /// Whether the join carries an `ON` condition.
    pub fn has_condition(&self) -> bool {
        !matches!(self, JoinKind::Comma | JoinKind::Cross)
    }
}

impl Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKind::Comma => write!(f, ","),
            JoinKind::Inner => write!(f, "INNER JOIN"),
            JoinKind::Left => write!(f, "LEFT JOIN"),
            JoinKind::Right => write!(f, "RIGHT JOIN"),
            JoinKind::Full => write!(f, "FULL JOIN"),
            JoinKind::Cross => write!(f, "CROSS JOIN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOpKind {
    Union,
    UnionAll,
    Except,
    ExceptAll,
    Intersect,
    IntersectAll,
}

impl Display for SetOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOpKind::Union => write!(f, "UNION"),
            SetOpKind::UnionAll => write!(f, "UNION ALL"),
            SetOpKind::Except => write!(f, "EXCEPT"),
            SetOpKind::ExceptAll => write!(f, "EXCEPT ALL"),
            SetOpKind::Intersect => write!(f, "INTERSECT"),
            SetOpKind::IntersectAll => write!(f, "INTERSECT ALL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `expr AS alias`; operands are the expression and the alias identifier.
    As,
    Or,
    And,
    Not,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    IsNull,
    IsNotNull,
    Like,
    NotLike,
    /// Operands are the tested value followed by the list items, or by a
    /// single subquery.
    In,
    NotIn,
    Between,
    NotBetween,
    Exists,
    Plus,
    Minus,
    Times,
    Divide,
    Mod,
    Concat,
    UnaryMinus,
    UnaryPlus,
    /// Searched CASE; operands are WHEN/THEN pairs followed by the ELSE value.
    Case,
    /// Operands are the value and a `TypeSpec`.
    Cast,
    /// Operands are left, right and, for conditional joins, the `ON` predicate.
    Join(JoinKind),
    SetOp(SetOpKind),
    Descending,
    NullsFirst,
    NullsLast,
    /// Named function, name kept as written.
    Function(String),
}

impl Operator {
    /// Binding strength used by the writer to decide where parentheses go.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::As
            | Operator::Join(_)
            | Operator::SetOp(_)
            | Operator::Descending
            | Operator::NullsFirst
            | Operator::NullsLast => 0,
            Operator::Or => 1,
            Operator::And => 2,
            Operator::Not => 3,
            Operator::Eq
            | Operator::NotEq
            | Operator::Lt
            | Operator::LtEq
            | Operator::Gt
            | Operator::GtEq
            | Operator::IsNull
            | Operator::IsNotNull
            | Operator::Like
            | Operator::NotLike
            | Operator::In
            | Operator::NotIn
            | Operator::Between
            | Operator::NotBetween => 4,
            Operator::Plus | Operator::Minus | Operator::Concat => 5,
            Operator::Times | Operator::Divide | Operator::Mod => 6,
            Operator::UnaryMinus | Operator::UnaryPlus => 7,
            Operator::Exists | Operator::Case | Operator::Cast | Operator::Function(_) => 10,
        }
    }

    pub fn function_name(&self) -> Option<&str> {
        match self {
            Operator::Function(name) => Some(name),
            _ => None,
        }
    }

    /// Symbol or keyword of an infix operator, `None` for other shapes.
    pub fn infix(&self) -> Option<&'static str> {
        let symbol = match self {
            Operator::Or => "OR",
            Operator::And => "AND",
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Times => "*",
            Operator::Divide => "/",
            Operator::Mod => "%",
            Operator::Concat => "||",
            _ => return None,
        };
        Some(symbol)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::NotEq | Operator::Lt | Operator::LtEq | Operator::Gt | Operator::GtEq
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Operator::Plus | Operator::Minus | Operator::Times | Operator::Divide | Operator::Mod)
    }

    pub fn is_sort_postfix(&self) -> bool {
        matches!(self, Operator::Descending | Operator::NullsFirst | Operator::NullsLast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(Operator::Or.precedence() < Operator::And.precedence());
        assert!(Operator::And.precedence() < Operator::Eq.precedence());
        assert!(Operator::Plus.precedence() < Operator::Times.precedence());
        assert!(Operator::Times.precedence() < Operator::UnaryMinus.precedence());
    }

    #[test]
    fn test_function_name() {
        assert_eq!(Operator::Function("stddev_pop".into()).function_name(), Some("stddev_pop"));
        assert_eq!(Operator::Plus.function_name(), None);
    }
}
