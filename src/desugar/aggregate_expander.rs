use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::{
    desugar::ExprBuilder,
    parser::ast::{Call, Operator, SqlNode},
};

/// Statistical aggregates rewritten into `SUM`, `COUNT` and `AVG` arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticalAggregate {
    StddevPop,
    StddevSamp,
    VarPop,
    VarSamp,
    CovarPop,
    CovarSamp,
    Corr,
}

static AGGREGATES: Lazy<HashMap<&'static str, StatisticalAggregate>> = Lazy::new(|| {
    use StatisticalAggregate::*;
    HashMap::from([
        ("stddev_pop", StddevPop),
        ("stddev_samp", StddevSamp),
        ("stddev", StddevSamp),
        ("var_pop", VarPop),
        ("var_samp", VarSamp),
        ("variance", VarSamp),
        ("covar_pop", CovarPop),
        ("covar_samp", CovarSamp),
        ("corr", Corr),
        ("correlation", Corr),
    ])
});

impl StatisticalAggregate {
    pub fn from_name(name: &str) -> Option<Self> {
        AGGREGATES.get(name.to_ascii_lowercase().as_str()).copied()
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::StddevPop | Self::StddevSamp | Self::VarPop | Self::VarSamp => 1,
            Self::CovarPop | Self::CovarSamp | Self::Corr => 2,
        }
    }
}

pub struct AggregateExpander;

impl AggregateExpander {
    /// Rewrites a statistical aggregate call, or returns `None` when the call
    /// is not one or has the wrong number of operands. `DISTINCT` calls have
    /// no primitive equivalent and are left as written.
    pub fn expand(call: &Call) -> Option<SqlNode> {
        let Operator::Function(name) = &call.operator else {
            return None;
        };
        if call.distinct {
            return None;
        }
        let aggregate = StatisticalAggregate::from_name(name)?;
        if call.operands.len() != aggregate.arity() {
            return None;
        }

        let x = || ExprBuilder::to_double(call.operands[0].clone());
        let expanded = match aggregate {
            StatisticalAggregate::StddevPop => ExprBuilder::power(Self::variance(x(), true), "0.5"),
            StatisticalAggregate::StddevSamp => ExprBuilder::power(Self::variance(x(), false), "0.5"),
            StatisticalAggregate::VarPop => Self::variance(x(), true),
            StatisticalAggregate::VarSamp => Self::variance(x(), false),
            StatisticalAggregate::CovarPop => {
                Self::covariance(x(), ExprBuilder::to_double(call.operands[1].clone()), true)
            },
            StatisticalAggregate::CovarSamp => {
                Self::covariance(x(), ExprBuilder::to_double(call.operands[1].clone()), false)
            },
            StatisticalAggregate::Corr => Self::correlation(&call.operands[0], &call.operands[1]),
        };

        debug!("Expanded {} to {}", call, expanded);
        Some(expanded)
    }

    /// `(SUM(x * x) - SUM(x) * SUM(x) / guard0(COUNT(x))) / guard(COUNT(x))`
    /// where the outer guard is `guard0` for the population form and
    /// `guard1` for the sample form.
    fn variance(x: SqlNode, population: bool) -> SqlNode {
        let sum_of_squares = ExprBuilder::sum(ExprBuilder::times(x.clone(), x.clone()));
        let sum = ExprBuilder::sum(x.clone());
        let count = ExprBuilder::count(x);

        let square_of_sum = ExprBuilder::times(sum.clone(), sum);
        let mean_square = ExprBuilder::divide(square_of_sum, ExprBuilder::guard_empty(count.clone()));
        let numerator = ExprBuilder::minus(sum_of_squares, mean_square);

        let denominator = if population {
            ExprBuilder::guard_empty(count)
        } else {
            ExprBuilder::guard_single(count)
        };
        ExprBuilder::divide(numerator, denominator)
    }

    fn covariance(x: SqlNode, y: SqlNode, population: bool) -> SqlNode {
        let avg_y = ExprBuilder::avg(y.clone());
        let product = ExprBuilder::times(x.clone(), y);

        if population {
            // AVG(x * y) - AVG(x) * AVG(y)
            let avg_product = ExprBuilder::avg(product);
            return ExprBuilder::minus(avg_product, ExprBuilder::times(ExprBuilder::avg(x), avg_y));
        }

        // (SUM(x * y) - SUM(x) * AVG(y)) / guard1(COUNT(x))
        let sum_product = ExprBuilder::sum(product);
        let numerator = ExprBuilder::minus(sum_product, ExprBuilder::times(ExprBuilder::sum(x.clone()), avg_y));
        ExprBuilder::divide(numerator, ExprBuilder::guard_single(ExprBuilder::count(x)))
    }

    /// `covar_pop(x, y) / guardzero(stddev_pop(x) * stddev_pop(y))`, with both
    /// standard deviations inlined.
    fn correlation(x: &SqlNode, y: &SqlNode) -> SqlNode {
        let x = ExprBuilder::to_double(x.clone());
        let y = ExprBuilder::to_double(y.clone());

        let covariance = Self::covariance(x.clone(), y.clone(), true);
        let stddev_x = ExprBuilder::power(Self::variance(x, true), "0.5");
        let stddev_y = ExprBuilder::power(Self::variance(y, true), "0.5");

        ExprBuilder::divide(covariance, ExprBuilder::guard_zero(ExprBuilder::times(stddev_x, stddev_y)))
    }
}
