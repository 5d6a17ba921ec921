use tracing::debug;

use crate::{
    parser::ast::{Select, SqlNode},
    validator::ValidatedQuery,
};

pub struct ProjectionFilter;

impl ProjectionFilter {
    /// Whether `node` is a bare `SELECT *` or `SELECT t.*` over a single
    /// table, possibly under an `ORDER BY` wrapper.
    pub fn is_select_star(node: &SqlNode) -> bool {
        let select = match node {
            SqlNode::Select(select) => select.as_ref(),
            SqlNode::OrderBy(order_by) => match &order_by.query {
                SqlNode::Select(select) => select.as_ref(),
                _ => return false,
            },
            _ => return false,
        };
        Self::is_star_over_table(select)
    }

    fn is_star_over_table(select: &Select) -> bool {
        let from_is_table = match &select.from {
            Some(from) => matches!(from.unaliased(), SqlNode::Identifier(_)),
            None => true,
        };

        match select.select_list.as_slice() {
            [SqlNode::Identifier(identifier)] => from_is_table && identifier.is_star(),
            _ => false,
        }
    }

    /// Drops the projection entries (and output columns) whose qualified
    /// name ends with `suffix`, ignoring case. Returns how many were dropped.
    pub fn hide_system_columns(query: &mut ValidatedQuery, suffix: &str) -> usize {
        let suffix = suffix.to_lowercase();
        let Some(select) = query.projection_select_mut() else {
            return 0;
        };

        let hidden: Vec<bool> = select
            .select_list
            .iter()
            .map(|item| match item {
                SqlNode::Identifier(identifier) => identifier.qualified_name().to_lowercase().ends_with(&suffix),
                _ => false,
            })
            .collect();

        let mut flags = hidden.iter();
        select.select_list.retain(|_| !flags.next().copied().unwrap_or(false));
        let mut flags = hidden.iter();
        query.columns.retain(|_| !flags.next().copied().unwrap_or(false));

        let removed = hidden.iter().filter(|hidden| **hidden).count();
        if removed > 0 {
            debug!(removed, suffix = %suffix, "hid system columns from SELECT *");
        }
        removed
    }
}
