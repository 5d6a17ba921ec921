use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    desugar::{AggregateExpander, Desugarer},
    parser::ast::{Call, Identifier, Operator, Select, SqlNode},
};

/// Select-list aliases declared so far in one `SELECT`, in declaration order.
#[derive(Debug, Default)]
pub struct AliasScope {
    /// map lower-cased alias -> expanded expression
    aliases: IndexMap<String, SqlNode>,
}

impl AliasScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `alias -> expr`. A repeated alias replaces the earlier entry.
    pub fn declare(&mut self, alias: &Identifier, expr: SqlNode) {
        if let Some(previous) = self.aliases.insert(alias.alias_key(), expr) {
            debug!("alias {} redeclared, replacing {}", alias, previous);
        }
    }

    /// The expression behind a bare alias reference. Qualified names and
    /// stars never match.
    pub fn lookup(&self, identifier: &Identifier) -> Option<&SqlNode> {
        if !identifier.is_simple() || identifier.is_star() {
            return None;
        }
        self.aliases.get(&identifier.alias_key())
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

pub struct AliasResolver;

impl AliasResolver {
    /// Rewrites one `SELECT` so that every alias reference in its select
    /// list, `GROUP BY`, `HAVING` and the given `ORDER BY` keys is replaced by
    /// the aliased expression, expanding statistical aggregates on the way.
    ///
    /// Returns the rewritten keys only when `order_list` is non-empty.
    pub fn resolve(select: &Select, order_list: Option<&[SqlNode]>) -> (Select, Option<Vec<SqlNode>>) {
        let mut scope = AliasScope::new();

        let from = select.from.as_ref().map(Self::desugar_subqueries);
        let where_clause = select.where_clause.as_ref().map(Self::desugar_subqueries);

        let mut select_list = Vec::with_capacity(select.select_list.len());
        for item in &select.select_list {
            match item.as_alias() {
                Some((expr, alias)) => {
                    let expanded = Self::expand(expr, &scope);
                    scope.declare(alias, expanded.clone());
                    select_list.push(SqlNode::call(Operator::As, vec![expanded, SqlNode::Identifier(alias.clone())]));
                },
                None if matches!(item, SqlNode::Call(_)) || item.is_query() => {
                    select_list.push(Self::expand(item, &scope));
                },
                None => select_list.push(item.clone()),
            }
        }

        let group_by = select.group_by.as_ref().map(|items| {
            items
                .iter()
                .map(|item| match item {
                    SqlNode::Identifier(identifier) => Self::substitute(identifier, &scope),
                    _ => Self::expand(item, &scope),
                })
                .collect()
        });

        let having = select.having.as_ref().map(|having| match having {
            SqlNode::Call(call) => SqlNode::Call(Self::expand_operands(call, &scope)),
            _ => having.clone(),
        });

        let order_list = order_list
            .filter(|keys| !keys.is_empty())
            .map(|keys| keys.iter().map(|key| Self::expand(key, &scope)).collect());

        let resolved = Select { distinct: select.distinct, select_list, from, where_clause, group_by, having };
        (resolved, order_list)
    }

    fn substitute(identifier: &Identifier, scope: &AliasScope) -> SqlNode {
        match scope.lookup(identifier) {
            Some(expr) => {
                debug!("substituted alias {} with {}", identifier, expr);
                expr.clone()
            },
            None => SqlNode::Identifier(identifier.clone()),
        }
    }

    /// Bottom-up rewrite: operands first, then the call itself.
    pub fn expand(node: &SqlNode, scope: &AliasScope) -> SqlNode {
        trace!("expand: {}", node);
        match node {
            SqlNode::Identifier(identifier) => Self::substitute(identifier, scope),
            SqlNode::Literal(_) | SqlNode::TypeSpec(_) => node.clone(),
            SqlNode::Select(_) | SqlNode::OrderBy(_) => Desugarer::desugar_query(node),
            SqlNode::Call(call) if matches!(call.operator, Operator::SetOp(_)) => Self::desugar_subqueries(node),
            SqlNode::Call(call) => {
                let call = Self::expand_operands(call, scope);
                match AggregateExpander::expand(&call) {
                    Some(expanded) => expanded,
                    None => SqlNode::Call(call),
                }
            },
        }
    }

    fn expand_operands(call: &Call, scope: &AliasScope) -> Call {
        let operands = call.operands.iter().map(|operand| Self::expand(operand, scope)).collect();
        Call::new(call.operator.clone(), operands).with_distinct(call.distinct)
    }

    /// Desugars the subqueries nested in a `FROM` or `WHERE` clause, each
    /// with its own alias scope, leaving everything else as written.
    pub fn desugar_subqueries(node: &SqlNode) -> SqlNode {
        match node {
            SqlNode::Select(_) | SqlNode::OrderBy(_) => Desugarer::desugar_query(node),
            SqlNode::Call(call) => {
                let operands = call.operands.iter().map(Self::desugar_subqueries).collect();
                SqlNode::Call(Call::new(call.operator.clone(), operands).with_distinct(call.distinct))
            },
            _ => node.clone(),
        }
    }
}
