use tracing::debug;

use crate::{
    desugar::AliasResolver,
    parser::ast::{OrderBy, SqlNode},
};

pub struct Desugarer;

impl Desugarer {
    /// Entry point of the legacy rewrite. Without `legacy` the statement is
    /// returned untouched.
    pub fn desugar(node: SqlNode, legacy: bool) -> SqlNode {
        if !legacy {
            return node;
        }
        Self::desugar_query(&node)
    }

    /// Rewrites a `SELECT`, or an `ORDER BY` over one. Set operations and
    /// sort wrappers over them are copied unchanged.
    pub fn desugar_query(node: &SqlNode) -> SqlNode {
        match node {
            SqlNode::Select(select) => {
                debug!("desugar: before: {}", select);
                let (resolved, _) = AliasResolver::resolve(select, None);
                debug!("desugar: after: {}", resolved);
                SqlNode::Select(Box::new(resolved))
            },
            SqlNode::OrderBy(order_by) => match &order_by.query {
                SqlNode::Select(select) => {
                    debug!("desugar: before: {}", select);
                    let (resolved, keys) = AliasResolver::resolve(select, Some(order_by.order_list.as_slice()));
                    debug!("desugar: after: {}", resolved);

                    let query = SqlNode::Select(Box::new(resolved));
                    let rewritten = match keys {
                        Some(order_list) => OrderBy {
                            query,
                            order_list,
                            offset: order_by.offset.clone(),
                            fetch: order_by.fetch.clone(),
                        },
                        None => OrderBy { query, ..(**order_by).clone() },
                    };
                    SqlNode::OrderBy(Box::new(rewritten))
                },
                _ => node.clone(),
            },
            _ => node.clone(),
        }
    }
}
