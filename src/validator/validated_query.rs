use serde::Serialize;

use crate::{
    catalog::FieldInfo,
    parser::ast::{DataType, Select, SqlNode},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputColumn {
    pub name: String,
    pub ty: DataType,
    pub nullable: bool,
}

impl OutputColumn {
    pub fn new(name: &str, field: FieldInfo) -> Self {
        Self { name: name.to_string(), ty: field.ty, nullable: field.nullable }
    }

    pub fn field_info(&self) -> FieldInfo {
        FieldInfo::new(self.ty, self.nullable)
    }
}

/// A query whose identifiers are qualified, stars expanded and types known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub node: SqlNode,
    pub columns: Vec<OutputColumn>,
}

impl ValidatedQuery {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The `SELECT` whose list produces the output columns, when the query
    /// is a select or an `ORDER BY` over one.
    pub fn projection_select_mut(&mut self) -> Option<&mut Select> {
        match &mut self.node {
            SqlNode::Select(select) => Some(select),
            SqlNode::OrderBy(order_by) => match &mut order_by.query {
                SqlNode::Select(select) => Some(select),
                _ => None,
            },
            _ => None,
        }
    }
}
