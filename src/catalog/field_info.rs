use serde::{Deserialize, Serialize};

use crate::parser::ast::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub ty: DataType,
    #[serde(default)]
    pub nullable: bool,
}

impl FieldInfo {
    pub fn new(ty: DataType, nullable: bool) -> Self {
        Self { ty, nullable }
    }

    /// Combines the column types of two set-operation branches.
    ///
    /// Returns `None` when the types have no common representative.
    pub fn merge_field_info(&self, other: &FieldInfo) -> Option<FieldInfo> {
        let ty = DataType::promote(self.ty, other.ty)?;
        Some(FieldInfo {
            ty,
            nullable: self.nullable || other.nullable || other.ty == DataType::Null,
        })
    }
}
