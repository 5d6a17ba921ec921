pub mod field_info;
pub use field_info::*;

pub mod schema_dict;
pub use schema_dict::*;

pub mod catalog;
pub use catalog::*;

pub trait SchemaProvider {
    /// Given a table name as written in `FROM`, return its schema if known.
    fn schema_of(&self, table: &str) -> Option<SchemaDict>;
}
