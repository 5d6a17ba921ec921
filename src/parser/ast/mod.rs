pub mod identifier;
pub use identifier::*;

pub mod literal;
pub use literal::*;

pub mod data_type;
pub use data_type::*;

pub mod operator;
pub use operator::*;

pub mod call;
pub use call::*;

pub mod sql_node;
pub use sql_node::*;

pub mod select;
pub use select::*;

pub mod table_ref;
pub use table_ref::*;

pub mod order_by;
pub use order_by::*;
