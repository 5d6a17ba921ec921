pub mod column_resolver;
pub use column_resolver::*;

pub mod wildcard_resolver;
pub use wildcard_resolver::*;

pub mod scalar_resolver;
pub use scalar_resolver::*;

pub mod aggregate_resolver;
pub use aggregate_resolver::*;

pub mod from_resolver;
pub use from_resolver::*;

pub mod order_by_resolver;
pub use order_by_resolver::*;

pub mod query_resolver;
pub use query_resolver::*;
