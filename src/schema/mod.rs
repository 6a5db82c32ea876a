pub mod fields;
pub mod resolver;

pub use fields::CanonicalField;
pub use resolver::{find_column, resolve_schema, AliasTable, ResolvedSchema};
