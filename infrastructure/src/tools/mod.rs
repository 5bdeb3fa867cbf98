//! Tool catalog rendering

mod schema;

pub use schema::JsonSchemaToolConverter;
