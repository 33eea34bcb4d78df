pub mod handlers;
pub mod schema;
