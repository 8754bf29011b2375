pub mod migration;
mod pool;
pub mod queries;
pub mod schema;

pub use migration::run_migrations;
pub use pool::*;
pub use schema::init_database;
