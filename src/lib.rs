pub mod config;
pub mod error;
pub mod schema;
pub mod server;
pub mod store;

pub use config::{SchemaStyle, ServerConfig};
pub use error::{AppError, AppResult};
pub use schema::{build_programmatic_schema, build_schema, build_sdl_schema, UserLookup};
pub use server::{create_app, create_router};
pub use store::{UserRecord, UserStore};
