pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::WebError;
pub use server::WebServer;
