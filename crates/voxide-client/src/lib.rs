pub mod config;
pub mod outbound;
pub mod session;

pub use config::ClientConfig;
pub use session::{Session, SessionEvents, Stage};
