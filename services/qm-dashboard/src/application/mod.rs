//! Application layer

pub mod commands;
pub mod forms;
pub mod handler;
pub mod queries;
pub mod session;
pub mod views;

pub use commands::*;
pub use handler::{Repositories, ServiceHandler};
pub use queries::*;
pub use session::{SessionContext, SharedSession};
