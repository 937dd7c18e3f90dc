pub mod error;
pub mod server;

pub use error::IngestError;
pub use server::{AppState, IngestReceipt, router, run};
