pub mod client;
pub mod request;
pub mod response;
pub mod types;

// Re-export commonly used types for convenient access
pub use client::Client;
pub use request::{RequestBuilder, RequestDescriptor};
pub use response::ResponseDescriptor;
pub use types::{Method, Status};
