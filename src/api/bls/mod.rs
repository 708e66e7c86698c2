pub mod client;
pub mod models;

pub use client::BlsClient;
pub use models::ApiError;
