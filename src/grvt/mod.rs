pub mod client;
pub mod rate_limit;
pub mod types;

pub use client::GrvtClient;
pub use rate_limit::RequestLimiter;
pub use types::{AccountSummary, Endpoints, Environment, Position};
