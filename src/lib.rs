// Credential loading, preflight checks and an authenticated client for the GRVT exchange API.

pub mod display;
pub mod grvt;
pub mod preflight;
pub mod utils;
