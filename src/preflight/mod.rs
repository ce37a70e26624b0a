pub mod checks;

pub use checks::{run_preflight_checks, PreflightReport};
