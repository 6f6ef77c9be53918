pub mod rate_limiter;
pub mod server;

pub use rate_limiter::RateLimiter;
pub use server::{AppState, routes, run_server};
