mod rate_limit;
mod security_headers;

pub use rate_limit::rate_limit_middleware;
pub use security_headers::security_headers_middleware;
