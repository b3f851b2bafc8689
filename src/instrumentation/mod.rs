//! Request instrumentation: the middleware every route runs behind.

mod guard;
mod middleware;

pub use guard::{RequestGuard, UNFINISHED_STATUS};
pub use middleware::{instrument_request, REQUEST_ID_HEADER, UNKNOWN};
