//! HAR entry to transport request, and captured transaction back to HAR.

mod request;
mod response;

pub use request::{plan_request, record_outgoing};
pub use response::{record_response, timings_from};
