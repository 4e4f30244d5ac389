//! HTTP plumbing for the fetch tools.
//!
//! [`Fetcher`] owns the retry policy; [`HttpTransport`] is the seam that
//! performs a single GET. Production code uses [`ReqwestTransport`].

pub mod fetcher;
pub mod transport;

pub use fetcher::{Fetcher, RetryPolicy};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
