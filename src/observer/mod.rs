mod extract;
mod tap;

pub use extract::first_coordinate;
pub use tap::{Tap, Transport, TransportError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// An outgoing host request as seen at the transport layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Decides which requests may carry location metadata. Matching inspects only
/// the method and the full URL.
#[derive(Clone, Debug)]
pub struct EndpointMatcher {
    fragments: Vec<String>,
}

impl EndpointMatcher {
    pub fn new(fragments: Vec<String>) -> Self {
        EndpointMatcher { fragments }
    }

    /// Case-sensitive substring match on the full URL, POST only.
    pub fn matches(&self, request: &Request) -> bool {
        request.method == Method::Post && self.fragments.iter().any(|fragment| request.url.contains(fragment))
    }
}
