use crate::domain::events::Event;
use crate::observer::{EndpointMatcher, Request, Response, extract};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::Sender;
use tracing::{debug, trace, warn};

/// The transport the host uses to deliver its own requests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, TransportError>;
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("the host transport failed: {0}")]
    Failed(String),
}

/// Transparent tap over the host transport. Every request is forwarded
/// unmodified; only responses of matched location-metadata requests are
/// inspected, and extraction failures are swallowed.
pub struct Tap<T: Transport> {
    inner: T,
    matcher: EndpointMatcher,
    tx: Sender<Event>,
}

impl<T: Transport> Tap<T> {
    pub fn new(inner: T, matcher: EndpointMatcher, tx: Sender<Event>) -> Self {
        Tap { inner, matcher, tx }
    }
}

#[async_trait]
impl<T: Transport> Transport for Tap<T> {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let matched = self.matcher.matches(&request);
        let response = self.inner.send(request).await?;

        if matched && response.is_success() {
            match extract::first_coordinate(&response.body) {
                Some(coordinate) => {
                    debug!("📍 Observed coordinate {},{}", coordinate.latitude, coordinate.longitude);
                    if self.tx.try_send(Event::CoordinateObserved(coordinate)).is_err() {
                        warn!("⚠️ Store channel is full, dropping observed coordinate");
                    }
                }
                None => trace!("Matched response carried no coordinate pair"),
            }
        }

        Ok(response)
    }
}
