//! The one capability the translator needs from its environment

use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends one console command line and waits for its reply.
///
/// `Ok(None)` means the command went out but no reply was captured. The
/// translator treats that as a failure, never as an empty success. An empty
/// reply (`Ok(Some(String::new()))`) is a real reply and is classified like
/// any other text.
///
/// Implementations must either allow only one request in flight or correlate
/// replies to requests themselves; the translator adds no locking.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, command: &str) -> Result<Option<String>, TransportError>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn send(&self, command: &str) -> Result<Option<String>, TransportError> {
        (**self).send(command).await
    }
}

#[async_trait]
impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    async fn send(&self, command: &str) -> Result<Option<String>, TransportError> {
        (**self).send(command).await
    }
}

#[async_trait]
impl<'a, T> Transport for &'a T
where
    T: Transport + ?Sized,
{
    async fn send(&self, command: &str) -> Result<Option<String>, TransportError> {
        (**self).send(command).await
    }
}
