//! The application boundary.
//!
//! An [`Application`] is invoked once per parsed request with the request's
//! [`Scope`] and the two halves of the connection it may use: a
//! [`RequestBody`] to pull body chunks from and a [`ResponseSender`] to push
//! response events into.

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;

use crate::connection::ResponseSender;
use crate::protocol::Scope;
use crate::protocol::body::RequestBody;

#[async_trait]
pub trait Application: Send + Sync {
    type Error: Into<Box<dyn Error + Send + Sync>>;

    async fn call(&self, scope: Scope, receive: &mut RequestBody<'_>, send: &mut ResponseSender<'_>) -> Result<(), Self::Error>;
}

#[async_trait]
impl<A: Application + ?Sized> Application for Arc<A> {
    type Error = A::Error;

    async fn call(&self, scope: Scope, receive: &mut RequestBody<'_>, send: &mut ResponseSender<'_>) -> Result<(), Self::Error> {
        (**self).call(scope, receive, send).await
    }
}
