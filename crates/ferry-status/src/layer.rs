use std::task::{Context, Poll};

use ferry_config::StatusConfig;
use ferry_core::BoxError;
use futures::TryFutureExt;
use futures::future::BoxFuture;
use tower::{Layer, Service};

use crate::handler::{ErrorHandler, Options, Role};

/// Layer that routes errors of the wrapped service through an [`ErrorHandler`]
#[derive(Debug, Clone, Copy)]
pub struct StatusLayer {
    options: Options,
}

impl StatusLayer {
    /// Layer applying the handler chosen in `options`
    pub const fn new(options: Options) -> Self {
        Self { options }
    }

    /// Server-side layer: failures are encoded into wire statuses
    pub const fn server() -> Self {
        Self::new(Options::server())
    }

    /// Client-side layer: received statuses are decoded into structured errors
    pub const fn client() -> Self {
        Self::new(Options::client())
    }

    /// Layer for a role, using the handler set in the config file if any
    pub fn from_config(role: Role, config: &StatusConfig) -> Self {
        Self::new(Options::from_config(role, config))
    }
}

impl<S> Layer<S> for StatusLayer {
    type Service = StatusService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        StatusService {
            inner,
            handler: self.options.handler,
        }
    }
}

/// Service produced by [`StatusLayer`]
///
/// Successful responses pass through untouched. On failure the response is
/// dropped and the error is replaced by whatever the handler returns.
/// Readiness errors go through the same handler.
#[derive(Debug, Clone)]
pub struct StatusService<S> {
    inner: S,
    handler: ErrorHandler,
}

impl<S, Req> Service<Req> for StatusService<S>
where
    S: Service<Req>,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let handler = self.handler;
        self.inner.poll_ready(cx).map_err(|err| handler.handle(err.into()))
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let handler = self.handler;
        Box::pin(self.inner.call(req).map_err(move |err| handler.handle(err.into())))
    }
}
