//! Path Mapping Resolver.
//!
//! Wraps a [`PathMapping`] and a fallback service into a new service: paths
//! found in the mapping are answered with a redirect, every other request is
//! forwarded untouched to the fallback.

use std::borrow::Cow;
use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{http::Request, response::Response};
use futures_util::future::{ready, Either, Ready};
use percent_encoding::percent_decode_str;
use tower::Service;

use crate::redirect::mapping::PathMapping;
use crate::redirect::response;

/// Redirecting service with a fallback.
///
/// Cloning is cheap: the mapping is shared and only the fallback is cloned.
#[derive(Debug)]
pub struct MapHandler<F> {
    mapping: Arc<PathMapping>,
    fallback: F,
}

/// Build a resolver over `mapping` that delegates misses to `fallback`.
pub fn map_handler<F>(mapping: impl Into<PathMapping>, fallback: F) -> MapHandler<F> {
    MapHandler::new(mapping.into(), fallback)
}

impl<F> MapHandler<F> {
    pub fn new(mapping: PathMapping, fallback: F) -> Self {
        Self {
            mapping: Arc::new(mapping),
            fallback,
        }
    }

    pub fn mapping(&self) -> &PathMapping {
        &self.mapping
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

impl<F: Clone> Clone for MapHandler<F> {
    fn clone(&self) -> Self {
        Self {
            mapping: Arc::clone(&self.mapping),
            fallback: self.fallback.clone(),
        }
    }
}

impl<F, B> Service<Request<B>> for MapHandler<F>
where
    F: Service<Request<B>, Response = Response, Error = Infallible>,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Either<Ready<Result<Response, Infallible>>, F::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.fallback.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let redirect = {
            let path = decode_path(request.uri().path());
            self.mapping.resolve(&path).map(|destination| {
                tracing::debug!(
                    method = %request.method(),
                    path = %path,
                    destination = %destination,
                    "Redirecting"
                );
                response::found(request.method(), &path, destination)
            })
        };

        match redirect {
            Some(found) => Either::Left(ready(Ok(found))),
            None => {
                tracing::trace!(path = %request.uri().path(), "No mapping, delegating to fallback");
                Either::Right(self.fallback.call(request))
            }
        }
    }
}

/// Percent-decode a request path for lookup.
///
/// Paths whose decoded bytes are not UTF-8 are looked up as sent.
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(raw),
    }
}
