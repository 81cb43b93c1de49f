//! Prefixes relative request URLs with a fixed base URL.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{Middleware, Operation};
use crate::types::Resource;
use crate::Error;

/// Argument shapes [`BaseUrlInjector`] knows how to rewrite.
///
/// Only the first positional argument is ever looked at: a string starting
/// with `/` gets the base prepended, a record exposing a `url` field gets
/// that field prefixed, and anything else is returned as-is.
pub trait UrlArg: Sized {
    fn prepend_base_url(self, base_url: &str) -> Self;
}

impl UrlArg for String {
    fn prepend_base_url(self, base_url: &str) -> Self {
        if self.starts_with('/') {
            format!("{}{}", base_url, self)
        } else {
            self
        }
    }
}

impl UrlArg for Resource {
    fn prepend_base_url(self, base_url: &str) -> Self {
        match self {
            Resource::Url(url) => Resource::Url(url.prepend_base_url(base_url)),
            Resource::Request(mut request) => {
                request.url = format!("{}{}", base_url, request.url);
                Resource::Request(request)
            }
        }
    }
}

/// Dynamic values: strings and objects with a string `url` field are
/// rewritten, every other value (numbers, null, objects without `url`)
/// passes through.
impl UrlArg for Value {
    fn prepend_base_url(self, base_url: &str) -> Self {
        match self {
            Value::String(s) => Value::String(s.prepend_base_url(base_url)),
            Value::Object(mut map) => {
                if let Some(Value::String(url)) = map.get_mut("url") {
                    *url = format!("{}{}", base_url, url);
                }
                Value::Object(map)
            }
            other => other,
        }
    }
}

impl<T: UrlArg> UrlArg for Option<T> {
    fn prepend_base_url(self, base_url: &str) -> Self {
        self.map(|v| v.prepend_base_url(base_url))
    }
}

/// No arguments, nothing to rewrite.
impl UrlArg for () {
    fn prepend_base_url(self, _base_url: &str) -> Self {}
}

impl<T: UrlArg> UrlArg for (T,) {
    fn prepend_base_url(self, base_url: &str) -> Self {
        (self.0.prepend_base_url(base_url),)
    }
}

impl<T: UrlArg, B> UrlArg for (T, B) {
    fn prepend_base_url(self, base_url: &str) -> Self {
        (self.0.prepend_base_url(base_url), self.1)
    }
}

impl<T: UrlArg, B, C> UrlArg for (T, B, C) {
    fn prepend_base_url(self, base_url: &str) -> Self {
        (self.0.prepend_base_url(base_url), self.1, self.2)
    }
}

/// A dynamic argument list; only element 0 is considered.
impl UrlArg for Vec<Value> {
    fn prepend_base_url(mut self, base_url: &str) -> Self {
        if let Some(first) = self.first_mut() {
            *first = std::mem::take(first).prepend_base_url(base_url);
        }
        self
    }
}

/// Rewrites the first argument of every call against `base_url` before
/// handing it to the inner operation.
pub struct BaseUrlInjector<O> {
    inner: O,
    base_url: String,
}

impl<O> BaseUrlInjector<O> {
    pub fn new(inner: O, base_url: &str) -> Self {
        Self {
            inner,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl<A, O> Operation<A> for BaseUrlInjector<O>
where
    A: UrlArg + Send + 'static,
    O: Operation<A>,
{
    type Output = O::Output;

    async fn call(&self, args: A) -> Result<Self::Output, Error> {
        self.inner
            .call(args.prepend_base_url(&self.base_url))
            .await
    }
}

/// Middleware form of [`BaseUrlInjector`], for use with [`compose`](super::compose).
pub fn base_url_injector<A, R>(base_url: &str) -> Middleware<A, R>
where
    A: UrlArg + Send + 'static,
    R: Send + 'static,
{
    let base_url = base_url.to_string();
    Box::new(move |inner| Arc::new(BaseUrlInjector::new(inner, &base_url)))
}
