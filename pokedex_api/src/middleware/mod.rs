//! Async operations and the middleware that wraps them.
//!
//! An [`Operation`] is anything that can be called with an argument value
//! and eventually produces a result or an [`Error`]. A [`Middleware`] takes
//! an operation and returns another operation with the same argument and
//! output types, adding behavior around the call.

mod base_url;
mod error_translator;
mod logger;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::Error;

pub use self::base_url::{base_url_injector, BaseUrlInjector, UrlArg};
pub use self::error_translator::{classify_message, error_translator, translate, ErrorTranslator};
pub use self::logger::{
    logger, Fields, LogContext, LogEvent, LogSink, Logger, MemorySink, TracingSink,
    DEFAULT_OPERATION_LABEL, UNKNOWN_ERROR,
};

/// An async call taking `A` and producing `Self::Output`.
///
/// Multi-argument calls use a tuple for `A`; calls with a dynamic argument
/// list use `Vec<serde_json::Value>`; calls with no arguments use `()`.
#[async_trait]
pub trait Operation<A>: Send + Sync
where
    A: Send + 'static,
{
    type Output: Send + 'static;

    async fn call(&self, args: A) -> Result<Self::Output, Error>;
}

#[async_trait]
impl<A, T> Operation<A> for Arc<T>
where
    A: Send + 'static,
    T: Operation<A> + ?Sized,
{
    type Output = T::Output;

    async fn call(&self, args: A) -> Result<Self::Output, Error> {
        (**self).call(args).await
    }
}

/// Type-erased, shareable operation.
pub type BoxedOperation<A, R> = Arc<dyn Operation<A, Output = R>>;

/// Wraps an operation into another with the same signature.
pub type Middleware<A, R> =
    Box<dyn Fn(BoxedOperation<A, R>) -> BoxedOperation<A, R> + Send + Sync>;

/// Erases the concrete type of an operation.
pub fn boxed<A, O>(op: O) -> BoxedOperation<A, O::Output>
where
    A: Send + 'static,
    O: Operation<A> + 'static,
{
    Arc::new(op)
}

/// Operation backed by an async closure.
pub struct FnOperation<F>(F);

/// Builds an operation from a closure returning a future.
pub fn from_fn<F>(f: F) -> FnOperation<F> {
    FnOperation(f)
}

#[async_trait]
impl<A, R, F, Fut> Operation<A> for FnOperation<F>
where
    A: Send + 'static,
    R: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
{
    type Output = R;

    async fn call(&self, args: A) -> Result<R, Error> {
        (self.0)(args).await
    }
}

/// Combines middlewares into one.
///
/// The first middleware wraps the target directly and each following one
/// wraps the result, so the last middleware in the list is the outermost
/// layer. With `compose(vec![a, b])`, a call runs `b`'s pre-logic, then
/// `a`'s, then the target, then `a`'s post-logic, then `b`'s. An empty list
/// returns the target unchanged.
pub fn compose<A, R>(
    middlewares: Vec<Middleware<A, R>>,
) -> impl Fn(BoxedOperation<A, R>) -> BoxedOperation<A, R> + Send + Sync
where
    A: Send + 'static,
    R: Send + 'static,
{
    move |target| {
        middlewares
            .iter()
            .fold(target, |inner, middleware| middleware(inner))
    }
}
