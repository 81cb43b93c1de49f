//! The fixed middleware stack every upstream request goes through.

use std::sync::Arc;

use serde::Serialize;

use crate::middleware::{
    base_url_injector, compose, error_translator, logger, BoxedOperation, LogContext, LogSink,
    UrlArg,
};

/// Wraps `target` in the upstream middleware stack.
///
/// Nesting, innermost first:
///
/// 1. base URL injection, so the logged arguments are the final URLs
/// 2. logging, which sees the raw failure before it is rewritten
/// 3. error translation, which sees the rawest failure and is the last thing
///    a caller observes
pub fn assemble<A, R>(
    target: BoxedOperation<A, R>,
    base_url: &str,
    sink: Arc<dyn LogSink>,
) -> BoxedOperation<A, R>
where
    A: UrlArg + Serialize + Send + 'static,
    R: Serialize + Send + 'static,
{
    let context = LogContext::new("GET").with_url(base_url);
    compose(vec![
        base_url_injector(base_url),
        logger(Some(context), sink),
        error_translator(),
    ])(target)
}
