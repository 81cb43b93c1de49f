//! Rewrites failures into user-facing messages.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Middleware, Operation};
use crate::Error;

/// Wraps an operation so that every failure leaves it as one of the
/// translated [`Error`] variants. Successful results pass through untouched.
pub struct ErrorTranslator<O> {
    inner: O,
}

impl<O> ErrorTranslator<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A, O> Operation<A> for ErrorTranslator<O>
where
    A: Send + 'static,
    O: Operation<A>,
{
    type Output = O::Output;

    async fn call(&self, args: A) -> Result<Self::Output, Error> {
        self.inner.call(args).await.map_err(|err| translate(&err))
    }
}

/// Middleware form of [`ErrorTranslator`], for use with [`compose`](super::compose).
pub fn error_translator<A, R>() -> Middleware<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    Box::new(|inner| Arc::new(ErrorTranslator::new(inner)))
}

/// Translates one failure. Failures without message text become
/// [`Error::Unexpected`]; everything else goes through [`classify_message`].
pub fn translate(err: &Error) -> Error {
    match err.message() {
        Some(message) => classify_message(&message),
        None => Error::Unexpected,
    }
}

/// Maps raw failure text to a translated error.
///
/// The upstream only reports failures as text (transport errors and
/// `HTTP {status}: {reason}` lines), so classification is by substring and
/// the first rule that matches wins:
///
/// 1. contains `fetch` → [`Error::Connectivity`]
/// 2. contains `404` → [`Error::NotFound`]
/// 3. contains `500` → [`Error::UpstreamUnavailable`]
/// 4. otherwise → [`Error::SearchFailed`] carrying the original text
pub fn classify_message(message: &str) -> Error {
    if message.contains("fetch") {
        Error::Connectivity
    } else if message.contains("404") {
        Error::NotFound
    } else if message.contains("500") {
        Error::UpstreamUnavailable
    } else {
        Error::SearchFailed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{
        CONNECTIVITY_MESSAGE, NOT_FOUND_MESSAGE, UNAVAILABLE_MESSAGE, UNEXPECTED_MESSAGE,
    };
    use crate::middleware::from_fn;

    fn failing(err: Error) -> ErrorTranslator<impl Operation<String, Output = String>> {
        ErrorTranslator::new(from_fn(move |_: String| {
            let err = err.clone();
            async move { Err::<String, _>(err) }
        }))
    }

    async fn message_of(err: Error) -> String {
        failing(err)
            .call("test".to_string())
            .await
            .unwrap_err()
            .to_string()
    }

    #[tokio::test]
    async fn passes_through_success() {
        let op = ErrorTranslator::new(from_fn(|args: (String, String, String)| async move {
            Ok::<_, Error>(format!("{}{}{}", args.0, args.1, args.2))
        }));
        let out = op
            .call(("arg1".into(), "arg2".into(), "arg3".into()))
            .await
            .unwrap();
        assert_eq!(out, "arg1arg2arg3");
    }

    #[tokio::test]
    async fn translates_fetch_failures() {
        let msg = message_of(Error::Message("fetch failed".into())).await;
        assert_eq!(msg, CONNECTIVITY_MESSAGE);

        let msg = message_of(Error::Transport("connection refused".into())).await;
        assert_eq!(msg, CONNECTIVITY_MESSAGE);
    }

    #[tokio::test]
    async fn translates_404() {
        let msg = message_of(Error::Message("404 Not Found".into())).await;
        assert_eq!(msg, NOT_FOUND_MESSAGE);

        let err = Error::HttpStatus {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(message_of(err).await, NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn translates_500() {
        let msg = message_of(Error::Message("500 Internal Server Error".into())).await;
        assert_eq!(msg, UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn wraps_other_messages() {
        let msg = message_of(Error::Message("Some other error".into())).await;
        assert_eq!(msg, "Search failed: Some other error");

        let err = Error::HttpStatus {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        assert_eq!(
            message_of(err).await,
            "Search failed: HTTP 503: Service Unavailable"
        );
    }

    #[tokio::test]
    async fn non_error_values_become_unexpected() {
        let err = failing(Error::Opaque(serde_json::json!("string error")))
            .call("test".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, Error::Unexpected);
        assert_eq!(err.to_string(), UNEXPECTED_MESSAGE);
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(classify_message("fetch returned 404"), Error::Connectivity);
        assert_eq!(classify_message("404 after 500 retries"), Error::NotFound);
        assert_eq!(classify_message("status 500"), Error::UpstreamUnavailable);
    }
}
