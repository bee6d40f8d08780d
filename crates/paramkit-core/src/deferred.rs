//! Values that are either available now or after a single await.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A value that is ready immediately or produced by a boxed future.
///
/// Synchronous schemas return [`Deferred::ready`], asynchronous ones return
/// [`Deferred::pending`]. Both are awaited the same way, so code built on top
/// of a schema never needs to know which kind it holds. Callers that must stay
/// synchronous can still take a ready value out with [`Deferred::into_ready`].
///
/// # Example
///
/// ```rust
/// use paramkit_core::Deferred;
///
/// let ready = Deferred::ready(21).map(|n| n * 2);
/// assert!(ready.is_ready());
/// assert_eq!(ready.into_ready().ok(), Some(42));
/// ```
pub struct Deferred<'a, T> {
    inner: Inner<'a, T>,
}

enum Inner<'a, T> {
    Ready(Option<T>),
    Pending(BoxFuture<'a, T>),
}

// The ready value is only ever moved out, never pinned.
impl<T> Unpin for Deferred<'_, T> {}

impl<'a, T> Deferred<'a, T> {
    /// Wraps an immediately available value.
    pub fn ready(value: T) -> Self {
        Self {
            inner: Inner::Ready(Some(value)),
        }
    }

    /// Wraps a future.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'a,
    {
        Self {
            inner: Inner::Pending(future.boxed()),
        }
    }

    /// Returns true if the value is available without awaiting.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.inner, Inner::Ready(Some(_)))
    }

    /// Takes the value if it is available without awaiting.
    ///
    /// Returns the deferred value unchanged otherwise.
    pub fn into_ready(self) -> Result<T, Self> {
        match self.inner {
            Inner::Ready(Some(value)) => Ok(value),
            inner => Err(Self { inner }),
        }
    }

    /// Transforms the eventual value.
    ///
    /// A ready value is transformed immediately; a pending one when it resolves.
    pub fn map<U, F>(self, f: F) -> Deferred<'a, U>
    where
        F: FnOnce(T) -> U + Send + 'a,
        T: 'a,
        U: 'a,
    {
        let inner = match self.inner {
            Inner::Ready(value) => Inner::Ready(value.map(f)),
            Inner::Pending(future) => Inner::Pending(future.map(f).boxed()),
        };
        Deferred { inner }
    }
}

impl<T> Future for Deferred<'_, T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        match &mut self.get_mut().inner {
            Inner::Ready(value) => {
                Poll::Ready(value.take().expect("Deferred polled after completion"))
            }
            Inner::Pending(future) => future.as_mut().poll(cx),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Ready(Some(value)) => f.debug_tuple("Ready").field(value).finish(),
            Inner::Ready(None) => f.write_str("Done"),
            Inner::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_value() {
        let deferred = Deferred::ready("value");
        assert!(deferred.is_ready());
        assert_eq!(deferred.into_ready().ok(), Some("value"));
    }

    #[test]
    fn test_pending_is_not_ready() {
        let deferred = Deferred::pending(async { 1 });
        assert!(!deferred.is_ready());
        assert!(deferred.into_ready().is_err());
    }

    #[test]
    fn test_map_ready_stays_ready() {
        let deferred = Deferred::ready(2).map(|n| n + 1);
        assert_eq!(deferred.into_ready().ok(), Some(3));
    }

    #[tokio::test]
    async fn test_await_ready() {
        assert_eq!(Deferred::ready(7).await, 7);
    }

    #[tokio::test]
    async fn test_await_pending_and_map() {
        let deferred = Deferred::pending(async {
            tokio::task::yield_now().await;
            String::from("late")
        })
        .map(|s| s.len());

        assert_eq!(deferred.await, 4);
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Deferred::ready(1)), "Ready(1)");
        let pending: Deferred<'_, i32> = Deferred::pending(async { 1 });
        assert_eq!(format!("{pending:?}"), "Pending(..)");
    }
}
