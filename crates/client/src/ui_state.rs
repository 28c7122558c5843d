//! Tri-state result type driving every screen.
//!
//! Every asynchronous fetch a screen depends on is represented as a lazy
//! stream of [`UiState`] values: `Loading` immediately when the operation
//! starts, then exactly one of `Success` or `Error`. Consumers treat every
//! state as transient and re-render on change; a failed operation is only
//! re-run by an explicit caller action.

use std::sync::Arc;

use futures::Stream;

use crate::error::ClientError;

/// The outcome of one asynchronous operation, as a screen observes it.
///
/// Exactly one of the three states at any observed instant. Transitions are
/// `Loading` → `Success` or `Loading` → `Error`, re-triggered to `Loading`
/// on each new fetch.
///
/// The error arm is `Arc`-wrapped so snapshots stay cheap to clone through
/// watch channels.
#[derive(Debug, Clone, Default)]
pub enum UiState<T> {
    /// The operation is in flight.
    #[default]
    Loading,
    /// The operation completed with data.
    Success(T),
    /// The operation failed; the cause is preserved for inspection.
    Error(Arc<ClientError>),
}

impl<T> UiState<T> {
    /// Whether the operation is still in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The data, if the operation succeeded.
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Loading | Self::Error(_) => None,
        }
    }

    /// The cause, if the operation failed.
    pub const fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Error(cause) => Some(cause),
            Self::Loading | Self::Success(_) => None,
        }
    }

    /// Map the success data, leaving the other states untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UiState<U> {
        match self {
            Self::Loading => UiState::Loading,
            Self::Success(data) => UiState::Success(f(data)),
            Self::Error(cause) => UiState::Error(cause),
        }
    }

    /// User-facing message for the error state, `None` otherwise.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        self.error().map(ClientError::user_message)
    }
}

/// Adapt one fallible async operation into the tri-state sequence.
///
/// Yields [`UiState::Loading`] before polling the future, then exactly one
/// of [`UiState::Success`] or [`UiState::Error`]. Every repository read is
/// built on this; the stream is lazy and does nothing until polled.
pub fn fetch_state<T>(
    operation: impl Future<Output = Result<T, ClientError>>,
) -> impl Stream<Item = UiState<T>> {
    async_stream::stream! {
        yield UiState::Loading;
        match operation.await {
            Ok(data) => yield UiState::Success(data),
            Err(cause) => yield UiState::Error(Arc::new(cause)),
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn success_emits_loading_then_success() {
        let stream = fetch_state(async { Ok::<_, ClientError>(vec![1, 2, 3]) });
        let states: Vec<_> = stream.collect().await;

        assert_eq!(states.len(), 2);
        assert!(states[0].is_loading());
        assert_eq!(states[1].success(), Some(&vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn failure_emits_loading_then_error_and_never_success() {
        let stream = fetch_state(async { Err::<(), _>(ClientError::NotLoggedIn) });
        let states: Vec<_> = stream.collect().await;

        assert_eq!(states.len(), 2);
        assert!(states[0].is_loading());
        assert!(matches!(
            states[1].error(),
            Some(ClientError::NotLoggedIn)
        ));
        assert!(states[1].success().is_none());
    }

    #[tokio::test]
    async fn stream_is_lazy_until_polled() {
        async fn never() -> Result<(), ClientError> {
            panic!("polled")
        }

        // Constructing the stream must not run the operation.
        let stream = fetch_state(never());
        drop(stream);
    }

    #[test]
    fn map_preserves_the_state_shape() {
        let state = UiState::Success(2).map(|n| n * 10);
        assert_eq!(state.success(), Some(&20));

        let state: UiState<i32> = UiState::Loading.map(|n: i32| n * 10);
        assert!(state.is_loading());
    }
}
