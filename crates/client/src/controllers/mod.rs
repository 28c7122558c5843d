//! Per-screen state holders.
//!
//! A controller owns one screen's observable state: a `watch` channel per
//! field, updated by background tasks. Each user action spawns one
//! cooperative task on the runtime, registered with the controller's
//! [`TaskScope`]; dropping the controller (the screen being torn down)
//! aborts everything still in flight. There are no timeouts beyond that - a
//! slow call simply leaves its field in `Loading` until it resolves or the
//! screen goes away.
//!
//! Controllers are also where errors become words: mutation failures are
//! published to a `notice` channel as the text of
//! [`ClientError::user_message`](crate::error::ClientError::user_message).

pub mod addresses;
pub mod auth;
pub mod brand;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod product_details;
pub mod wishlist;

pub use addresses::AddressesController;
pub use auth::AuthController;
pub use brand::BrandController;
pub use cart::CartController;
pub use checkout::CheckoutController;
pub use home::HomeController;
pub use product_details::ProductDetailsController;
pub use wishlist::WishlistController;

use std::sync::Mutex;

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ui_state::UiState;

/// A set of background tasks bound to a screen's lifetime.
///
/// Tasks spawned through the scope are aborted when it is dropped, so work
/// started for a screen can never outlive it.
#[derive(Debug, Default)]
pub struct TaskScope {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task owned by this scope.
    ///
    /// Finished handles are pruned on each spawn so a long-lived screen
    /// does not accumulate them.
    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        let mut handles = self
            .handles
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        handles.retain(|handle| !handle.is_finished());
        handles.push(tokio::spawn(task));
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        let handles = self
            .handles
            .get_mut()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for handle in handles.drain(..) {
            handle.abort();
        }
    }
}

/// Forward a tri-state stream into a screen-state channel, as a scoped
/// background task.
pub(crate) fn drive<T>(
    scope: &TaskScope,
    field: watch::Sender<UiState<T>>,
    states: impl Stream<Item = UiState<T>> + Send + 'static,
) where
    T: Send + Sync + 'static,
{
    scope.spawn(async move {
        let mut states = Box::pin(states);
        while let Some(state) = states.next().await {
            field.send_replace(state);
        }
    });
}

/// A notice channel: the latest user-facing message, if any.
pub(crate) fn notice_channel() -> watch::Sender<Option<String>> {
    let (tx, _) = watch::channel(None);
    tx
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn dropping_the_scope_aborts_its_tasks() {
        let finished = Arc::new(AtomicBool::new(false));
        let scope = TaskScope::new();
        let flag = Arc::clone(&finished);
        scope.spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            flag.store(true, Ordering::SeqCst);
        });

        drop(scope);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn drive_forwards_every_state() {
        let scope = TaskScope::new();
        let (tx, mut rx) = watch::channel(UiState::Loading);
        drive(
            &scope,
            tx,
            futures::stream::iter(vec![UiState::Loading, UiState::Success(7)]),
        );

        // Wait for the success state to arrive.
        while rx.borrow_and_update().success() != Some(&7) {
            rx.changed().await.expect("sender alive");
        }
    }
}
