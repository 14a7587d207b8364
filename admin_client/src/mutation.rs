use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cache::{QueryCache, QueryKey};
use crate::error::{AdminError, AdminResult, GENERIC_ERROR};
use crate::notify::{Notification, Notifier};
use crate::ServerMessage;

/// Fallback texts for when the server sends no usable message.
#[derive(Debug, Clone, Copy)]
pub struct MutationMessages {
    pub success: &'static str,
    pub failure: &'static str,
}

/// Runs one kind of state-changing call and owns its pending flag.
#[derive(Clone)]
pub struct MutationExecutor {
    cache: QueryCache,
    notifier: Notifier,
    messages: MutationMessages,
    pending: Arc<AtomicBool>,
}

struct PendingGuard(Arc<AtomicBool>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl MutationExecutor {
    pub fn new(cache: QueryCache, notifier: Notifier, messages: MutationMessages) -> Self {
        Self {
            cache,
            notifier,
            messages,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Controls that trigger this mutation should be disabled while true.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Runs `call`; on success invalidates `invalidates`, on failure publishes the
    /// error. Cached data is never touched on failure.
    pub async fn run<R, F, Fut>(&self, invalidates: &[QueryKey], call: F) -> AdminResult<R>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AdminResult<R>>,
    {
        self.pending.store(true, Ordering::SeqCst);
        let _guard = PendingGuard(self.pending.clone());

        match call().await {
            Ok(output) => {
                for prefix in invalidates {
                    self.cache.invalidate(prefix);
                }
                Ok(output)
            }
            Err(e) => {
                let text = match &e {
                    AdminError::Request { message, .. } if message == GENERIC_ERROR => {
                        self.messages.failure.to_string()
                    }
                    _ => e.to_string(),
                };
                self.notifier.publish(Notification::error(text));
                Err(e)
            }
        }
    }

    /// [`run`](Self::run) for calls answering with a server message, which is
    /// shown as the success notification.
    pub async fn mutate<F, Fut>(&self, invalidates: &[QueryKey], call: F) -> AdminResult<ServerMessage>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AdminResult<ServerMessage>>,
    {
        let message = self.run(invalidates, call).await?;
        self.notifier
            .publish(Notification::success(message.text_or(self.messages.success)));
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Level;

    const MESSAGES: MutationMessages = MutationMessages {
        success: "Patient status updated successfully",
        failure: "Failed to update patient status",
    };

    #[tokio::test]
    async fn success_invalidates_and_notifies() {
        let cache = QueryCache::default();
        let notifier = Notifier::new();
        let mut inbox = notifier.subscribe();
        let key = QueryKey::new("patients").with(1).with("");
        cache.query(&key, || async { Ok(0u8) }).await.unwrap();

        let executor = MutationExecutor::new(cache.clone(), notifier, MESSAGES);
        let running = executor.clone();
        let message = executor
            .mutate(&[QueryKey::new("patients")], || async move {
                assert!(running.is_pending());
                Ok(ServerMessage(String::new()))
            })
            .await
            .unwrap();

        assert_eq!(message, ServerMessage(String::new()));
        assert!(!executor.is_pending());
        assert!(cache.is_stale(&key));
        let note = inbox.try_recv().unwrap();
        assert_eq!(note.level, Level::Success);
        assert_eq!(note.message, MESSAGES.success);
    }

    #[tokio::test]
    async fn failure_leaves_cache_alone() {
        let cache = QueryCache::default();
        let notifier = Notifier::new();
        let mut inbox = notifier.subscribe();
        let key = QueryKey::new("patient").with("p1");
        cache.query(&key, || async { Ok(1u8) }).await.unwrap();

        let executor = MutationExecutor::new(cache.clone(), notifier, MESSAGES);
        let err = executor
            .mutate(&[QueryKey::new("patient").with("p1")], || async {
                Err(AdminError::request(Some(403), "Not allowed"))
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert!(!executor.is_pending());
        assert!(!cache.is_stale(&key));
        assert_eq!(inbox.try_recv().unwrap(), Notification::error("Not allowed"));
    }

    #[tokio::test]
    async fn failure_without_server_message_uses_the_mutation_text() {
        let notifier = Notifier::new();
        let mut inbox = notifier.subscribe();
        let executor = MutationExecutor::new(QueryCache::default(), notifier, MESSAGES);

        let err = executor
            .mutate(&[], || async { Err(AdminError::request(Some(502), GENERIC_ERROR)) })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), GENERIC_ERROR);
        assert_eq!(inbox.try_recv().unwrap(), Notification::error(MESSAGES.failure));
    }
}
