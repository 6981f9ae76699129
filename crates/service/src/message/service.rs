use std::sync::Arc;

use models::{Message, MessagePayload};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::message::{Clock, IdGenerator, SystemClock, UuidV4Generator};
use crate::storage::KvStore;

/// Store type used when the backend is chosen at runtime.
pub type DynMessageStore = Box<dyn KvStore<String, Message>>;

/// Application service owning the message store.
///
/// Every operation holds the store lock from first read to last write, so
/// each call is atomic with respect to the others. Validation always runs
/// before any write; a failed call leaves the store unchanged.
pub struct MessageService<S> {
    store: Mutex<S>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

fn require_id(id: &str) -> Result<(), ServiceError> {
    if id.trim().is_empty() {
        return Err(ServiceError::invalid_id());
    }
    Ok(())
}

impl<S: KvStore<String, Message>> MessageService<S> {
    /// Service backed by the system clock and random UUIDv4 ids.
    pub fn new(store: S) -> Self {
        Self::with_capabilities(store, Arc::new(SystemClock::new()), Arc::new(UuidV4Generator))
    }

    pub fn with_capabilities(store: S, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store: Mutex::new(store), clock, ids }
    }

    pub fn into_store(self) -> S { self.store.into_inner() }

    #[instrument(skip(self))]
    pub async fn list_messages(&self) -> Result<Vec<Message>, ServiceError> {
        let store = self.store.lock().await;
        let messages = store
            .values()
            .await
            .map_err(|e| ServiceError::storage("retrieve messages", e))?;
        info!(count = messages.len(), "listed messages");
        Ok(messages)
    }

    #[instrument(skip(self))]
    pub async fn get_message(&self, id: &str) -> Result<Message, ServiceError> {
        require_id(id)?;
        let store = self.store.lock().await;
        store
            .get(&id.to_string())
            .await
            .map_err(|e| ServiceError::storage("retrieve the message", e))?
            .ok_or_else(|| ServiceError::message_not_found(id))
    }

    #[instrument(skip(self, payload))]
    pub async fn create_message(&self, payload: MessagePayload) -> Result<Message, ServiceError> {
        let payload = payload.normalized();
        if let Err(e) = payload.validate() {
            warn!(error = %e, "rejected message payload");
            return Err(e.into());
        }
        let message = Message::new(self.ids.next_id(), payload, self.clock.now());

        let mut store = self.store.lock().await;
        store
            .insert(message.id.clone(), message.clone())
            .await
            .map_err(|e| ServiceError::storage("add the message", e))?;
        info!(message_id = %message.id, "created message");
        Ok(message)
    }

    #[instrument(skip(self, payload))]
    pub async fn update_message(&self, id: &str, payload: MessagePayload) -> Result<Message, ServiceError> {
        require_id(id)?;
        let mut store = self.store.lock().await;
        let mut message = store
            .get(&id.to_string())
            .await
            .map_err(|e| ServiceError::storage("retrieve the message", e))?
            .ok_or_else(|| ServiceError::message_not_found(id))?;
        let payload = payload.normalized();
        if let Err(e) = payload.validate() {
            warn!(message_id = %id, error = %e, "rejected message payload");
            return Err(e.into());
        }

        message.apply_update(payload, self.clock.now());
        store
            .insert(message.id.clone(), message.clone())
            .await
            .map_err(|e| ServiceError::storage("update the message", e))?;
        info!(message_id = %message.id, "updated message");
        Ok(message)
    }

    #[instrument(skip(self))]
    pub async fn delete_message(&self, id: &str) -> Result<Message, ServiceError> {
        require_id(id)?;
        let mut store = self.store.lock().await;
        let removed = store
            .remove(&id.to_string())
            .await
            .map_err(|e| ServiceError::storage("delete the message", e))?
            .ok_or_else(|| ServiceError::message_not_found(id))?;
        info!(message_id = %removed.id, "deleted message");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::storage::{MemoryMapStore, StorageError};

    struct FixedClock(AtomicU64);

    impl FixedClock {
        fn at(t: u64) -> Arc<Self> { Arc::new(Self(AtomicU64::new(t))) }
        fn set(&self, t: u64) { self.0.store(t, Ordering::SeqCst) }
    }

    impl Clock for FixedClock {
        fn now(&self) -> u64 { self.0.load(Ordering::SeqCst) }
    }

    #[derive(Default)]
    struct SequentialIds(AtomicUsize);

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String { format!("msg-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1) }
    }

    /// Call counter and failure switches shared with a `CountingStore`.
    #[derive(Default, Clone)]
    struct StoreSwitches {
        calls: Arc<AtomicUsize>,
        fail_writes: Arc<AtomicBool>,
        fail_reads: Arc<AtomicBool>,
    }

    struct CountingStore {
        inner: MemoryMapStore<String, Message>,
        switches: StoreSwitches,
    }

    impl CountingStore {
        fn check(&self, write: bool) -> Result<(), StorageError> {
            self.switches.calls.fetch_add(1, Ordering::SeqCst);
            let flag = if write { &self.switches.fail_writes } else { &self.switches.fail_reads };
            if flag.load(Ordering::SeqCst) {
                return Err(StorageError::Backend("disk unavailable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl KvStore<String, Message> for CountingStore {
        async fn get(&self, key: &String) -> Result<Option<Message>, StorageError> {
            self.check(false)?;
            self.inner.get(key).await
        }
        async fn insert(&mut self, key: String, value: Message) -> Result<Option<Message>, StorageError> {
            self.check(true)?;
            self.inner.insert(key, value).await
        }
        async fn remove(&mut self, key: &String) -> Result<Option<Message>, StorageError> {
            self.check(true)?;
            self.inner.remove(key).await
        }
        async fn values(&self) -> Result<Vec<Message>, StorageError> {
            self.check(false)?;
            self.inner.values().await
        }
    }

    fn setup(t0: u64) -> (MessageService<CountingStore>, Arc<FixedClock>, StoreSwitches) {
        let clock = FixedClock::at(t0);
        let switches = StoreSwitches::default();
        let store = CountingStore { inner: MemoryMapStore::new(), switches: switches.clone() };
        let svc = MessageService::with_capabilities(store, clock.clone(), Arc::new(SequentialIds::default()));
        (svc, clock, switches)
    }

    fn payload(title: &str) -> MessagePayload {
        MessagePayload::new(title, "B", "http://x")
    }

    #[tokio::test]
    async fn create_update_delete_lifecycle() -> Result<(), anyhow::Error> {
        let (svc, clock, _) = setup(1_000);

        let created = svc.create_message(payload("T")).await?;
        assert_eq!(created, Message {
            id: "msg-1".into(),
            title: "T".into(),
            body: "B".into(),
            attachment_url: "http://x".into(),
            created_at: 1_000,
            updated_at: None,
        });
        assert_eq!(svc.get_message("msg-1").await?, created);

        clock.set(2_000);
        let updated = svc.update_message("msg-1", payload("T2")).await?;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, 1_000);
        assert_eq!(updated.title, "T2");
        assert_eq!(updated.updated_at, Some(2_000));
        assert_eq!(svc.get_message("msg-1").await?, updated);

        let deleted = svc.delete_message("msg-1").await?;
        assert_eq!(deleted, updated);
        let err = svc.get_message("msg-1").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.to_string(), "Message with ID=msg-1 not found");
        Ok(())
    }

    #[tokio::test]
    async fn empty_id_is_rejected_before_storage() {
        let (svc, _, switches) = setup(1);

        for err in [
            svc.get_message("").await.unwrap_err(),
            svc.update_message("", payload("T")).await.unwrap_err(),
            svc.delete_message("").await.unwrap_err(),
        ] {
            assert!(matches!(err, ServiceError::InvalidInput(_)));
            assert_eq!(err.to_string(), "Invalid ID format.");
        }
        assert_eq!(switches.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_payload_stores_nothing() -> Result<(), anyhow::Error> {
        let (svc, _, switches) = setup(1);
        let bad = [
            MessagePayload::new("", "B", "http://x"),
            MessagePayload::new("T", "", "http://x"),
            MessagePayload::new("T", "B", ""),
            MessagePayload::new("T", "B", "nowhere"),
        ];
        for p in bad {
            assert!(matches!(svc.create_message(p).await, Err(ServiceError::Validation(_))));
        }
        assert_eq!(switches.calls.load(Ordering::SeqCst), 0);
        assert!(svc.list_messages().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_validates_and_reports_missing() -> Result<(), anyhow::Error> {
        let (svc, clock, _) = setup(10);
        let created = svc.create_message(payload("T")).await?;

        let missing = svc.update_message("nope", payload("T")).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));

        clock.set(20);
        let bad = svc.update_message(&created.id, MessagePayload::new("T", "B", "::")).await.unwrap_err();
        assert!(matches!(bad, ServiceError::Validation(_)));
        assert_eq!(svc.get_message(&created.id).await?, created);
        Ok(())
    }

    #[tokio::test]
    async fn update_time_never_precedes_creation() -> Result<(), anyhow::Error> {
        let (svc, clock, _) = setup(500);
        let created = svc.create_message(payload("T")).await?;
        clock.set(100);
        let updated = svc.update_message(&created.id, payload("T2")).await?;
        assert_eq!(updated.updated_at, Some(500));
        Ok(())
    }

    #[tokio::test]
    async fn list_reflects_creates_and_deletes() -> Result<(), anyhow::Error> {
        let (svc, _, _) = setup(1);
        for i in 0..5 {
            svc.create_message(payload(&format!("T{i}"))).await?;
        }
        svc.delete_message("msg-2").await?;
        svc.delete_message("msg-4").await?;
        svc.update_message("msg-5", payload("last")).await?;

        let all = svc.list_messages().await?;
        let ids: Vec<_> = all.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["msg-1", "msg-3", "msg-5"]);
        assert_eq!(all[2].title, "last");
        Ok(())
    }

    #[tokio::test]
    async fn attachment_url_is_stored_trimmed() -> Result<(), anyhow::Error> {
        let (svc, _, _) = setup(1);
        let created = svc.create_message(MessagePayload::new("T", "B", " http://x ")).await?;
        assert_eq!(created.attachment_url, "http://x");
        assert_eq!(svc.get_message(&created.id).await?.attachment_url, "http://x");

        let updated = svc.update_message(&created.id, MessagePayload::new("T", "B", "\thttps://y\n")).await?;
        assert_eq!(updated.attachment_url, "https://y");
        Ok(())
    }

    #[tokio::test]
    async fn repeated_get_is_stable() -> Result<(), anyhow::Error> {
        let (svc, _, _) = setup(3);
        let m = svc.create_message(payload("T")).await?;
        let a = svc.get_message(&m.id).await?;
        let b = svc.get_message(&m.id).await?;
        assert_eq!(a, b);
        Ok(())
    }

    #[tokio::test]
    async fn storage_failures_surface_and_leave_state() -> Result<(), anyhow::Error> {
        let (svc, clock, switches) = setup(1);
        let kept = svc.create_message(payload("T")).await?;

        switches.fail_writes.store(true, Ordering::SeqCst);
        let err = svc.create_message(payload("U")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert_eq!(err.to_string(), "Failed to add the message: disk unavailable");

        clock.set(9);
        let err = svc.update_message(&kept.id, payload("T2")).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to update the message: disk unavailable");
        assert!(matches!(svc.delete_message(&kept.id).await, Err(ServiceError::Storage(_))));

        switches.fail_writes.store(false, Ordering::SeqCst);
        assert_eq!(svc.list_messages().await?, vec![kept]);

        switches.fail_reads.store(true, Ordering::SeqCst);
        let err = svc.list_messages().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to retrieve messages: disk unavailable");
        Ok(())
    }

    #[tokio::test]
    async fn boxed_store_and_default_capabilities() -> Result<(), anyhow::Error> {
        let store: DynMessageStore = Box::new(MemoryMapStore::<String, Message>::new());
        let svc = MessageService::new(store);
        let m = svc.create_message(payload("T")).await?;
        assert!(uuid::Uuid::parse_str(&m.id).is_ok());
        assert!(m.created_at > 0);
        assert_eq!(svc.into_store().values().await?.len(), 1);
        Ok(())
    }
}
