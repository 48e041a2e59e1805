#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::errors::{Error, Result};
    use crate::events::{DomainEvent, MockDomainEventSink, ReplaceReason};
    use crate::store::{
        Change, Document, DocumentRepositoryTrait, InMemoryDocumentRepository, RecordStore,
    };
    use crate::test_fixtures::account;

    struct FailingRepository;

    #[async_trait]
    impl DocumentRepositoryTrait for FailingRepository {
        fn load(&self) -> Result<Option<String>> {
            Ok(None)
        }

        async fn save(&self, _payload: String) -> Result<()> {
            Err(Error::Unexpected("disk full".to_string()))
        }
    }

    fn open_store() -> (Arc<InMemoryDocumentRepository>, RecordStore) {
        let repository = Arc::new(InMemoryDocumentRepository::new());
        let store = RecordStore::open(repository.clone()).unwrap();
        (repository, store)
    }

    #[test]
    fn test_open_without_payload_seeds() {
        let (_, store) = open_store();
        let snapshot = store.snapshot();
        assert!(snapshot.accounts.is_empty());
        assert!(!snapshot.settings.methods.is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_open_malformed_payload_resets_to_seed() {
        let repository = Arc::new(InMemoryDocumentRepository::with_payload("{oops"));
        let store = RecordStore::open(repository).unwrap();
        assert_eq!(*store.snapshot(), Document::seed());
    }

    #[tokio::test]
    async fn test_mutate_persists_and_notifies() {
        let (repository, store) = open_store();
        let sink = MockDomainEventSink::new();
        store.subscribe(Arc::new(sink.clone()));

        let mutation = store
            .mutate(|doc| {
                doc.accounts.push(account("A", 1000.0, 0.8));
                Ok(Change::new(
                    "A".to_string(),
                    vec![DomainEvent::accounts_changed(vec!["A".to_string()])],
                ))
            })
            .await
            .unwrap();

        assert_eq!(mutation.value, "A");
        assert_eq!(mutation.snapshot.accounts.len(), 1);
        assert_eq!(store.snapshot().accounts.len(), 1);
        assert_eq!(store.revision(), 1);
        assert_eq!(sink.len(), 1);

        let persisted = Document::from_json(&repository.payload().unwrap().unwrap()).unwrap();
        assert_eq!(persisted.accounts[0].id, "A");
    }

    #[tokio::test]
    async fn test_change_without_events_is_not_saved() {
        let (repository, store) = open_store();
        store
            .mutate(|doc| {
                doc.accounts.push(account("A", 1000.0, 0.8));
                Ok(Change::unchanged(()))
            })
            .await
            .unwrap();
        assert!(repository.payload().unwrap().is_none());
        assert!(store.snapshot().accounts.is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[tokio::test]
    async fn test_failed_closure_keeps_snapshot() {
        let (_, store) = open_store();
        let result = store
            .mutate(|doc| -> Result<Change<()>> {
                doc.accounts.push(account("A", 1000.0, 0.8));
                Err(Error::invalid_input("rejected"))
            })
            .await;
        assert!(result.is_err());
        assert!(store.snapshot().accounts.is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_snapshot() {
        let store = RecordStore::open(Arc::new(FailingRepository)).unwrap();
        let result = store
            .mutate(|doc| {
                doc.accounts.push(account("A", 1000.0, 0.8));
                Ok(Change::new((), vec![DomainEvent::SettingsChanged]))
            })
            .await;
        assert!(result.is_err());
        assert!(store.snapshot().accounts.is_empty());
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_notifications() {
        let (_, store) = open_store();
        let sink = MockDomainEventSink::new();
        let id = store.subscribe(Arc::new(sink.clone()));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));

        store
            .mutate(|_| Ok(Change::new((), vec![DomainEvent::SettingsChanged])))
            .await
            .unwrap();
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_writes() {
        let (repository, store) = open_store();
        let sink = MockDomainEventSink::new();
        store.subscribe(Arc::new(sink.clone()));

        let mut external = Document::seed();
        external.accounts.push(account("X", 10.0, 1.0));
        repository.set_payload(external.to_json().unwrap()).unwrap();

        store.reload().await.unwrap();
        assert_eq!(store.snapshot().accounts[0].id, "X");
        assert_eq!(
            sink.events(),
            vec![DomainEvent::document_replaced(ReplaceReason::Reload)]
        );
    }

    #[tokio::test]
    async fn test_reload_of_malformed_payload_keeps_current() {
        let (repository, store) = open_store();
        store
            .mutate(|doc| {
                doc.accounts.push(account("A", 1000.0, 0.8));
                Ok(Change::new((), vec![DomainEvent::SettingsChanged]))
            })
            .await
            .unwrap();
        repository.set_payload("[1, 2").unwrap();

        assert!(store.reload().await.is_err());
        assert_eq!(store.snapshot().accounts[0].id, "A");
    }

    #[tokio::test]
    async fn test_concurrent_mutations_are_serialised() {
        let (_, store) = open_store();
        let store = Arc::new(store);
        store
            .mutate(|doc| {
                doc.accounts.push(account("A", 0.0, 1.0));
                Ok(Change::new((), vec![DomainEvent::SettingsChanged]))
            })
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .mutate(|doc| {
                        if let Some(a) = doc.account_mut("A") {
                            a.current_funding += 1.0;
                        }
                        Ok(Change::new((), vec![DomainEvent::SettingsChanged]))
                    })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.snapshot().accounts[0].current_funding, 20.0);
    }
}
