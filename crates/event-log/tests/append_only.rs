//! Integration tests for the append-only guarantees of the in-memory log.

use std::sync::Arc;

use event_log::{
    AppendOptions, EntityId, InMemoryLogStore, LogStore, LogStoreError, StoredEvent, Version,
};

fn event(entity_id: EntityId, version: u64, name: &str) -> StoredEvent {
    StoredEvent::builder()
        .entity_id(entity_id)
        .event_type("ItemAdded")
        .version(Version::new(version))
        .payload_raw(serde_json::json!({ "name": name }))
        .build()
        .unwrap()
}

#[tokio::test]
async fn existing_prefix_survives_every_append() {
    let store = InMemoryLogStore::new();
    let id = EntityId::new();

    store
        .append_events(id, vec![event(id, 1, "iPhone")], AppendOptions::expect_new())
        .await
        .unwrap();
    let before = store.read_events(id).await.unwrap();

    store
        .append_events(
            id,
            vec![event(id, 2, "TV"), event(id, 3, "Blender")],
            AppendOptions::expect_version(Version::first()),
        )
        .await
        .unwrap();
    let after = store.read_events(id).await.unwrap();

    assert_eq!(after.len(), 3);
    assert_eq!(&after[..before.len()], &before[..]);
}

#[tokio::test]
async fn logs_of_different_entities_are_independent() {
    let store = InMemoryLogStore::new();
    let a = EntityId::new();
    let b = EntityId::new();

    store
        .append_events(a, vec![event(a, 1, "x")], AppendOptions::expect_new())
        .await
        .unwrap();
    store
        .append_events(b, vec![event(b, 1, "y")], AppendOptions::expect_new())
        .await
        .unwrap();

    assert_eq!(store.read_events(a).await.unwrap()[0].payload["name"], "x");
    assert_eq!(store.read_events(b).await.unwrap()[0].payload["name"], "y");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_writers_at_same_version_admit_exactly_one() {
    let store = Arc::new(InMemoryLogStore::new());
    let id = EntityId::new();

    let mut handles = Vec::new();
    for n in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .append_events(
                    id,
                    vec![event(id, 1, &format!("writer-{n}"))],
                    AppendOptions::expect_new(),
                )
                .await
        }));
    }

    let mut won = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(version) => {
                assert_eq!(version, Version::first());
                won += 1;
            }
            Err(LogStoreError::Conflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(won, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(store.read_events(id).await.unwrap().len(), 1);
}
