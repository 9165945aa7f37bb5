//! End-to-end pipeline tests.
//!
//! Decoded events (as JSON, the way the event source hands them over) go
//! through the handler registry and the projecting handler into a real
//! store, and are read back from it.

use std::sync::Arc;

use serde_json::json;
use wldindex_core::{
    Address, DecodedEvent, Entity, EntityId, EntityKind, EntityStore, EventFilter,
    HandlerRegistry, IndexerError, NoopSink, ProjectionHandler, Projector, StoreWriteError, B256,
    U256,
};
use wldindex_storage::{MemoryEntityStore, SqliteEntityStore};

// ─── Helpers ──────────────────────────────────────────────────────────────────

const WLD: &str = "0x163f8c2467924be0ae7b5347228cabf260318753";
const TX: &str = "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef";

fn event(value: serde_json::Value) -> DecodedEvent {
    serde_json::from_value(value).unwrap()
}

fn transfer_event() -> DecodedEvent {
    event(json!({
        "schema": "Transfer",
        "address": WLD,
        "txHash": TX,
        "blockNumber": 100,
        "blockTimestamp": 1_700_000_000u64,
        "logIndex": 3,
        "fields": {
            "from": "0x1111111111111111111111111111111111111111",
            "to": "0x2222222222222222222222222222222222222222",
            "value": "1000"
        }
    }))
}

fn token_updated_event() -> DecodedEvent {
    event(json!({
        "schema": "TokenUpdated",
        "address": WLD,
        "txHash": TX,
        "blockNumber": 17_714_705,
        "blockTimestamp": 1_689_846_000u64,
        "logIndex": 0,
        "fields": {
            "newToken": WLD,
            "name": "Worldcoin",
            "symbol": "WLD",
            "existingHolders": ["0x1111111111111111111111111111111111111111"],
            "existingsAmounts": ["10000000000000000000000000000"],
            "inflationCapPeriod": "31556926",
            "inflationCapWad": "15000000000000000",
            "inflationLockPeriod": "473353890"
        }
    }))
}

fn registry_for<S: EntityStore + 'static>(store: S, filter: EventFilter) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    let handler = ProjectionHandler::new(Projector::with_trace(store, NoopSink), filter);
    registry.on_event(Arc::new(handler));
    registry
}

fn tx() -> B256 {
    TX.parse().unwrap()
}

// ─── Memory backend ───────────────────────────────────────────────────────────

#[tokio::test]
async fn transfer_lands_in_memory_store() {
    let store = Arc::new(MemoryEntityStore::new());
    let registry = registry_for(store.clone(), EventFilter::default());

    registry.dispatch_event(&transfer_event()).await.unwrap();

    let id = EntityId::new(&tx(), 3);
    let Some(Entity::Transfer(t)) = store.get(&id) else {
        panic!("transfer entity missing");
    };
    assert_eq!(t.from, Address::repeat_byte(0x11));
    assert_eq!(t.to, Address::repeat_byte(0x22));
    assert_eq!(t.value, U256::from(1000u64));
    assert_eq!(t.block_number, 100);
    assert_eq!(t.block_timestamp, 1_700_000_000);
    assert_eq!(t.transaction_hash, tx());
    assert_eq!(&t.id.as_bytes()[32..], &[0, 0, 0, 3]);
}

#[tokio::test]
async fn replayed_delivery_is_idempotent() {
    let store = Arc::new(MemoryEntityStore::new());
    let registry = registry_for(store.clone(), EventFilter::default());

    let e = transfer_event();
    registry.dispatch_event(&e).await.unwrap();
    let first = store.get(&EntityId::new(&tx(), 3));
    registry.dispatch_event(&e).await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&EntityId::new(&tx(), 3)), first);
}

#[tokio::test]
async fn same_tx_different_log_index_yields_two_entities() {
    let store = Arc::new(MemoryEntityStore::new());
    let registry = registry_for(store.clone(), EventFilter::default());

    let mut second = transfer_event();
    second.log_index = 4;
    registry.dispatch_event(&transfer_event()).await.unwrap();
    registry.dispatch_event(&second).await.unwrap();

    assert_eq!(store.by_kind(EntityKind::Transfer).len(), 2);
}

#[tokio::test]
async fn unwatched_contract_is_not_projected() {
    let store = Arc::new(MemoryEntityStore::new());
    let filter = EventFilter::address("0x9999999999999999999999999999999999999999");
    let registry = registry_for(store.clone(), filter);

    registry.dispatch_event(&transfer_event()).await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn bad_payload_is_a_decode_error() {
    let store = Arc::new(MemoryEntityStore::new());
    let registry = registry_for(store.clone(), EventFilter::default());

    let mut e = transfer_event();
    e.fields = json!({ "from": "0x11", "to": "nope" });
    let err = registry.dispatch_event(&e).await.unwrap_err();
    assert!(err.is_decode());
    assert!(store.is_empty());
}

// ─── SQLite backend ───────────────────────────────────────────────────────────

#[tokio::test]
async fn token_updated_drops_holder_lists_in_sqlite() {
    let store = SqliteEntityStore::in_memory().unwrap();
    let registry = registry_for(store.clone(), EventFilter::address(WLD));

    registry.dispatch_event(&token_updated_event()).await.unwrap();

    let id = EntityId::new(&tx(), 0);
    let Some(Entity::TokenUpdated(t)) = store.get(&id).unwrap() else {
        panic!("token updated entity missing");
    };
    assert_eq!(t.name, "Worldcoin");
    assert_eq!(t.symbol, "WLD");
    assert_eq!(t.inflation_cap_wad, U256::from(15_000_000_000_000_000u64));
    assert_eq!(t.inflation_lock_period, U256::from(473_353_890u64));

    let body = serde_json::to_value(Entity::TokenUpdated(t)).unwrap();
    assert!(body.get("existingHolders").is_none());
    assert!(body.get("existingsAmounts").is_none());
}

#[tokio::test]
async fn tokens_minted_keeps_amount_order_in_sqlite() {
    let store = SqliteEntityStore::in_memory().unwrap();
    let registry = registry_for(store.clone(), EventFilter::default());

    let e = event(json!({
        "schema": "TokensMinted",
        "address": WLD,
        "txHash": TX,
        "blockNumber": 17_714_705,
        "blockTimestamp": 1_689_846_000u64,
        "logIndex": 1,
        "fields": {
            "minter": "0x3333333333333333333333333333333333333333",
            "newAmounts": ["10", "20", "30"]
        }
    }));
    registry.dispatch_event(&e).await.unwrap();

    let Some(Entity::TokensMinted(m)) = store.get(&EntityId::new(&tx(), 1)).unwrap() else {
        panic!("tokens minted entity missing");
    };
    let expected: Vec<U256> = [10u64, 20, 30].into_iter().map(U256::from).collect();
    assert_eq!(m.new_amounts, expected);
    assert_eq!(store.count_by_kind(EntityKind::TokensMinted).unwrap(), 1);
}

#[tokio::test]
async fn store_failure_propagates_to_dispatcher() {
    struct Unavailable;

    impl EntityStore for Unavailable {
        fn upsert(&self, _id: &EntityId, _entity: &Entity) -> Result<(), StoreWriteError> {
            Err(StoreWriteError::Unavailable("connection refused".into()))
        }
    }

    let registry = registry_for(Unavailable, EventFilter::default());
    let err = registry.dispatch_event(&transfer_event()).await.unwrap_err();
    assert!(matches!(
        err,
        IndexerError::Store(StoreWriteError::Unavailable(_))
    ));
}
