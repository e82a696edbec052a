use core_types::TradeSide;
use database::{DbError, JournalStore, MemoryStore};
use rust_decimal_macros::dec;
use std::io::Write;

const LEDGER: &str = r#"{
    "users": [{ "id": 1, "username": "user0" }],
    "mistakes": [
        { "id": 1, "name": "FOMO trading", "description": "Entered due to fear of missing out", "category": "psychology" },
        { "id": 2, "name": "Slippage", "category": "execution" }
    ],
    "trades": [
        {
            "id": 10, "user_id": 1,
            "symbol": { "symbol": "AAPL", "name": "Apple Inc." },
            "side": "buy", "quantity": "100", "entry_price": "10",
            "entry_date": "2024-02-01T14:30:00Z",
            "exit_price": "12", "exit_date": "2024-02-02T14:30:00Z",
            "mistakes": [1, 2]
        },
        {
            "id": 11, "user_id": 1,
            "symbol": { "symbol": "ETH-USD", "asset_type": "crypto" },
            "side": "sell", "quantity": 0.5, "entry_price": 2000,
            "entry_date": "2024-02-03T09:00:00Z",
            "notes": "still open"
        }
    ]
}"#;

fn write_ledger(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn loads_a_json_ledger() {
    let file = write_ledger(LEDGER);
    let store = MemoryStore::from_json_file(file.path()).await.unwrap();

    let user = store.find_user("user0").await.unwrap().unwrap();
    let trades = store.trades_for_user(user.id).await.unwrap();
    assert_eq!(trades.len(), 2);

    // most recent entry first
    let open = &trades[0];
    assert_eq!(open.id, 11);
    assert_eq!(open.side, TradeSide::Sell);
    assert_eq!(open.quantity, dec!(0.5));
    assert!(!open.is_closed());
    assert!(open.mistakes.is_empty());

    let closed = &trades[1];
    assert_eq!(closed.pnl().unwrap(), Some(dec!(200)));
    assert_eq!(closed.mistakes.len(), 2);

    let catalog = store.mistakes().await.unwrap();
    let names: Vec<&str> = catalog.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Slippage", "FOMO trading"]);
}

#[tokio::test]
async fn seeded_catalog_survives_a_round_trip_to_disk() {
    let file = write_ledger(LEDGER);
    let store = MemoryStore::from_json_file(file.path()).await.unwrap();
    let created = store
        .ensure_mistakes(&core_types::default_mistakes())
        .await
        .unwrap();
    assert_eq!(created, 31);

    store.write_json_file(file.path()).await.unwrap();
    let reloaded = MemoryStore::from_json_file(file.path()).await.unwrap();
    assert_eq!(reloaded.snapshot().await, store.snapshot().await);
    assert_eq!(reloaded.mistakes().await.unwrap().len(), 33);
}

#[tokio::test]
async fn malformed_ledgers_are_reported() {
    let file = write_ledger("{ \"users\": [");
    assert!(matches!(
        MemoryStore::from_json_file(file.path()).await,
        Err(DbError::JsonError(_))
    ));

    let file = write_ledger(r#"{ "mistakes": [{ "id": 1, "name": "X", "category": "invalid" }] }"#);
    assert!(MemoryStore::from_json_file(file.path()).await.is_err());

    let missing = std::path::Path::new("no-such-ledger.json");
    assert!(matches!(
        MemoryStore::from_json_file(missing).await,
        Err(DbError::IoError(_))
    ));
}
