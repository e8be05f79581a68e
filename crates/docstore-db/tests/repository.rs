//! Repository behaviour against a live server.
//!
//! Set `DOCSTORE_TEST_URI` (e.g. `mongodb://localhost:27017`) to run these.
//! Each test works in its own throwaway database. Transaction tests also need
//! `DOCSTORE_TEST_TRANSACTIONS=1` and a replica set; bulk write tests need
//! MongoDB 8.0 and `DOCSTORE_TEST_BULK_WRITE=1`.

use docstore_config::config::DatabaseConfig;
use docstore_db::{
    define_schema, doc, BulkWriteSummary, DbConnection, DbError, Document, ObjectId, Repository,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Widget {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    #[serde(default)]
    qty: i32,
}

define_schema!(Widget => "widgets");

impl Widget {
    fn new(name: &str, qty: i32) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            qty,
        }
    }
}

struct TestDb {
    conn: DbConnection,
}

impl TestDb {
    async fn open() -> Option<Self> {
        let Ok(uri) = std::env::var("DOCSTORE_TEST_URI") else {
            eprintln!("DOCSTORE_TEST_URI not set, skipping");
            return None;
        };

        let config = DatabaseConfig {
            uri,
            name: format!("docstore_test_{}", ObjectId::new().to_hex()),
            ..DatabaseConfig::default()
        };
        let conn = DbConnection::connect(&config).await.unwrap();
        Some(Self { conn })
    }

    fn widgets(&self) -> Repository<Widget> {
        self.conn.repository::<Widget>()
    }

    async fn cleanup(self) {
        self.conn.database().drop().await.unwrap();
    }
}

fn enabled(var: &str) -> bool {
    std::env::var(var).is_ok_and(|v| v == "1")
}

#[tokio::test]
async fn test_ping() {
    let Some(db) = TestDb::open().await else {
        return;
    };

    db.conn.ping().await.unwrap();
    db.cleanup().await;
}

#[tokio::test]
async fn test_create_then_find_by_id() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let widgets = db.widgets();
    let input = Widget::new("bolt", 3);

    let created = widgets.create(input.clone()).await.unwrap();
    let id = created.id.expect("create assigns an id");

    let found = widgets.find_one_by_id(id).await.unwrap();
    assert_eq!(
        found,
        Some(Widget {
            id: Some(id),
            ..input.clone()
        })
    );

    let by_hex = widgets.find_one_by_id(id.to_hex()).await.unwrap();
    assert_eq!(by_hex, found);

    db.cleanup().await;
}

#[tokio::test]
async fn test_create_find_delete_scenario() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let raw = db.conn.repository_for::<Document>("raw");

    let created = raw.create(doc! { "name": "a" }).await.unwrap();
    let id = created.get_object_id("_id").unwrap();
    assert_eq!(created, doc! { "_id": id, "name": "a" });

    let found = raw.find_one(doc! { "name": "a" }).await.unwrap();
    assert_eq!(found, Some(doc! { "_id": id, "name": "a" }));

    let deleted = raw.delete_one_by_id(id).await.unwrap();
    assert_eq!(deleted.deleted_count, 1);

    assert_eq!(raw.find_one_by_id(id).await.unwrap(), None);

    db.cleanup().await;
}

#[tokio::test]
async fn test_create_keeps_caller_supplied_id() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let raw = db.conn.repository_for::<Document>("raw");

    let created = raw.create(doc! { "_id": "abc", "n": 1 }).await.unwrap();
    assert_eq!(created, doc! { "_id": "abc", "n": 1 });

    let stored = raw.find_one(doc! { "_id": "abc" }).await.unwrap();
    assert_eq!(stored, Some(created));

    db.cleanup().await;
}

#[tokio::test]
async fn test_not_found_is_not_an_error() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let widgets = db.widgets();

    assert!(widgets.find_many(doc! {}).await.unwrap().is_empty());
    assert_eq!(widgets.find_one(doc! { "name": "x" }).await.unwrap(), None);
    assert_eq!(widgets.find_one_by_id(ObjectId::new()).await.unwrap(), None);

    let deleted = widgets.delete_one_by_id(ObjectId::new()).await.unwrap();
    assert_eq!(deleted.deleted_count, 0);

    db.cleanup().await;
}

#[tokio::test]
async fn test_find_many_and_count() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let widgets = db.widgets();

    for (name, qty) in [("bolt", 1), ("nut", 5), ("washer", 10)] {
        widgets.create(Widget::new(name, qty)).await.unwrap();
    }

    let many = widgets
        .find_many(doc! { "qty": { "$gte": 5 } })
        .await
        .unwrap();
    let mut names: Vec<_> = many.into_iter().map(|w| w.name).collect();
    names.sort();
    assert_eq!(names, ["nut", "washer"]);

    assert_eq!(widgets.count(doc! {}).await.unwrap(), 3);

    db.cleanup().await;
}

#[tokio::test]
async fn test_updates_report_counts() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let widgets = db.widgets();
    let bolt = widgets.create(Widget::new("bolt", 1)).await.unwrap();
    widgets.create(Widget::new("nut", 1)).await.unwrap();

    let none = widgets
        .update_many(doc! { "name": "missing" }, doc! { "$set": { "qty": 9 } })
        .await
        .unwrap();
    assert_eq!(none.matched_count, 0);
    assert_eq!(none.modified_count, 0);

    let all = widgets
        .update_many(doc! {}, doc! { "$inc": { "qty": 1 } })
        .await
        .unwrap();
    assert_eq!(all.matched_count, 2);
    assert_eq!(all.modified_count, 2);

    let one = widgets
        .update_one(doc! { "name": "nut" }, doc! { "$set": { "qty": 7 } })
        .await
        .unwrap();
    assert_eq!(one.modified_count, 1);

    let by_id = widgets
        .update_single_by_id(bolt.id.unwrap().to_hex(), doc! { "$set": { "qty": 42 } })
        .await
        .unwrap();
    assert_eq!(by_id.matched_count, 1);

    let bolt = widgets.find_one_by_id(bolt.id.unwrap()).await.unwrap();
    assert_eq!(bolt.map(|w| w.qty), Some(42));

    db.cleanup().await;
}

#[tokio::test]
async fn test_deletes_report_counts() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let widgets = db.widgets();
    for name in ["a", "b", "c"] {
        widgets.create(Widget::new(name, 0)).await.unwrap();
    }

    let one = widgets.delete_one(doc! { "name": "a" }).await.unwrap();
    assert_eq!(one.deleted_count, 1);

    let rest = widgets.delete_many(doc! {}).await.unwrap();
    assert_eq!(rest.deleted_count, 2);

    db.cleanup().await;
}

#[tokio::test]
async fn test_aggregate_returns_raw_documents() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let widgets = db.widgets();
    for (name, qty) in [("bolt", 2), ("bolt", 3), ("nut", 4)] {
        widgets.create(Widget::new(name, qty)).await.unwrap();
    }

    let result = widgets
        .aggregate([
            doc! { "$group": { "_id": "$name", "total": { "$sum": "$qty" } } },
            doc! { "$sort": { "_id": 1 } },
        ])
        .await
        .unwrap();

    assert_eq!(
        result,
        vec![
            doc! { "_id": "bolt", "total": 5 },
            doc! { "_id": "nut", "total": 4 },
        ]
    );

    db.cleanup().await;
}

#[tokio::test]
async fn test_bulk_write() {
    if !enabled("DOCSTORE_TEST_BULK_WRITE") {
        return;
    }
    let Some(db) = TestDb::open().await else {
        return;
    };
    let widgets = db.widgets();
    let existing = widgets.create(Widget::new("old", 1)).await.unwrap();

    let models = vec![
        widgets.insert_model(&Widget::new("new", 1)).unwrap(),
        widgets.update_one_model(doc! { "name": "old" }, doc! { "$set": { "qty": 2 } }),
        widgets.delete_one_model(doc! { "_id": existing.id.unwrap() }),
    ];
    let summary = widgets.bulk_write(models).await.unwrap();

    assert_eq!(summary.inserted_count, 1);
    assert_eq!(summary.matched_count, 1);
    assert_eq!(summary.deleted_count, 1);

    let empty = widgets
        .bulk_write(Vec::<mongodb::options::WriteModel>::new())
        .await
        .unwrap();
    assert_eq!(empty, BulkWriteSummary::default());

    db.cleanup().await;
}

#[tokio::test]
async fn test_transaction_is_left_to_the_caller() {
    if !enabled("DOCSTORE_TEST_TRANSACTIONS") {
        return;
    }
    let Some(db) = TestDb::open().await else {
        return;
    };
    let widgets = db.widgets();
    // Collections cannot be created implicitly inside a transaction on older servers.
    widgets.create(Widget::new("seed", 0)).await.unwrap();

    let mut session = widgets.start_transaction().await.unwrap();
    widgets
        .collection()
        .insert_one(Widget::new("aborted", 1))
        .session(&mut session)
        .await
        .unwrap();
    session.abort_transaction().await.unwrap();
    assert_eq!(widgets.find_one(doc! { "name": "aborted" }).await.unwrap(), None);

    let mut session = widgets.start_transaction().await.unwrap();
    widgets
        .collection()
        .insert_one(Widget::new("committed", 1))
        .session(&mut session)
        .await
        .unwrap();
    session.commit_transaction().await.unwrap();
    assert!(widgets
        .find_one(doc! { "name": "committed" })
        .await
        .unwrap()
        .is_some());

    db.cleanup().await;
}

#[tokio::test]
async fn test_invalid_id_string_is_rejected() {
    let Some(db) = TestDb::open().await else {
        return;
    };

    let result = db.widgets().find_one_by_id("definitely-not-hex").await;
    assert!(matches!(result, Err(DbError::InvalidId(_))));

    db.cleanup().await;
}
