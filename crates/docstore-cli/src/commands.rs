//! Subcommand handlers. Each maps onto one repository call over a raw
//! document collection and prints results as relaxed extended JSON.

use docstore_db::{DbConnection, Document, Repository};
use nu_ansi_term::Color::{Green, Red};
use serde_json::json;
use tracing::{debug, info};

use crate::{
    error::Result,
    utils::{parse_document, parse_filter, parse_pipeline, parse_update, to_relaxed_json, Colored},
};

fn collection(conn: &DbConnection, name: &str) -> Repository<Document> {
    conn.repository_for::<Document>(name)
}

fn print_documents(documents: impl IntoIterator<Item = Document>) {
    for document in documents {
        println!("{}", to_relaxed_json(document));
    }
}

pub async fn ping(conn: &DbConnection) -> Result<()> {
    conn.ping().await?;
    info!(
        "{} database '{}' is reachable",
        Colored(Green, "ok:"),
        conn.name()
    );
    Ok(())
}

pub async fn find(
    conn: &DbConnection,
    name: &str,
    filter: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let filter = parse_filter(filter)?;
    let documents = collection(conn, name).find_many(filter).await?;
    debug!("{} document(s) matched", documents.len());

    print_documents(documents.into_iter().take(limit.unwrap_or(usize::MAX)));
    Ok(())
}

pub async fn get(conn: &DbConnection, name: &str, id: &str) -> Result<()> {
    match collection(conn, name).find_one_by_id(id).await? {
        Some(document) => print_documents([document]),
        None => info!("{} no document with _id {id}", Colored(Red, "not found:")),
    }
    Ok(())
}

pub async fn insert(conn: &DbConnection, name: &str, document: &str) -> Result<()> {
    let document = parse_document("document", document)?;
    let created = collection(conn, name).create(document).await?;
    print_documents([created]);
    Ok(())
}

pub async fn update(
    conn: &DbConnection,
    name: &str,
    filter: Option<&str>,
    id: Option<&str>,
    update: &str,
    many: bool,
) -> Result<()> {
    let repo = collection(conn, name);
    let update = parse_update(update)?;

    let result = match (id, filter) {
        (Some(id), _) => repo.update_single_by_id(id, update).await?,
        (None, filter) if many => repo.update_many(parse_filter(filter)?, update).await?,
        (None, filter) => repo.update_one(parse_filter(filter)?, update).await?,
    };

    let mut summary = json!({
        "matchedCount": result.matched_count,
        "modifiedCount": result.modified_count,
    });
    if let Some(upserted) = result.upserted_id {
        summary["upsertedId"] = upserted.into_relaxed_extjson();
    }
    println!("{summary}");
    Ok(())
}

pub async fn delete(
    conn: &DbConnection,
    name: &str,
    filter: Option<&str>,
    id: Option<&str>,
    many: bool,
) -> Result<()> {
    let repo = collection(conn, name);

    let result = match (id, filter) {
        (Some(id), _) => repo.delete_one_by_id(id).await?,
        (None, filter) if many => repo.delete_many(parse_filter(filter)?).await?,
        (None, filter) => repo.delete_one(parse_filter(filter)?).await?,
    };

    println!("{}", json!({ "deletedCount": result.deleted_count }));
    Ok(())
}

pub async fn aggregate(conn: &DbConnection, name: &str, pipeline: &str) -> Result<()> {
    let pipeline = parse_pipeline("pipeline", pipeline)?;
    let documents = collection(conn, name).aggregate(pipeline).await?;
    print_documents(documents);
    Ok(())
}

pub async fn count(conn: &DbConnection, name: &str, filter: Option<&str>) -> Result<()> {
    let filter = parse_filter(filter)?;
    let count = collection(conn, name).count(filter).await?;
    println!("{count}");
    Ok(())
}
