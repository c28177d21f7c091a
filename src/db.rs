//! MongoDB adapter: connection, typed collection handles, index setup.

use anyhow::Context;
use bson::{doc, Document};
use mongodb::{options::IndexOptions, Client, Collection, IndexModel};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::models::{
    CategoryDoc, RecipeDoc, TagDoc, UserDoc, CATEGORY_COLLECTION, RECIPE_COLLECTION,
    TAG_COLLECTION, USER_COLLECTION,
};

/// Index definitions declared next to each document schema
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Shared handle to the document store. The driver pools connections
/// internally: each operation checks a connection out and returns it
/// unconditionally, so per-request scope needs no bespoke guard.
#[derive(Clone)]
pub struct Db {
    client: Client,
    db_name: String,
}

impl Db {
    /// Connect and verify the database is reachable
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        info!("Connecting to MongoDB at {}", uri);

        // Short server selection timeout so startup fails fast instead of
        // hanging on an unreachable database
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .context("failed to build MongoDB client")?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    pub fn recipes(&self) -> Collection<RecipeDoc> {
        self.collection(RECIPE_COLLECTION)
    }

    pub fn categories(&self) -> Collection<CategoryDoc> {
        self.collection(CATEGORY_COLLECTION)
    }

    pub fn tags(&self) -> Collection<TagDoc> {
        self.collection(TAG_COLLECTION)
    }

    fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.client.database(&self.db_name).collection(name)
    }

    /// Apply every schema's declared indexes. Run once at startup.
    pub async fn ensure_indexes(&self) -> anyhow::Result<()> {
        self.apply_indexes::<RecipeDoc>(RECIPE_COLLECTION).await?;
        self.apply_indexes::<CategoryDoc>(CATEGORY_COLLECTION).await?;
        self.apply_indexes::<TagDoc>(TAG_COLLECTION).await?;
        self.apply_indexes::<UserDoc>(USER_COLLECTION).await?;
        Ok(())
    }

    async fn apply_indexes<T>(&self, name: &str) -> anyhow::Result<()>
    where
        T: Serialize + DeserializeOwned + Send + Sync + IntoIndexes,
    {
        let indices: Vec<IndexModel> = T::into_indices()
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        if indices.is_empty() {
            return Ok(());
        }

        self.collection::<T>(name)
            .create_indexes(indices)
            .await
            .with_context(|| format!("failed to create indexes on '{}'", name))?;

        Ok(())
    }
}
