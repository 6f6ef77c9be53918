//! Persistence for assembled API documents.

use crate::error::{ApiDocError, Result};
use crate::models::ApiDoc;
use std::collections::HashMap;
use std::sync::RwLock;

pub trait Storage: Send + Sync {
    /// Inserts the document, replacing any with the same id.
    fn save(&self, doc: ApiDoc) -> Result<()>;

    fn get(&self, id: &str) -> Result<ApiDoc>;

    /// All documents, oldest first.
    fn list_all(&self) -> Result<Vec<ApiDoc>>;
}

#[derive(Default)]
pub struct MemoryStorage {
    docs: RwLock<HashMap<String, ApiDoc>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> ApiDocError {
    ApiDocError::Storage("storage lock poisoned".to_string())
}

impl Storage for MemoryStorage {
    fn save(&self, doc: ApiDoc) -> Result<()> {
        if doc.id.is_empty() {
            return Err(ApiDocError::Storage("API doc ID cannot be empty".to_string()));
        }
        self.docs.write().map_err(poisoned)?.insert(doc.id.clone(), doc);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<ApiDoc> {
        self.docs
            .read()
            .map_err(poisoned)?
            .get(id)
            .cloned()
            .ok_or_else(|| ApiDocError::NotFound(id.to_string()))
    }

    fn list_all(&self) -> Result<Vec<ApiDoc>> {
        let mut docs: Vec<ApiDoc> = self.docs.read().map_err(poisoned)?.values().cloned().collect();
        docs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(docs)
    }
}
