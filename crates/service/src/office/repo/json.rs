use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::office::domain::Office;
use crate::office::repository::OfficeRepository;
use crate::storage::json_map_store::JsonMapStore;

/// File-backed office collection: one JSON object keyed by `_id`, each
/// value in the document shape of [`Office`].
pub struct JsonOfficeRepository {
    store: Arc<JsonMapStore<Uuid, Office>>,
}

impl JsonOfficeRepository {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        Ok(Self { store: JsonMapStore::new(path).await? })
    }
}

#[async_trait]
impl OfficeRepository for JsonOfficeRepository {
    async fn insert(&self, office: &Office) -> Result<(), ServiceError> {
        let office = office.clone();
        self.store
            .update_map(|m| {
                if m.contains_key(&office.id) {
                    return Err(ServiceError::Db(format!("duplicate key: {}", office.id)));
                }
                m.insert(office.id, office);
                Ok(())
            })
            .await
    }

    async fn replace(&self, id: Uuid, office: &Office) -> Result<bool, ServiceError> {
        if !self.store.contains_key(&id).await {
            return Ok(false);
        }
        let office = Office { id, ..office.clone() };
        self.store
            .update_map(|m| Ok(m.get_mut(&id).map(|o| *o = office).is_some()))
            .await
    }

    async fn update_status(&self, id: Uuid, is_active: bool) -> Result<bool, ServiceError> {
        if !self.store.contains_key(&id).await {
            return Ok(false);
        }
        self.store
            .update_map(|m| Ok(m.get_mut(&id).map(|o| o.is_active = is_active).is_some()))
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        if !self.store.contains_key(&id).await {
            return Ok(false);
        }
        self.store.remove(&id).await
    }

    async fn find_all(&self) -> Result<Vec<Office>, ServiceError> {
        let mut offices: Vec<Office> = self.store.list().await.into_iter().map(|(_, o)| o).collect();
        offices.sort_by_key(|o| o.id);
        Ok(offices)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Office>, ServiceError> {
        Ok(self.store.get(&id).await)
    }
}
