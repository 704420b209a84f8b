use async_trait::async_trait;
use uuid::Uuid;

use super::domain::Office;
use crate::errors::ServiceError;

/// Persistence port for the office collection, one document per office.
///
/// Write methods that address an existing document return whether a
/// document matched; `find_by_id` returns `None` rather than erroring.
#[async_trait]
pub trait OfficeRepository: Send + Sync {
    async fn insert(&self, office: &Office) -> Result<(), ServiceError>;
    async fn replace(&self, id: Uuid, office: &Office) -> Result<bool, ServiceError>;
    async fn update_status(&self, id: Uuid, is_active: bool) -> Result<bool, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Office>, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Office>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct MockOfficeRepository {
        offices: RwLock<BTreeMap<Uuid, Office>>,
        writes: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl MockOfficeRepository {
        /// Number of write calls (insert/replace/status/delete) received.
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        /// Make every following write fail with a database error.
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub async fn len(&self) -> usize {
            self.offices.read().await.len()
        }

        fn begin_write(&self) -> Result<(), ServiceError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("document store unavailable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl OfficeRepository for MockOfficeRepository {
        async fn insert(&self, office: &Office) -> Result<(), ServiceError> {
            self.begin_write()?;
            let mut offices = self.offices.write().await;
            if offices.contains_key(&office.id) {
                return Err(ServiceError::Db(format!("duplicate key: {}", office.id)));
            }
            offices.insert(office.id, office.clone());
            Ok(())
        }

        async fn replace(&self, id: Uuid, office: &Office) -> Result<bool, ServiceError> {
            self.begin_write()?;
            let mut offices = self.offices.write().await;
            match offices.get_mut(&id) {
                Some(existing) => {
                    *existing = Office { id, ..office.clone() };
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn update_status(&self, id: Uuid, is_active: bool) -> Result<bool, ServiceError> {
            self.begin_write()?;
            let mut offices = self.offices.write().await;
            Ok(offices.get_mut(&id).map(|o| o.is_active = is_active).is_some())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            self.begin_write()?;
            Ok(self.offices.write().await.remove(&id).is_some())
        }

        async fn find_all(&self) -> Result<Vec<Office>, ServiceError> {
            Ok(self.offices.read().await.values().cloned().collect())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Office>, ServiceError> {
            Ok(self.offices.read().await.get(&id).cloned())
        }
    }
}
