use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{Office, OfficeDto, OfficeRequest, PhotoUpload};
use super::repository::OfficeRepository;
use crate::blob::{blob_name, name_from_reference, BlobStore};
use crate::errors::ServiceError;

/// Office business service independent of web framework.
///
/// Every operation is a sequence of awaited store calls; nothing runs in
/// parallel within one request and nothing is rolled back.
#[derive(Clone)]
pub struct OfficeService {
    repo: Arc<dyn OfficeRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl OfficeService {
    pub fn new(repo: Arc<dyn OfficeRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { repo, blobs }
    }

    #[instrument(skip(self))]
    pub async fn get_all_offices(&self) -> Result<Vec<OfficeDto>, ServiceError> {
        let offices = self.repo.find_all().await?;
        debug!(count = offices.len(), "offices listed");
        Ok(offices.into_iter().map(OfficeDto::from).collect())
    }

    /// Validate, upload the optional photo, then insert the document.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::blob::mock::MockBlobStore;
    /// use service::office::{OfficeRequest, OfficeService, repository::mock::MockOfficeRepository};
    /// let svc = OfficeService::new(Arc::new(MockOfficeRepository::default()), Arc::new(MockBlobStore::default()));
    /// let dto = tokio_test::block_on(svc.add_office(OfficeRequest::new("Main St 1", "+1 555-123-4567", Some(true)))).unwrap();
    /// assert!(dto.photo_id.is_none());
    /// assert!(dto.is_active);
    /// ```
    #[instrument(skip(self, request))]
    pub async fn add_office(&self, request: OfficeRequest) -> Result<OfficeDto, ServiceError> {
        let valid = request.validate()?;
        let id = Uuid::new_v4();
        let mut office = valid.to_office(id);

        if let Some(photo) = valid.photo {
            office.photo_id = Some(self.upload_photo(id, photo).await?);
        }

        if let Err(e) = self.repo.insert(&office).await {
            if let Some(reference) = &office.photo_id {
                warn!(office_id = %id, blob = name_from_reference(reference), error = %e, "insert failed after upload; blob orphaned");
            }
            return Err(e);
        }
        info!(office_id = %id, has_photo = office.photo_id.is_some(), "office_added");
        Ok(office.into())
    }

    #[instrument(skip(self))]
    pub async fn get_office_by_id(&self, id: Uuid) -> Result<OfficeDto, ServiceError> {
        self.fetch(id).await.map(OfficeDto::from)
    }

    /// Current URL of the office photo. The blob is addressed through the
    /// stored reference.
    #[instrument(skip(self))]
    pub async fn get_office_picture_url(&self, id: Uuid) -> Result<String, ServiceError> {
        let office = self.fetch(id).await?;
        let reference = office
            .photo_id
            .ok_or_else(|| ServiceError::NotFound(format!("The office with id: {id} has no photo")))?;
        Ok(self.blobs.get_url(name_from_reference(&reference)).await?)
    }

    /// Full replace of the mutable fields; a supplied photo replaces the
    /// previous blob (old one deleted first).
    #[instrument(skip(self, request))]
    pub async fn update_office(&self, id: Uuid, request: OfficeRequest) -> Result<OfficeDto, ServiceError> {
        let mut valid = request.validate()?;
        let mut office = self.fetch(id).await?;

        let new_photo = valid.photo.take();
        let replaces_photo = new_photo.is_some();
        if let Some(photo) = new_photo {
            if let Some(old) = office.photo_id.as_deref() {
                let old = name_from_reference(old);
                self.blobs.delete(old).await?;
                debug!(office_id = %id, blob = old, "previous photo deleted");
            }
            office.photo_id = Some(self.upload_photo(id, photo).await?);
        }
        valid.merge_into(&mut office);

        match self.repo.replace(id, &office).await {
            Ok(true) => {}
            Ok(false) => return Err(ServiceError::office_not_found(id)),
            Err(e) => {
                if replaces_photo {
                    warn!(office_id = %id, error = %e, "replace failed after upload; blob orphaned");
                }
                return Err(e);
            }
        }
        info!(office_id = %id, "office_updated");
        Ok(office.into())
    }

    /// Writes only the active flag. The returned projection is the fetched
    /// entity with the new flag applied.
    #[instrument(skip(self))]
    pub async fn update_office_status(&self, id: Uuid, is_active: bool) -> Result<OfficeDto, ServiceError> {
        let mut office = self.fetch(id).await?;
        if !self.repo.update_status(id, is_active).await? {
            return Err(ServiceError::office_not_found(id));
        }
        office.is_active = is_active;
        info!(office_id = %id, is_active, "office_status_updated");
        Ok(office.into())
    }

    /// Removes the photo blob (if any) and then the document.
    #[instrument(skip(self))]
    pub async fn delete_office(&self, id: Uuid) -> Result<OfficeDto, ServiceError> {
        let office = self.fetch(id).await?;
        if let Some(reference) = office.photo_id.as_deref() {
            self.blobs.delete(name_from_reference(reference)).await?;
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::office_not_found(id));
        }
        info!(office_id = %id, "office_deleted");
        Ok(office.into())
    }

    async fn fetch(&self, id: Uuid) -> Result<Office, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::office_not_found(id))
    }

    async fn upload_photo(&self, id: Uuid, photo: PhotoUpload) -> Result<String, ServiceError> {
        let name = blob_name(id, Uuid::new_v4(), photo.file_name.as_deref());
        let size = photo.len();
        let url = self.blobs.upload(photo, &name).await?;
        debug!(office_id = %id, blob = %name, size, "photo uploaded");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::mock::MockBlobStore;
    use crate::office::repository::mock::MockOfficeRepository;

    struct Fixture {
        repo: Arc<MockOfficeRepository>,
        blobs: Arc<MockBlobStore>,
        svc: OfficeService,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(MockOfficeRepository::default());
        let blobs = Arc::new(MockBlobStore::default());
        let svc = OfficeService::new(repo.clone(), blobs.clone());
        Fixture { repo, blobs, svc }
    }

    fn request() -> OfficeRequest {
        OfficeRequest::new("Main St 1", "+1 555-123-4567", Some(true))
    }

    fn photo(name: &str) -> PhotoUpload {
        PhotoUpload::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg", Some(name.to_string()))
    }

    #[tokio::test]
    async fn add_without_photo_then_read_back() -> anyhow::Result<()> {
        let f = fixture();
        let added = f.svc.add_office(request()).await?;
        assert_eq!(added.address, "Main St 1");
        assert_eq!(added.registry_phone_number, "+1 555-123-4567");
        assert!(added.photo_id.is_none());
        assert!(added.is_active);
        assert_eq!(f.blobs.call_count(), 0);

        let read = f.svc.get_office_by_id(added.office_id).await?;
        assert_eq!(read, added);
        Ok(())
    }

    #[tokio::test]
    async fn add_assigns_fresh_identifiers() -> anyhow::Result<()> {
        let f = fixture();
        let a = f.svc.add_office(request()).await?;
        let b = f.svc.add_office(request()).await?;
        assert_ne!(a.office_id, b.office_id);
        assert_eq!(f.svc.get_all_offices().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn add_with_photo_stores_blob_reference() -> anyhow::Result<()> {
        let f = fixture();
        let dto = f.svc.add_office(request().with_photo(photo("front.jpg"))).await?;
        let names = f.blobs.names().await;
        assert_eq!(names.len(), 1);
        let name = &names[0];
        assert!(name.starts_with(&format!("{}_", dto.office_id)));
        assert!(name.ends_with("_front.jpg"));
        assert_eq!(dto.photo_id.as_deref(), Some(format!("http://blobs.test/offices/{name}").as_str()));
        assert!(f.blobs.contains(name).await);

        let url = f.svc.get_office_picture_url(dto.office_id).await?;
        assert_eq!(Some(url), dto.photo_id);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_request_has_no_side_effects() -> anyhow::Result<()> {
        let f = fixture();
        let existing = f.svc.add_office(request()).await?;
        let writes = f.repo.write_count();

        let long = OfficeRequest::new("a".repeat(101), "+1 555-123-4567", Some(true)).with_photo(photo("a.jpg"));
        let err = f.svc.add_office(long).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let bad_chars = OfficeRequest::new("Main St #1", "+1 555-123-4567", Some(true)).with_photo(photo("b.jpg"));
        let err = f.svc.update_office(existing.office_id, bad_chars).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        assert_eq!(f.repo.write_count(), writes);
        assert_eq!(f.blobs.call_count(), 0);
        assert_eq!(f.repo.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_identifier_is_not_found_everywhere() -> anyhow::Result<()> {
        let f = fixture();
        let id = Uuid::new_v4();
        assert!(f.svc.get_office_by_id(id).await.unwrap_err().is_not_found());
        assert!(f.svc.get_office_picture_url(id).await.unwrap_err().is_not_found());
        assert!(f.svc.update_office(id, request()).await.unwrap_err().is_not_found());
        assert!(f.svc.update_office_status(id, false).await.unwrap_err().is_not_found());
        assert!(f.svc.delete_office(id).await.unwrap_err().is_not_found());
        assert_eq!(f.repo.write_count(), 0);

        let err = f.svc.get_office_by_id(id).await.unwrap_err();
        assert_eq!(err.to_string(), format!("There is not any office with this id: {id}"));
        Ok(())
    }

    #[tokio::test]
    async fn picture_without_photo_is_not_found() -> anyhow::Result<()> {
        let f = fixture();
        let dto = f.svc.add_office(request()).await?;
        assert!(f.svc.get_office_picture_url(dto.office_id).await.unwrap_err().is_not_found());
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_photo_and_fields() -> anyhow::Result<()> {
        let f = fixture();
        let original = f.svc.add_office(request().with_photo(photo("old.jpg"))).await?;
        let old_name = f.blobs.names().await.remove(0);

        let update = OfficeRequest::new("Side St 2", "555-123-4567", Some(false)).with_photo(photo("new.png"));
        let updated = f.svc.update_office(original.office_id, update).await?;

        assert_eq!(updated.office_id, original.office_id);
        assert_eq!(updated.address, "Side St 2");
        assert!(!updated.is_active);
        assert_ne!(updated.photo_id, original.photo_id);
        assert!(!f.blobs.contains(&old_name).await);
        assert_eq!(f.blobs.delete_count(), 1);
        let names = f.blobs.names().await;
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with("_new.png"));

        assert_eq!(f.svc.get_office_by_id(original.office_id).await?, updated);
        Ok(())
    }

    #[tokio::test]
    async fn update_with_same_file_name_changes_photo_id() -> anyhow::Result<()> {
        let f = fixture();
        let original = f.svc.add_office(request().with_photo(photo("photo.jpg"))).await?;
        let updated = f.svc.update_office(original.office_id, request().with_photo(photo("photo.jpg"))).await?;
        assert_ne!(updated.photo_id, original.photo_id);

        // only the new blob is left, and it is the one the office points at
        let names = f.blobs.names().await;
        assert_eq!(names.len(), 1);
        let url = f.svc.get_office_picture_url(original.office_id).await?;
        assert_eq!(Some(url), updated.photo_id);

        let unnamed = PhotoUpload::new(vec![1, 2, 3], "image/png", None);
        let again = f.svc.update_office(original.office_id, request().with_photo(unnamed)).await?;
        assert_ne!(again.photo_id, updated.photo_id);
        assert_eq!(f.blobs.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_without_photo_keeps_reference() -> anyhow::Result<()> {
        let f = fixture();
        let original = f.svc.add_office(request().with_photo(photo("front.jpg"))).await?;
        let updated = f
            .svc
            .update_office(original.office_id, OfficeRequest::new("Side St 2", "555-123-4567", Some(true)))
            .await?;
        assert_eq!(updated.photo_id, original.photo_id);
        assert_eq!(f.blobs.call_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn status_update_touches_only_the_flag() -> anyhow::Result<()> {
        let f = fixture();
        let original = f.svc.add_office(request()).await?;
        let dto = f.svc.update_office_status(original.office_id, false).await?;
        assert!(!dto.is_active);

        let read = f.svc.get_office_by_id(original.office_id).await?;
        assert_eq!(read, OfficeDto { is_active: false, ..original });
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_document_and_blob() -> anyhow::Result<()> {
        let f = fixture();
        let dto = f.svc.add_office(request().with_photo(photo("front.jpg"))).await?;

        let deleted = f.svc.delete_office(dto.office_id).await?;
        assert_eq!(deleted, dto);
        assert_eq!(f.blobs.len().await, 0);
        assert_eq!(f.repo.len().await, 0);
        assert!(f.svc.get_office_picture_url(dto.office_id).await.unwrap_err().is_not_found());
        Ok(())
    }

    #[tokio::test]
    async fn failed_insert_leaves_uploaded_blob() -> anyhow::Result<()> {
        let f = fixture();
        f.repo.fail_writes(true);
        let err = f.svc.add_office(request().with_photo(photo("front.jpg"))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));
        assert_eq!(f.blobs.upload_count(), 1);
        assert_eq!(f.blobs.len().await, 1);
        assert_eq!(f.repo.len().await, 0);
        Ok(())
    }
}
