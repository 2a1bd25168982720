use shared::{AlbumWithPhotos, CreatePhoto, JournalAlbum, Photo, Validate};
use tracing::{info, warn};

use crate::domain::{new_meta, RecordService};
use crate::error::{ServiceError, ServiceResult};
use crate::storage::{DbConnection, PhotoRepository};

const PHOTO_LABEL: &str = "Photo";

/// Journal albums and the photos inside them.
#[derive(Clone)]
pub struct AlbumService {
    albums: RecordService<JournalAlbum>,
    photos: PhotoRepository,
}

impl AlbumService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            albums: RecordService::new(db.clone()),
            photos: PhotoRepository::new(db),
        }
    }

    pub async fn get_album(&self, user_id: &str, album_id: &str) -> ServiceResult<AlbumWithPhotos> {
        let album = self.albums.get(user_id, album_id).await?;
        let photos = self.photos.list_for_album(user_id, album_id).await?;
        Ok(AlbumWithPhotos { album, photos })
    }

    /// Removes the album together with its photos.
    pub async fn delete_album(&self, user_id: &str, album_id: &str) -> ServiceResult<()> {
        // Ownership check first so another user's album is a plain 404.
        self.albums.get(user_id, album_id).await?;
        let removed = self.photos.delete_for_album(user_id, album_id).await?;
        self.albums.delete(user_id, album_id).await?;
        info!("Deleted album {} with {} photos", album_id, removed);
        Ok(())
    }

    pub async fn list_photos(&self, user_id: &str, album_id: &str) -> ServiceResult<Vec<Photo>> {
        self.albums.get(user_id, album_id).await?;
        Ok(self.photos.list_for_album(user_id, album_id).await?)
    }

    pub async fn add_photo(
        &self,
        user_id: &str,
        album_id: &str,
        input: &CreatePhoto,
    ) -> ServiceResult<Photo> {
        input.validate()?;
        self.albums.get(user_id, album_id).await?;

        let meta = new_meta(user_id);
        let photo = Photo {
            id: meta.id,
            user_id: meta.user_id,
            album_id: album_id.to_string(),
            url: input.url.trim().to_string(),
            caption: shared::validation::normalize_optional(input.caption.as_ref()),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        };
        self.photos.store_photo(&photo).await?;

        info!("Added photo {} to album {}", photo.id, album_id);
        Ok(photo)
    }

    pub async fn delete_photo(&self, user_id: &str, photo_id: &str) -> ServiceResult<()> {
        if !self.photos.delete_photo(user_id, photo_id).await? {
            warn!("Photo not found for delete: {} (user {})", photo_id, user_id);
            return Err(ServiceError::NotFound(PHOTO_LABEL));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::seed_user;
    use shared::CreateJournalAlbum;

    async fn setup() -> (AlbumService, RecordService<JournalAlbum>) {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        seed_user(&db, "user-1").await;
        seed_user(&db, "user-2").await;
        (AlbumService::new(db.clone()), RecordService::new(db))
    }

    async fn album(records: &RecordService<JournalAlbum>, user_id: &str) -> JournalAlbum {
        records
            .create(
                user_id,
                &CreateJournalAlbum {
                    title: "First month".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap()
    }

    fn photo(url: &str) -> CreatePhoto {
        CreatePhoto {
            url: url.to_string(),
            caption: Some(" Bath time ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_album_includes_its_photos() {
        let (service, records) = setup().await;
        let album = album(&records, "user-1").await;

        service.add_photo("user-1", &album.id, &photo("https://img/1.jpg")).await.unwrap();
        let second = service.add_photo("user-1", &album.id, &photo("https://img/2.jpg")).await.unwrap();
        assert_eq!(second.caption.as_deref(), Some("Bath time"));

        let full = service.get_album("user-1", &album.id).await.unwrap();
        assert_eq!(full.album, album);
        assert_eq!(full.photos.len(), 2);
        assert_eq!(full.photos[0].id, second.id);
    }

    #[tokio::test]
    async fn test_delete_album_removes_photos() {
        let (service, records) = setup().await;
        let album = album(&records, "user-1").await;
        let added = service.add_photo("user-1", &album.id, &photo("https://img/1.jpg")).await.unwrap();

        service.delete_album("user-1", &album.id).await.unwrap();

        assert!(matches!(
            service.get_album("user-1", &album.id).await,
            Err(ServiceError::NotFound("Album"))
        ));
        assert!(matches!(
            service.delete_photo("user-1", &added.id).await,
            Err(ServiceError::NotFound("Photo"))
        ));
    }

    #[tokio::test]
    async fn test_photos_require_an_owned_album() {
        let (service, records) = setup().await;
        let album = album(&records, "user-1").await;

        assert!(matches!(
            service.add_photo("user-2", &album.id, &photo("https://img/1.jpg")).await,
            Err(ServiceError::NotFound("Album"))
        ));
        assert!(matches!(
            service.add_photo("user-1", "missing", &photo("https://img/1.jpg")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.add_photo("user-1", &album.id, &photo(" ")).await,
            Err(ServiceError::Validation(_))
        ));
    }
}
