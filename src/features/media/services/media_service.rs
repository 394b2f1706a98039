use std::sync::Arc;

use chrono::Utc;
use tokio::fs::File;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::session::SessionUser;
use crate::features::media::dtos::MediaResponseDto;
use crate::features::media::models::Media;
use crate::modules::storage::DiskStorage;
use crate::modules::store::{DynCollection, Stored};

/// Metadata fields accompanying an upload
#[derive(Debug, Default)]
pub struct UploadFields {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub location: Option<String>,
    /// Comma-separated names as submitted
    pub people: Option<String>,
}

/// Media service: uploads plus the lookup/search operations.
///
/// All retrieval goes through this service. Identifiers are resolved in two
/// tiers because the active store backend may issue structured UUIDs or
/// plain sequential integers, and callers cannot know which.
pub struct MediaService {
    media: DynCollection<Media>,
    storage: Arc<DiskStorage>,
}

impl MediaService {
    pub fn new(media: DynCollection<Media>, storage: Arc<DiskStorage>) -> Self {
        Self { media, storage }
    }

    /// Store the file bytes, then insert the media document.
    ///
    /// The two writes are not transactional: a failed insert after a
    /// successful file write leaves an unreferenced file behind (known
    /// inconsistency, accepted).
    pub async fn upload(
        &self,
        data: &[u8],
        extension: &str,
        fields: UploadFields,
        uploader: &SessionUser,
    ) -> Result<Stored<Media>> {
        let filename = self.storage.store(data, extension).await?;

        let media = Media {
            filename,
            title: fields.title,
            caption: fields.caption,
            location: fields.location,
            people: parse_people(fields.people.as_deref().unwrap_or("")),
            uploader_name: uploader.user_name.clone(),
            uploader_id: uploader.user_id.clone(),
            created_at: Utc::now(),
        };

        let stored = self.media.insert(media).await?;
        info!(
            "Media uploaded: id={}, file={}, uploader={}",
            stored.id, stored.doc.filename, stored.doc.uploader_id
        );

        Ok(stored)
    }

    /// Resolve a possibly-heterogeneous identifier to a media record.
    ///
    /// Tier one treats `raw` as a structured identifier and asks the store
    /// natively; the in-memory backend always misses there. Tier two scans
    /// every record and compares canonical string forms, which is what
    /// makes sequential ids (and any future id shape) resolvable.
    pub async fn resolve_by_id(&self, raw: &str) -> Result<Stored<Media>> {
        if let Ok(object_id) = Uuid::parse_str(raw) {
            if let Some(found) = self.media.find_by_object_id(object_id).await? {
                return Ok(found);
            }
        }

        for item in self.media.find_all().await? {
            if item.id.to_string() == raw {
                return Ok(item);
            }
        }

        debug!("Media not resolvable: {}", raw);
        Err(AppError::NotFound("Media not found".to_string()))
    }

    /// Case-insensitive substring search over title, caption and location.
    /// An empty query matches everything; results keep store iteration
    /// order, they are not relevance-ranked.
    pub async fn search(&self, query: &str) -> Result<Vec<Stored<Media>>> {
        let needle = query.to_lowercase();

        Ok(self
            .media
            .find_all()
            .await?
            .into_iter()
            .filter(|item| {
                let m = &item.doc;
                let haystack = format!(
                    "{} {} {}",
                    m.title.as_deref().unwrap_or(""),
                    m.caption.as_deref().unwrap_or(""),
                    m.location.as_deref().unwrap_or("")
                )
                .to_lowercase();
                haystack.contains(&needle)
            })
            .collect())
    }

    /// Everything the given user uploaded: the full scan filtered by exact
    /// string equality of uploader_id.
    pub async fn my_uploads(&self, user_id: &str) -> Result<Vec<Stored<Media>>> {
        Ok(self
            .media
            .find_all()
            .await?
            .into_iter()
            .filter(|item| item.doc.uploader_id == user_id)
            .collect())
    }

    /// Open a stored upload for serving.
    pub async fn open_file(&self, filename: &str) -> Result<File> {
        self.storage.open(filename).await
    }

    pub fn to_response(stored: &Stored<Media>) -> MediaResponseDto {
        MediaResponseDto {
            id: stored.id.to_string(),
            filename: stored.doc.filename.clone(),
            title: stored.doc.title.clone(),
            caption: stored.doc.caption.clone(),
            location: stored.doc.location.clone(),
            people: stored.doc.people.clone(),
            uploader_name: stored.doc.uploader_name.clone(),
            uploader_id: stored.doc.uploader_id.clone(),
            created_at: stored.doc.created_at,
        }
    }
}

/// Split a comma-separated people list, trimming entries and dropping
/// empty ones. Order is preserved.
fn parse_people(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
