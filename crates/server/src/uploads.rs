//! Image upload endpoints, relayed to the media storage service.

use api_types::{Envelope, upload::UploadedFile};
use axum::{
    Extension, Json,
    extract::{
        State,
        multipart::{Field, Multipart},
    },
};

use crate::{ServerError, server::ServerState};
use engine::User;
use integrations::StorageClient;

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const MAX_BATCH_FILES: usize = 10;

struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

fn storage_client(state: &ServerState) -> Result<&StorageClient, ServerError> {
    state
        .integrations
        .storage
        .as_ref()
        .ok_or_else(|| ServerError::Internal("image storage is not configured".to_string()))
}

async fn read_image_field(field: Field<'_>) -> Result<ImageUpload, ServerError> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .ok_or_else(|| ServerError::Generic("missing content type".to_string()))?
        .to_string();
    if !content_type.starts_with("image/") {
        return Err(ServerError::Generic(format!(
            "only image uploads are allowed, got {content_type}"
        )));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ServerError::Generic(format!(
            "{file_name} exceeds the 5 MiB limit"
        )));
    }

    Ok(ImageUpload {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}

/// Multipart field `image`, one file.
pub async fn single(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<UploadedFile>>, ServerError> {
    let storage = storage_client(&state)?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        image = Some(read_image_field(field).await?);
        break;
    }
    let image =
        image.ok_or_else(|| ServerError::Generic("multipart field \"image\" is required".to_string()))?;

    let stored = storage
        .upload(&image.file_name, &image.content_type, image.bytes)
        .await?;

    Ok(Json(Envelope::data(UploadedFile {
        url: stored.url,
        public_id: stored.public_id,
    })))
}

/// Multipart field `images`, up to ten files.
pub async fn multiple(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<Vec<UploadedFile>>>, ServerError> {
    let storage = storage_client(&state)?;

    let mut images = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?
    {
        if field.name() != Some("images") {
            continue;
        }
        if images.len() == MAX_BATCH_FILES {
            return Err(ServerError::Generic(
                "at most 10 images per upload".to_string(),
            ));
        }
        images.push(read_image_field(field).await?);
    }
    if images.is_empty() {
        return Err(ServerError::Generic(
            "multipart field \"images\" is required".to_string(),
        ));
    }

    let mut uploaded = Vec::with_capacity(images.len());
    for image in images {
        let stored = storage
            .upload(&image.file_name, &image.content_type, image.bytes)
            .await?;
        uploaded.push(UploadedFile {
            url: stored.url,
            public_id: stored.public_id,
        });
    }

    Ok(Json(Envelope::data(uploaded)))
}
