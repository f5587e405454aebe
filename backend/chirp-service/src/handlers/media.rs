/// Media handler - multipart image upload
use crate::error::{codes, AppError, Result};
use crate::metrics::record_outcome;
use crate::middleware::ApiKey;
use crate::AppState;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures_util::stream::StreamExt;
use serde::Serialize;

/// Form field carrying the uploaded file
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub result: bool,
    pub media_id: i64,
}

struct Upload {
    filename: Option<String>,
    content_type: Option<mime::Mime>,
    bytes: Vec<u8>,
}

fn malformed(err: actix_multipart::MultipartError) -> AppError {
    AppError::invalid_input(codes::BAD_REQUEST, format!("Malformed multipart body: {}", err))
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(malformed)?;
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::invalid_input(
                codes::BAD_FILE,
                format!("File exceeds the {} byte upload limit", limit),
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Upload an image for later attachment to a tweet
pub async fn upload_media(
    state: web::Data<AppState>,
    api_key: ApiKey,
    payload: Multipart,
) -> Result<HttpResponse> {
    let media_id = record_outcome(
        "register_media",
        store_upload(&state, api_key.as_str(), payload).await,
    )?;

    Ok(HttpResponse::Ok().json(MediaResponse {
        result: true,
        media_id,
    }))
}

async fn store_upload(state: &AppState, api_key: &str, mut payload: Multipart) -> Result<i64> {
    // Unknown callers are rejected before any of the body is read.
    let uploader = state.media.resolve_uploader(api_key).await?;

    let mut upload: Option<Upload> = None;
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(malformed)?;

        if field.name() != Some(FILE_FIELD) || upload.is_some() {
            // Other form fields are drained and ignored.
            read_field(&mut field, state.max_upload_bytes).await?;
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().cloned();
        let bytes = read_field(&mut field, state.max_upload_bytes).await?;

        upload = Some(Upload {
            filename,
            content_type,
            bytes,
        });
    }

    let upload = upload
        .ok_or_else(|| AppError::invalid_input(codes::BAD_FILE, "Missing file field"))?;

    state
        .media
        .upload(
            &uploader,
            upload.filename.as_deref(),
            upload.content_type.as_ref(),
            upload.bytes,
        )
        .await
}
