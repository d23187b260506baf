//! API request handlers

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::asr::SpeechToText;
use crate::audio;
use crate::core::Normalizer;
use crate::error::{SpellError, SpellResult};
use crate::glyphs::{GlyphMapper, GlyphToken};

/// Process-wide read-only state, built once at startup
pub struct AppState {
    pub normalizer: Normalizer,
    pub mapper: GlyphMapper,
    pub speech: Arc<dyn SpeechToText>,
    pub asset_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub corrected_text: String,
    pub asl_image_urls: Vec<GlyphToken>,
}

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub original_text: String,
    pub corrected_text: String,
    pub asl_image_urls: Vec<GlyphToken>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for SpellError {
    fn into_response(self) -> Response {
        let status = if self.is_client_fault() {
            StatusCode::BAD_REQUEST
        } else {
            error!("Request failed: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// GET / - liveness check
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        message: "ASL API is running".to_string(),
    })
}

/// POST /text-to-asl - convert typed text to a fingerspelling sequence
pub async fn text_to_asl(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextRequest>,
) -> SpellResult<Json<TextResponse>> {
    if request.text.trim().is_empty() {
        return Err(SpellError::MissingInput("text"));
    }

    let corrected = state.normalizer.normalize(&request.text).await;
    let tokens = state.mapper.map(&corrected);

    Ok(Json(TextResponse {
        corrected_text: corrected,
        asl_image_urls: tokens,
    }))
}

/// POST /voice-to-asl - transcribe uploaded audio, then fingerspell it
pub async fn voice_to_asl(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> SpellResult<Json<VoiceResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SpellError::Audio(e.to_string()))?
    {
        if field.name() == Some("audio") {
            let filename = field.file_name().unwrap_or_default().to_lowercase();
            let data = field
                .bytes()
                .await
                .map_err(|e| SpellError::Audio(e.to_string()))?;
            upload = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = upload.ok_or(SpellError::MissingInput("audio file"))?;

    if !audio::is_supported_upload(&filename) {
        return Err(SpellError::UnsupportedAudio(format!(
            "{filename:?}, please upload WAV audio"
        )));
    }

    // Scoped temp file: dropped (and deleted) on every exit path below
    let mut temp = tempfile::NamedTempFile::new()?;
    temp.write_all(&data)?;
    temp.flush()?;

    let samples = audio::decode_wav_file(temp.path())
        .map_err(|e| SpellError::UnsupportedAudio(e.to_string()))?;

    let text = state
        .speech
        .transcribe(&samples)
        .await
        .map_err(|e| SpellError::Transcription(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(SpellError::UnintelligibleAudio);
    }
    info!("Recognized text: {}", text);

    let corrected = state.normalizer.normalize(&text).await;
    let tokens = state.mapper.map(&corrected);

    Ok(Json(VoiceResponse {
        original_text: text,
        corrected_text: corrected,
        asl_image_urls: tokens,
    }))
}

/// GET /asl_images/{filename} - serve one per-character image asset
pub async fn serve_asl_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    // Assets are strictly <uppercase alphanumeric>.jpg; anything else 404s,
    // which also rules out path traversal
    if !is_asset_name(&filename) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match tokio::fs::read(state.asset_dir.join(&filename)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

fn is_asset_name(filename: &str) -> bool {
    let mut chars = filename.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphanumeric() && !c.is_ascii_lowercase())
        && chars.as_str() == ".jpg"
}
