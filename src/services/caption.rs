// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Caption request orchestration with a single model fallback.
//!
//! Each request tries [`PRIMARY_MODEL`] once and, if that errors or returns
//! no text, [`FALLBACK_MODEL`] once with the same payload. Nothing is
//! retried beyond that, and neither quota nor history is touched here.

use crate::error::{AppError, Result};
use crate::models::CaptionResult;
use async_trait::async_trait;
use std::sync::Arc;

pub const PRIMARY_MODEL: &str = "gemini-2.5-flash";
pub const FALLBACK_MODEL: &str = "gemini-2.5-flash-lite-latest";

/// Instruction sent with every image.
pub const CAPTION_PROMPT: &str = "Analyze this image and provide a concise, descriptive caption. \
Focus on the main subject and action.";

const MISSING_KEY_MESSAGE: &str =
    "API Key is missing. Please check your environment configuration.";
const FALLBACK_FAILED_MESSAGE: &str =
    "AI service is temporarily unavailable. Please try again later.";
const NO_TEXT_MESSAGE: &str = "Unable to generate caption from available models.";

/// Payload for one model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionRequest {
    pub mime_type: String,
    /// Base64 image bytes, without any data URI prefix
    pub data: String,
    pub prompt: String,
}

/// Remote model that turns an image into text.
#[async_trait]
pub trait CaptionBackend: Send + Sync {
    /// `Ok(None)` means the call succeeded but produced no usable text.
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &CaptionRequest,
    ) -> Result<Option<String>>;
}

/// Issues caption requests against the primary and fallback models.
#[derive(Clone)]
pub struct CaptionOrchestrator {
    api_key: Option<String>,
    backend: Arc<dyn CaptionBackend>,
}

impl CaptionOrchestrator {
    pub fn new(api_key: Option<String>, backend: Arc<dyn CaptionBackend>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            backend,
        }
    }

    /// Caption `image` (raw base64 or a `data:image/...;base64,` URI).
    pub async fn generate_caption(&self, image: &str, mime_type: &str) -> Result<CaptionResult> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration(MISSING_KEY_MESSAGE.to_string()))?;

        let request = CaptionRequest {
            mime_type: mime_type.to_string(),
            data: strip_data_uri_prefix(image).to_string(),
            prompt: CAPTION_PROMPT.to_string(),
        };

        tracing::info!(model = PRIMARY_MODEL, "Attempting caption");
        match self.backend.generate(api_key, PRIMARY_MODEL, &request).await {
            Ok(Some(text)) => {
                return Ok(CaptionResult {
                    text,
                    model: PRIMARY_MODEL.to_string(),
                })
            }
            Ok(None) => {
                tracing::warn!(model = PRIMARY_MODEL, "Primary model returned no text");
            }
            Err(e) => {
                tracing::warn!(
                    model = PRIMARY_MODEL,
                    error = %e,
                    "Primary model failed, attempting fallback"
                );
            }
        }

        tracing::info!(model = FALLBACK_MODEL, "Attempting caption");
        match self.backend.generate(api_key, FALLBACK_MODEL, &request).await {
            Ok(Some(text)) => Ok(CaptionResult {
                text,
                model: FALLBACK_MODEL.to_string(),
            }),
            Ok(None) => {
                tracing::error!(model = FALLBACK_MODEL, "Fallback model returned no text");
                Err(AppError::ServiceUnavailable(NO_TEXT_MESSAGE.to_string()))
            }
            Err(e) => {
                tracing::error!(model = FALLBACK_MODEL, error = %e, "Fallback model failed");
                Err(AppError::ServiceUnavailable(
                    FALLBACK_FAILED_MESSAGE.to_string(),
                ))
            }
        }
    }
}

/// Drop a leading `data:image/<subtype>;base64,` if present.
pub fn strip_data_uri_prefix(payload: &str) -> &str {
    let Some(rest) = payload.strip_prefix("data:image/") else {
        return payload;
    };
    let Some((subtype, data)) = rest.split_once(";base64,") else {
        return payload;
    };

    let valid_subtype = !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-' | '.'));

    if valid_subtype {
        data
    } else {
        payload
    }
}
