//! Reading multipart bodies into ordered form parts.

use axum::extract::Multipart;
use knacks_core::upload::{FormParts, FormValue, UploadedFile};

use crate::error::{AppError, AppResult};

/// Drain a multipart body into `(name, value)` pairs, preserving order.
///
/// Parts carrying a file name become [`FormValue::File`]; all others are
/// read as UTF-8 text. Unnamed parts are skipped.
pub async fn read_form(mut multipart: Multipart) -> AppResult<FormParts> {
    let mut parts = FormParts::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }

        let value = match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                FormValue::File(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                })
            }
            None => FormValue::Text(
                field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            ),
        };
        parts.push((name, value));
    }

    Ok(parts)
}
