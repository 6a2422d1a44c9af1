//! The upload form and the identification flow behind it.

use crate::{
    AppState, STATIC_PREFIX,
    errors::{Error, Result},
    flash::{self, Flash},
    format::format_results,
    templates::IndexPage,
    uploads::{sanitize_filename, save_upload},
};
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, info, instrument};

/// Name of the multipart field carrying the image
const FILE_FIELD: &str = "file";

/// Render the upload form, showing (and clearing) any pending flash message.
#[instrument(skip_all)]
pub async fn show_form(State(state): State<AppState>, flash: Flash) -> Result<Response> {
    let had_flash = flash.needs_clearing();
    let page = IndexPage {
        flashes: flash.into_messages(),
        ..Default::default()
    };
    let html = Html(state.templates.render_index(&page)?);

    if had_flash {
        Ok(([(header::SET_COOKIE, flash::clear_cookie())], html).into_response())
    } else {
        Ok(html.into_response())
    }
}

/// Accept an uploaded image, store it, identify it and render the suggestions.
///
/// Checks run in order: file field present, file selected, API key available, usable file name.
/// The API key check happens before anything is written to disk or sent upstream.
#[instrument(skip_all)]
pub async fn identify_upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Html<String>> {
    let (raw_name, bytes) = read_file_field(&mut multipart).await?.ok_or(Error::MissingFile)?;
    let raw_name = raw_name.filter(|name| !name.is_empty()).ok_or(Error::NoSelectedFile)?;

    let identification = &state.config.identification;
    let api_key = identification.resolve_api_key().ok_or_else(|| Error::MissingApiKey {
        env_var: identification.api_key_env.clone(),
    })?;

    let filename = sanitize_filename(&raw_name).ok_or_else(|| Error::InvalidFilename {
        filename: raw_name.clone(),
    })?;
    if filename != raw_name {
        debug!(original = %raw_name, sanitized = %filename, "Sanitized upload file name");
    }

    let path = save_upload(&state.config.uploads.dir, &filename, &bytes).await?;
    let results = state.client.identify(&path, &api_key).await?;

    info!(
        filename = %filename,
        suggestions = results.suggestions.len(),
        "Identified uploaded image"
    );

    let page = IndexPage {
        flashes: Vec::new(),
        result: format_results(Some(&results)),
        image_url: Some(format!("{STATIC_PREFIX}/{filename}")),
    };
    Ok(Html(state.templates.render_index(&page)?))
}

/// Pull the file name and contents of the first `file` field out of the form.
///
/// Returns `None` if the form has no such field.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<(Option<String>, Bytes)>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| Error::BadRequest {
            message: format!("Failed to read uploaded file: {e}"),
        })?;

        debug!(filename = ?filename, size = bytes.len(), "Received upload");
        return Ok(Some((filename, bytes)));
    }

    Ok(None)
}
