// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Download and archive handler.

use std::fs;

use actix_web::{HttpResponse, Responder, get, web};
use log::{error, info};

use crate::archive::build_archive;
use crate::registry::{DownloadError, FileRegistry, resolve};
use crate::state::AppState;

/// GET /download/{filename} - Download a deck as an attachment
///
/// Requesting the reserved archive name rebuilds the combined ZIP of all
/// registered files before streaming it; there is no caching, every request
/// pays the full rebuild. Any other name is matched literally against the
/// files directly under the static root.
#[get("/download/{filename}")]
pub async fn download_file(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    let filename = path.into_inner();

    if filename == state.archive_name {
        let output = state.registry.root().join(&state.archive_name);
        match build_archive(&state.registry, &output) {
            Ok(members) => info!("Rebuilt {} with {} member(s)", state.archive_name, members),
            Err(e) => {
                error!("Archive build failed: {:#}", e);
                return HttpResponse::InternalServerError()
                    .content_type("text/plain; charset=utf-8")
                    .body("Error: Failed to build archive!");
            }
        }
    }

    serve_file(&filename, &state.registry)
}

/// Resolve `filename` under the static root and stream it as an attachment.
fn serve_file(filename: &str, registry: &FileRegistry) -> HttpResponse {
    let path = match resolve(filename, registry.root()) {
        Ok(path) => path,
        Err(DownloadError::NotFound(name)) => {
            error!("Requested file {:?} not found under {:?}", name, registry.root());
            return HttpResponse::NotFound()
                .content_type("text/plain; charset=utf-8")
                .body(format!("Error: File '{}' not found!", name));
        }
        Err(DownloadError::InvalidName(name)) => {
            error!("Rejected invalid download name {:?}", name);
            return HttpResponse::BadRequest()
                .content_type("text/plain; charset=utf-8")
                .body("Error: Invalid file request!");
        }
    };

    match fs::read(&path) {
        Ok(data) => {
            info!("Serving {:?} ({} bytes)", filename, data.len());
            HttpResponse::Ok()
                .content_type(guess_content_type(filename))
                .append_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(data)
        }
        // The file vanished between the existence check and the read.
        Err(e) => {
            error!("Failed to read {:?}: {}", path, e);
            HttpResponse::NotFound()
                .content_type("text/plain; charset=utf-8")
                .body(format!("Error: File '{}' not found!", filename))
        }
    }
}

fn guess_content_type(filename: &str) -> String {
    mime_guess::from_path(filename).first_or_octet_stream().to_string()
}
