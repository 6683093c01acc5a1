// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Liveness probe handler.

use actix_web::{HttpResponse, Responder, get};
use serde_json::json;

/// GET /healthz - Liveness probe
///
/// Returns 200 OK whenever the server is running. No authentication,
/// designed for load balancer health checks.
#[get("/healthz")]
pub async fn healthz() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
