// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! HTTP route configuration.
//!
//! The download endpoint is the dashboard's only wire contract; `/healthz`
//! exists for load balancers and deployment probes.

pub mod download;
pub mod health;

use actix_web::web;

/// Configure all routes served by deckhub.
///
/// - GET /download/{filename} - Stream a deck, or rebuild and stream the
///   aggregate archive
/// - GET /healthz - Liveness probe
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(download::download_file)
        .service(health::healthz);
}
