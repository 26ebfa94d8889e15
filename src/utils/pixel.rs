use std::path::Path;

use actix_web::{HttpResponse, http, web::Bytes};
use log::{info, warn};

/// 1x1 transparent GIF, served when the configured image cannot be read.
pub const TRANSPARENT_GIF: [u8; 42] = [
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x01, 0x44, 0x00, 0x3b,
];

/// The image returned by the tracking endpoint, read once at startup.
#[derive(Debug, Clone)]
pub struct Pixel {
    bytes: Bytes,
    content_type: &'static str,
}

impl Pixel {
    pub fn load(path: &str) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => {
                info!("Serving tracking pixel from {} ({} bytes)", path, bytes.len());
                Self {
                    bytes: Bytes::from(bytes),
                    content_type: content_type_for(Path::new(path)),
                }
            }
            Err(e) => {
                warn!("Cannot read tracking pixel {}: {}; using built-in GIF", path, e);
                Self::transparent_gif()
            }
        }
    }

    pub fn transparent_gif() -> Self {
        Self {
            bytes: Bytes::from_static(&TRANSPARENT_GIF),
            content_type: "image/gif",
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn respond(&self) -> HttpResponse {
        HttpResponse::Ok()
            .content_type(self.content_type)
            .insert_header((http::header::CACHE_CONTROL, "no-store, max-age=0"))
            .body(self.bytes.clone())
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
