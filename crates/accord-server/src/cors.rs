//! CORS (Cross-Origin Resource Sharing) support

use hyper::HeaderMap;
use hyper::header::HeaderValue;

/// CORS layer for adding appropriate headers
pub struct CorsLayer;

impl CorsLayer {
    /// Apply permissive CORS headers to a response
    pub fn apply_cors_headers(headers: &mut HeaderMap) {
        headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
        headers.insert(
            "Access-Control-Allow-Methods",
            HeaderValue::from_static("POST, OPTIONS"),
        );
        headers.insert(
            "Access-Control-Allow-Headers",
            HeaderValue::from_static("Content-Type, Accept"),
        );
        headers.insert("Access-Control-Max-Age", HeaderValue::from_static("86400"));
    }
}
