//! Cross-origin policy for the browser frontend

use actix_cors::Cors;
use actix_web::http::Uri;
use tracing::warn;

/// Build the CORS middleware for the configured origins.
///
/// Credentials are allowed together with any method and any header. A `*`
/// entry allows every origin. Entries that are not `scheme://host[:port]`
/// are logged and skipped so they can never match.
pub fn build_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    for origin in allowed_origins {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if is_valid_origin(origin) {
            cors = cors.allowed_origin(origin);
        } else {
            warn!(origin = %origin, "Ignoring malformed CORS origin");
        }
    }

    cors
}

/// An origin needs a scheme and a host, and nothing after the authority
fn is_valid_origin(origin: &str) -> bool {
    let uri = match origin.parse::<Uri>() {
        Ok(uri) => uri,
        Err(_) => return false,
    };

    let has_path = uri.path_and_query().is_some_and(|p| p.as_str() != "/");
    uri.scheme().is_some() && uri.host().is_some_and(|h| !h.is_empty()) && !has_path
}
