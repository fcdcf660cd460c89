/// Security headers middleware
///
/// Adds OWASP-recommended headers to every response. The JSON API serves no
/// documents, so the content security policy denies everything.
///
/// # Headers Applied
///
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
/// - `Referrer-Policy: no-referrer`
/// - `Content-Security-Policy: default-src 'none'; frame-ancestors 'none'`
/// - `Cache-Control: no-store`
/// - `Strict-Transport-Security` (only when `USE_HTTPS=true`)
///
/// # Example
///
/// ```no_run
/// use axum::{middleware::map_response_with_state, Router};
/// use taskman_api::middleware::security::security_headers;
///
/// let app: Router = Router::new().layer(map_response_with_state(true, security_headers));
/// ```

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::Response,
};

/// Inserts security headers; `hsts` enables `Strict-Transport-Security`
pub async fn security_headers(State(hsts): State<bool>, mut response: Response) -> Response {
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    // Responses carry tokens and per-user data.
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    if hsts {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}
