//! HTTP response helpers

use http::header::{CONTENT_TYPE, LOCATION};
use http::{Response, StatusCode};
use serde::Serialize;

/// Serialize `data` as the JSON body of a response with `status`.
pub fn json_response<T: Serialize + ?Sized>(
    data: &T,
    status: StatusCode,
) -> serde_json::Result<Response<String>> {
    let body = serde_json::to_string(data)?;
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    Ok(response)
}

/// A temporary (307) redirect to `location`.
///
/// Locations that are not valid header values produce a redirect without a
/// `Location` header.
pub fn redirect_response(location: &str) -> Response<String> {
    let mut response = Response::new(String::new());
    *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
    if let Ok(value) = http::HeaderValue::from_str(location) {
        response.headers_mut().insert(LOCATION, value);
    } else {
        tracing::warn!(location, "redirect location is not a valid header value");
    }
    response
}
