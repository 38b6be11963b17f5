//! Request correlation IDs for the error boundary.
//!
//! Every response, error responses included, carries `x-request-id`, and
//! boundary error logs run inside a `request` span carrying the same ID. A
//! client-supplied ID is echoed only if it is short and made of token
//! characters; anything else is replaced so logs and headers stay bounded.

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Longest client-supplied ID that is echoed back.
pub const MAX_REQUEST_ID_LEN: usize = 128;

fn is_acceptable(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
}

/// Picks the ID for this request: the client's if acceptable, else a fresh
/// UUID v4.
fn resolve(incoming: Option<&HeaderValue>) -> String {
    match incoming.map(HeaderValue::to_str) {
        Some(Ok(id)) if is_acceptable(id) => id.to_owned(),
        Some(_) => {
            tracing::debug!("replacing malformed client request id");
            Uuid::new_v4().to_string()
        }
        None => Uuid::new_v4().to_string(),
    }
}

pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = resolve(req.headers().get(&X_REQUEST_ID));
    let header = HeaderValue::from_str(&request_id).ok();

    if let Some(val) = &header {
        req.headers_mut().insert(X_REQUEST_ID.clone(), val.clone());
    }

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = req.uri().path(),
    );
    let mut response = next.run(req).instrument(span).await;

    if let Some(val) = header {
        response.headers_mut().insert(X_REQUEST_ID.clone(), val);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_uuid(id: &str) -> bool {
        Uuid::parse_str(id).is_ok()
    }

    #[test]
    fn well_formed_client_id_is_kept() {
        for id in ["req-123", "trace_9.a:b", "0f1e2d3c"] {
            let value = HeaderValue::from_static(id);
            assert_eq!(resolve(Some(&value)), id);
        }
    }

    #[test]
    fn missing_id_gets_uuid() {
        assert!(is_uuid(&resolve(None)));
    }

    #[test]
    fn oversized_id_is_replaced() {
        let long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        let value = HeaderValue::from_str(&long).unwrap();
        assert!(is_uuid(&resolve(Some(&value))));

        let exact = "a".repeat(MAX_REQUEST_ID_LEN);
        let value = HeaderValue::from_str(&exact).unwrap();
        assert_eq!(resolve(Some(&value)), exact);
    }

    #[test]
    fn id_outside_charset_is_replaced() {
        for id in ["has space", "quote\"d", "semi;colon", "{json}", ""] {
            let value = HeaderValue::from_str(id).unwrap();
            assert!(is_uuid(&resolve(Some(&value))), "{id:?}");
        }
    }

    #[test]
    fn non_utf8_id_is_replaced() {
        let value = HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap();
        assert!(is_uuid(&resolve(Some(&value))));
    }
}
