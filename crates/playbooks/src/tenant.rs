//! Org scoping for incoming requests.
//!
//! The upstream API gateway authenticates the caller and forwards identity
//! as `x-org-id` / `x-user-id` headers. This service trusts those headers
//! and scopes every query by them; requests without a valid pair are
//! rejected before any handler runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

/// Identity of the calling org and user, taken from gateway headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgContext {
    /// Org every query is scoped by.
    pub org_id: Uuid,

    /// Acting user, recorded as owner on writes.
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for OrgContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let org_id = header_uuid(parts, "x-org-id")?;
        let user_id = header_uuid(parts, "x-user-id")?;

        Ok(OrgContext { org_id, user_id })
    }
}

fn header_uuid(parts: &Parts, name: &str) -> Result<Uuid, AppError> {
    let raw = parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Auth(format!("Missing {} header", name)))?;

    Uuid::parse_str(raw).map_err(|_| AppError::Auth(format!("Invalid {} header", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/playbooks");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn test_extracts_valid_headers() {
        let org_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let mut parts = parts_with_headers(&[
            ("x-org-id", &org_id.to_string()),
            ("x-user-id", &user_id.to_string()),
        ]);

        let context = OrgContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(context.org_id, org_id);
        assert_eq!(context.user_id, user_id);
    }

    #[tokio::test]
    async fn test_rejects_missing_org_header() {
        let mut parts = parts_with_headers(&[("x-user-id", &Uuid::new_v4().to_string())]);

        let err = OrgContext::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[tokio::test]
    async fn test_rejects_malformed_org_header() {
        let mut parts = parts_with_headers(&[
            ("x-org-id", "not-a-uuid"),
            ("x-user-id", &Uuid::new_v4().to_string()),
        ]);

        let err = OrgContext::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }
}
