//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Every error renders the status/title/detail triple
//! - Error responses are spec-shaped JSON:API error documents
//! - Typed errors tunnel through `anyhow::Error` and back

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use restio::prelude::*;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_class_not_registered_returns_500() {
        let err = RestioError::ResourceClassNotRegistered {
            class_name: "demo::Task".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_resource_type_returns_404() {
        let err = RestioError::UnknownResourceType {
            resource_type: "widgets".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_resource_not_found_returns_404() {
        let err = RestioError::ResourceNotFound {
            resource_type: "tasks".to_string(),
            id: "42".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_already_exists_returns_409() {
        let err = RestioError::ResourceAlreadyExists {
            resource_type: "tasks".to_string(),
            id: "42".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_type_mismatch_returns_409() {
        let err = RestioError::ResourceTypeMismatch {
            expected: "tasks".to_string(),
            actual: "projects".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_document_returns_400() {
        let err = RestioError::InvalidDocument {
            message: "no primary data".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_returns_500() {
        let err = RestioError::internal("url construction failed");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Status / title / detail triple
// =============================================================================

mod triple_tests {
    use super::*;

    #[test]
    fn test_titles_are_stable_identifiers() {
        let cases = [
            (
                RestioError::ResourceClassNotRegistered {
                    class_name: "x".to_string(),
                },
                "RESOURCE_CLASS_NOT_REGISTERED",
            ),
            (
                RestioError::UnknownResourceType {
                    resource_type: "x".to_string(),
                },
                "UNKNOWN_RESOURCE_TYPE",
            ),
            (
                RestioError::ResourceNotFound {
                    resource_type: "x".to_string(),
                    id: "1".to_string(),
                },
                "RESOURCE_NOT_FOUND",
            ),
            (RestioError::internal("x"), "INTERNAL_SERVER_ERROR"),
        ];
        for (err, title) in cases {
            assert_eq!(err.title(), title);
        }
    }

    #[test]
    fn test_error_data_carries_the_triple() {
        let err = RestioError::ResourceClassNotRegistered {
            class_name: "demo::TaskProxy".to_string(),
        };
        let data = err.error_data();
        assert_eq!(data.status, "500");
        assert_eq!(data.title, "RESOURCE_CLASS_NOT_REGISTERED");
        assert!(data.detail.contains("demo::TaskProxy"));
    }

    #[test]
    fn test_internal_error_detail_is_free_text() {
        let err = RestioError::internal("registry construction failed");
        let data = err.error_data();
        assert_eq!(data.status, "500");
        assert_eq!(data.title, "INTERNAL_SERVER_ERROR");
        assert_eq!(data.detail, "Internal error: registry construction failed");
    }

    #[test]
    fn test_internal_error_chains_cause() {
        let cause = std::io::Error::other("connection reset");
        let err = RestioError::internal_with_cause("link building failed", cause);

        let source = std::error::Error::source(&err).expect("cause should be chained");
        assert!(source.to_string().contains("connection reset"));
    }
}

// =============================================================================
// Error documents over HTTP
// =============================================================================

mod response_tests {
    use super::*;

    #[tokio::test]
    async fn test_into_response_is_json_api_error_document() {
        let err = RestioError::ResourceNotFound {
            resource_type: "tasks".to_string(),
            id: "42".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some(MEDIA_TYPE)
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({
                "errors": [{
                    "status": "404",
                    "title": "RESOURCE_NOT_FOUND",
                    "detail": "tasks with id '42' not found"
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_internal_response_is_500_document() {
        let response = RestioError::internal("something broke").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["errors"][0]["title"], "INTERNAL_SERVER_ERROR");
    }
}

// =============================================================================
// anyhow tunneling
// =============================================================================

mod tunneling_tests {
    use super::*;

    #[test]
    fn test_typed_error_survives_anyhow_round_trip() {
        let typed = RestioError::ResourceAlreadyExists {
            resource_type: "tasks".to_string(),
            id: "t1".to_string(),
        };
        let tunneled: anyhow::Error = anyhow::Error::new(typed);
        let recovered: RestioError = tunneled.into();

        assert!(matches!(
            recovered,
            RestioError::ResourceAlreadyExists { .. }
        ));
        assert_eq!(recovered.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_plain_anyhow_becomes_internal() {
        let err: RestioError = anyhow::anyhow!("lock poisoned").into();
        assert!(matches!(err, RestioError::Internal { .. }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("lock poisoned"));
    }

    #[tokio::test]
    async fn test_repository_conflict_surfaces_typed_through_anyhow() {
        let repository = InMemoryResourceRepository::new("tasks");
        repository
            .create(Some("t1".to_string()), json!({}))
            .await
            .unwrap();

        let err = repository
            .create(Some("t1".to_string()), json!({}))
            .await
            .unwrap_err();
        let recovered: RestioError = err.into();
        assert_eq!(recovered.status_code(), StatusCode::CONFLICT);
        assert_eq!(recovered.title(), "RESOURCE_ALREADY_EXISTS");
    }
}
