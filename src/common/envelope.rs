// src/common/envelope.rs

use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

// Texto canônico do status HTTP que vai dentro do metadata.
pub fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

// Bloco de paginação devolvido em toda listagem.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub size: i64,
    pub page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub first: bool,
    pub last: bool,
}

impl Pagination {
    pub fn of(size: i64, page: i64, total_items: i64) -> Self {
        let total_pages = if total_items <= size {
            1
        } else {
            (total_items + size - 1) / size
        };

        Self {
            size,
            page,
            total_pages,
            total_items,
            first: page == 1,
            last: page == total_pages,
        }
    }
}

// Metadados que acompanham toda resposta, sucesso ou falha.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub timestamp: String,
    pub status: u16,
    pub status_text: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl Metadata {
    pub fn of(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            status: status.as_u16(),
            status_text: status_text(status).to_string(),
            message: message.into(),
            pagination: None,
        }
    }

    pub fn with_pagination(status: StatusCode, message: impl Into<String>, pagination: Pagination) -> Self {
        let mut metadata = Self::of(status, message);
        metadata.pagination = Some(pagination);
        metadata
    }
}

// O envelope uniforme `{ data, metadata }` de toda operação.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Wrapper<T> {
    pub data: Option<T>,
    pub metadata: Metadata,
}

impl<T> Wrapper<T> {
    pub fn of(data: T) -> Self {
        Self {
            data: Some(data),
            metadata: Metadata::of(StatusCode::OK, ""),
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            data: Some(data),
            metadata: Metadata::of(StatusCode::CREATED, ""),
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            data: Some(data),
            metadata: Metadata::with_pagination(StatusCode::OK, "", pagination),
        }
    }

    // Sentinela para listagem sem resultados: não é erro.
    pub fn empty() -> Self {
        Self {
            data: None,
            metadata: Metadata::of(StatusCode::NO_CONTENT, "Sem dados"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_single_page_when_items_fit() {
        let p = Pagination::of(10, 1, 7);
        assert_eq!(p.total_pages, 1);
        assert!(p.first);
        assert!(p.last);
    }

    #[test]
    fn pagination_rounds_total_pages_up() {
        let p = Pagination::of(10, 3, 25);
        assert_eq!(p.total_pages, 3);
        assert!(!p.first);
        assert!(p.last);
    }

    #[test]
    fn pagination_middle_page_is_neither_first_nor_last() {
        let p = Pagination::of(10, 2, 25);
        assert!(!p.first);
        assert!(!p.last);
    }

    #[test]
    fn pagination_exact_division() {
        let p = Pagination::of(5, 4, 20);
        assert_eq!(p.total_pages, 4);
        assert!(p.last);
    }

    #[test]
    fn empty_wrapper_carries_no_content_metadata() {
        let w: Wrapper<Vec<i32>> = Wrapper::empty();
        assert!(w.data.is_none());
        assert_eq!(w.metadata.status, 204);
        assert_eq!(w.metadata.message, "Sem dados");
    }

    #[test]
    fn status_text_matches_canonical_reason() {
        assert_eq!(status_text(StatusCode::CONFLICT), "Conflict");
        assert_eq!(status_text(StatusCode::NO_CONTENT), "No Content");
    }
}
