use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: Option<T>, message: &str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.to_string()),
        }
    }

}

impl ApiResponse<()> {
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

/// 422 body: the field-error map sits at the top level of the envelope,
/// not inside `data`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub success: bool,
    pub message: String,
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationErrorBody {
    pub fn new(errors: HashMap<String, Vec<String>>) -> Self {
        Self {
            success: false,
            message: "Validation failed".to_string(),
            errors,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
}

impl PageMeta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            current_page: page,
            per_page,
            total,
            last_page,
        }
    }
}

/// List payload wrapping rows together with their page metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        Self {
            items,
            meta: PageMeta::new(page, per_page, total),
        }
    }
}

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Normalized (page, per_page, limit, offset). Out-of-range values are
/// clamped rather than rejected. List query structs carry their own
/// `page`/`per_page` fields; flattening a shared struct does not survive
/// the urlencoded deserializer.
pub fn resolve_page(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let offset = (page - 1) * per_page;
    (page, per_page, per_page, offset)
}

/// Accumulates field-level validation failures into the 422 payload shape.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn require_non_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "must not be empty");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_meta_rounds_last_page_up() {
        let meta = PageMeta::new(1, 20, 41);
        assert_eq!(meta.last_page, 3);

        let meta = PageMeta::new(1, 20, 40);
        assert_eq!(meta.last_page, 2);

        let meta = PageMeta::new(1, 20, 0);
        assert_eq!(meta.last_page, 1);
    }

    #[test]
    fn resolve_page_clamps_inputs() {
        let (page, per_page, limit, offset) = resolve_page(Some(0), Some(1000));
        assert_eq!(page, 1);
        assert_eq!(per_page, MAX_PER_PAGE);
        assert_eq!(limit, MAX_PER_PAGE);
        assert_eq!(offset, 0);

        let (_, _, limit, offset) = resolve_page(Some(3), None);
        assert_eq!(limit, DEFAULT_PER_PAGE);
        assert_eq!(offset, 40);
    }

    #[test]
    fn field_errors_collects_per_field() {
        let mut errors = FieldErrors::new();
        errors.require_non_empty("name", "  ");
        errors.add("email", "must be a valid email");
        errors.add("email", "already taken");

        match errors.into_result() {
            Err(AppError::Validation(map)) => {
                assert_eq!(map["name"], vec!["must not be empty"]);
                assert_eq!(map["email"].len(), 2);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
