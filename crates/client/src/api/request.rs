//! Document metadata API request types and validation.

use serde::{Serialize, Serializer};

fn csv_ids<S>(ids: &[i64], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let joined = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",");
    serializer.serialize_str(&joined)
}

/// Filter parameters for listing documents.
///
/// Every field is optional; an empty query lists the first page of all
/// documents visible to the caller.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DocumentQuery {
    /// Free-text search over title and tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Restrict to one category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,

    /// Restrict to documents carrying all of these tags (comma-separated
    /// on the wire).
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "csv_ids")]
    pub tag_ids: Vec<i64>,

    /// Business-group partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Zero-based page index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Results per page (1-100, server default 20).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl DocumentQuery {
    /// Validate the query parameters.
    ///
    /// Returns an error if any parameters are out of range or malformed.
    pub fn validate(&self) -> Result<(), crate::api::ApiError> {
        use crate::api::ApiError;

        if let Some(search) = &self.search
            && search.len() > 200
        {
            return Err(ApiError::InvalidQuery(format!(
                "search too long: {} chars (max 200)",
                search.len()
            )));
        }

        if let Some(page_size) = self.page_size
            && !(1..=100).contains(&page_size)
        {
            return Err(ApiError::InvalidQuery(format!("page_size out of range: {page_size} (1-100)")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_valid() {
        assert!(DocumentQuery::default().validate().is_ok());
    }

    #[test]
    fn test_search_too_long() {
        let query = DocumentQuery { search: Some("x".repeat(201)), ..Default::default() };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        let query = DocumentQuery { page_size: Some(0), ..Default::default() };
        assert!(query.validate().is_err());

        let query = DocumentQuery { page_size: Some(101), ..Default::default() };
        assert!(query.validate().is_err());

        let query = DocumentQuery { page_size: Some(100), ..Default::default() };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_tag_ids_serialize_as_csv() {
        let query = DocumentQuery { tag_ids: vec![3, 5, 8], ..Default::default() };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["tag_ids"], "3,5,8");
    }

    #[test]
    fn test_unset_fields_are_skipped() {
        let value = serde_json::to_value(DocumentQuery::default()).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 0);
    }
}
