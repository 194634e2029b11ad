//! Parsing of query-string primitives shared by the listing routes.

use chrono::NaiveDate;

use crate::error::ApiError;

/// Parses a comma-separated id list such as `"1,2,5"`.
///
/// A missing or blank value means "no restriction" and yields an empty list.
pub fn id_list<T: From<i64>>(field: &str, value: Option<&str>) -> Result<Vec<T>, ApiError> {
    split(value)
        .map(|part| {
            part.parse::<i64>().map(T::from).map_err(|_| {
                ApiError::BadRequest(format!("Invalid {field}: '{part}' is not an id"))
            })
        })
        .collect()
}

/// Parses a comma-separated list of document numbers.
pub fn text_list(value: Option<&str>) -> Vec<String> {
    split(value).map(str::to_string).collect()
}

/// Parses an optional ISO date (`YYYY-MM-DD`); blank means absent.
pub fn date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| ApiError::BadRequest(format!("Invalid {field}: {e}"))),
    }
}

fn split(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ResourceId;

    #[test]
    fn test_id_list() {
        let ids: Vec<ResourceId> = id_list("resource_ids", Some("3, 1,,2")).unwrap();
        assert_eq!(
            ids,
            vec![ResourceId::new(3), ResourceId::new(1), ResourceId::new(2)]
        );

        let ids: Vec<ResourceId> = id_list("resource_ids", None).unwrap();
        assert!(ids.is_empty());

        let result: Result<Vec<ResourceId>, _> = id_list("resource_ids", Some("1,x"));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_text_list() {
        assert_eq!(text_list(Some(" R-1 ,R-2")), vec!["R-1", "R-2"]);
        assert!(text_list(Some("")).is_empty());
    }

    #[test]
    fn test_date() {
        assert_eq!(
            date("date_from", Some("2024-02-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(date("date_from", Some("")).unwrap(), None);
        assert!(date("date_from", Some("01/02/2024")).is_err());
    }
}
