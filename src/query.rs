//! List query processing for walk collections: filter, sort and paginate.
//!
//! Field-name matching is case-insensitive and permissive: an unrecognized
//! filter or sort field is ignored rather than rejected. Pagination bounds,
//! by contrast, are hard validation errors, never silent clamps.

use garde::Validate;
use serde::Deserialize;

use crate::models::WalkDetail;

/// WalkListParams
///
/// The raw query string of GET /walks. Defaults: first page, page size 1000.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct WalkListParams {
    #[garde(skip)]
    pub filter_on: Option<String>,
    #[garde(skip)]
    pub filter_query: Option<String>,
    #[garde(skip)]
    pub sort_by: Option<String>,
    #[garde(skip)]
    pub is_ascending: Option<bool>,
    #[garde(range(min = 1))]
    pub page_number: i64,
    #[garde(range(min = 1))]
    pub page_size: i64,
}

impl Default for WalkListParams {
    fn default() -> Self {
        Self {
            filter_on: None,
            filter_query: None,
            sort_by: None,
            is_ascending: None,
            page_number: 1,
            page_size: 1000,
        }
    }
}

/// The collection fields a filter may target. Only the walk name is
/// filterable today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Name,
}

/// The collection fields a sort may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    LengthInKm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// WalkListQuery
///
/// The resolved form of `WalkListParams`: unrecognized field names have been
/// dropped, the sort direction defaulted, and pagination validated upstream.
#[derive(Debug, Clone)]
pub struct WalkListQuery {
    pub filter: Option<(FilterField, String)>,
    pub sort: Option<(SortField, SortDirection)>,
    pub page_number: i64,
    pub page_size: i64,
}

impl WalkListQuery {
    /// Resolves wire parameters into a query. A filter applies only when both
    /// the field name and the query string are present.
    pub fn from_params(params: WalkListParams) -> Self {
        let filter = match (params.filter_on, params.filter_query) {
            (Some(field), Some(query)) if field.eq_ignore_ascii_case("name") => {
                Some((FilterField::Name, query))
            }
            _ => None,
        };

        let direction = if params.is_ascending.unwrap_or(true) {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        let sort = params.sort_by.and_then(|field| {
            if field.eq_ignore_ascii_case("name") {
                Some((SortField::Name, direction))
            } else if field.eq_ignore_ascii_case("lengthinkm") {
                Some((SortField::LengthInKm, direction))
            } else {
                None
            }
        });

        Self {
            filter,
            sort,
            page_number: params.page_number,
            page_size: params.page_size,
        }
    }

    /// Rows to skip: pagination applies after filtering and sorting.
    pub fn offset(&self) -> i64 {
        (self.page_number - 1) * self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// apply
    ///
    /// Reference implementation of the query semantics over an in-memory
    /// collection: retain rows whose filtered field contains the query string
    /// (case-insensitive substring), order by the sort field, then page.
    /// The SQL path in the Postgres repository composes the same semantics.
    pub fn apply(&self, mut walks: Vec<WalkDetail>) -> Vec<WalkDetail> {
        if let Some((FilterField::Name, query)) = &self.filter {
            let needle = query.to_lowercase();
            walks.retain(|detail| detail.walk.name.to_lowercase().contains(&needle));
        }

        if let Some((field, direction)) = &self.sort {
            match field {
                SortField::Name => walks.sort_by(|a, b| a.walk.name.cmp(&b.walk.name)),
                SortField::LengthInKm => {
                    walks.sort_by(|a, b| a.walk.length_km.total_cmp(&b.walk.length_km));
                }
            }
            if *direction == SortDirection::Descending {
                walks.reverse();
            }
        }

        walks
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit() as usize)
            .collect()
    }
}
