mod common;

use common::walk_named;
use garde::Validate;
use trail_portal::query::{
    FilterField, SortDirection, SortField, WalkListParams, WalkListQuery,
};

fn params(overrides: WalkListParams) -> WalkListQuery {
    WalkListQuery::from_params(overrides)
}

// --- Parameter Resolution ---

#[test]
fn test_defaults_resolve_to_first_page_no_filter_no_sort() {
    let query = params(WalkListParams::default());

    assert!(query.filter.is_none());
    assert!(query.sort.is_none());
    assert_eq!(query.page_number, 1);
    assert_eq!(query.page_size, 1000);
    assert_eq!(query.offset(), 0);
}

#[test]
fn test_filter_field_name_matching_is_case_insensitive() {
    let query = params(WalkListParams {
        filter_on: Some("nAmE".to_string()),
        filter_query: Some("Track".to_string()),
        ..WalkListParams::default()
    });

    assert_eq!(query.filter, Some((FilterField::Name, "Track".to_string())));
}

#[test]
fn test_unrecognized_filter_field_is_ignored_not_an_error() {
    let query = params(WalkListParams {
        filter_on: Some("Description".to_string()),
        filter_query: Some("coastal".to_string()),
        ..WalkListParams::default()
    });

    // The filter is dropped and the request proceeds unfiltered.
    assert!(query.filter.is_none());
}

#[test]
fn test_filter_requires_both_field_and_query() {
    let query = params(WalkListParams {
        filter_on: Some("Name".to_string()),
        filter_query: None,
        ..WalkListParams::default()
    });

    assert!(query.filter.is_none());
}

#[test]
fn test_sort_direction_defaults_to_ascending() {
    let query = params(WalkListParams {
        sort_by: Some("LengthInKm".to_string()),
        is_ascending: None,
        ..WalkListParams::default()
    });

    assert_eq!(
        query.sort,
        Some((SortField::LengthInKm, SortDirection::Ascending))
    );
}

#[test]
fn test_unrecognized_sort_field_is_ignored() {
    let query = params(WalkListParams {
        sort_by: Some("Popularity".to_string()),
        ..WalkListParams::default()
    });

    assert!(query.sort.is_none());
}

#[test]
fn test_page_bounds_are_validation_errors_not_clamps() {
    let zero_page = WalkListParams {
        page_number: 0,
        ..WalkListParams::default()
    };
    assert!(zero_page.validate().is_err());

    let zero_size = WalkListParams {
        page_size: 0,
        ..WalkListParams::default()
    };
    assert!(zero_size.validate().is_err());

    assert!(WalkListParams::default().validate().is_ok());
}

// --- Apply Semantics ---

#[test]
fn test_filter_on_name_keeps_matching_rows_in_order() {
    let rows = vec![
        walk_named("Track A", 5.0),
        walk_named("Hill Path", 2.0),
        walk_named("Track B", 9.0),
    ];

    let query = params(WalkListParams {
        filter_on: Some("Name".to_string()),
        filter_query: Some("Track".to_string()),
        ..WalkListParams::default()
    });

    let names: Vec<String> = query
        .apply(rows)
        .into_iter()
        .map(|d| d.walk.name)
        .collect();
    assert_eq!(names, vec!["Track A", "Track B"]);
}

#[test]
fn test_filter_match_is_case_insensitive_substring() {
    let rows = vec![walk_named("Coastal Track", 5.0), walk_named("Summit", 2.0)];

    let query = params(WalkListParams {
        filter_on: Some("Name".to_string()),
        filter_query: Some("track".to_string()),
        ..WalkListParams::default()
    });

    let result = query.apply(rows);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].walk.name, "Coastal Track");
}

#[test]
fn test_sort_by_length_descending() {
    let rows = vec![
        walk_named("Short", 1.0),
        walk_named("Long", 20.0),
        walk_named("Middle", 10.0),
    ];

    let query = params(WalkListParams {
        sort_by: Some("LengthInKm".to_string()),
        is_ascending: Some(false),
        ..WalkListParams::default()
    });

    let names: Vec<String> = query
        .apply(rows)
        .into_iter()
        .map(|d| d.walk.name)
        .collect();
    assert_eq!(names, vec!["Long", "Middle", "Short"]);
}

#[test]
fn test_sort_by_name_ascending() {
    let rows = vec![
        walk_named("Charlie", 1.0),
        walk_named("Alpha", 2.0),
        walk_named("Bravo", 3.0),
    ];

    let query = params(WalkListParams {
        sort_by: Some("Name".to_string()),
        is_ascending: Some(true),
        ..WalkListParams::default()
    });

    let names: Vec<String> = query
        .apply(rows)
        .into_iter()
        .map(|d| d.walk.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);
}

#[test]
fn test_pagination_skips_and_takes_after_filter_and_sort() {
    // Twelve rows, page size five: page 1 holds rows 1-5, page 3 rows 11-12.
    let rows: Vec<_> = (1..=12)
        .map(|i| walk_named(&format!("Walk {i:02}"), i as f64))
        .collect();

    let page_one = params(WalkListParams {
        sort_by: Some("Name".to_string()),
        page_number: 1,
        page_size: 5,
        ..WalkListParams::default()
    });
    let names: Vec<String> = page_one
        .apply(rows.clone())
        .into_iter()
        .map(|d| d.walk.name)
        .collect();
    assert_eq!(
        names,
        vec!["Walk 01", "Walk 02", "Walk 03", "Walk 04", "Walk 05"]
    );

    let page_three = params(WalkListParams {
        sort_by: Some("Name".to_string()),
        page_number: 3,
        page_size: 5,
        ..WalkListParams::default()
    });
    let names: Vec<String> = page_three
        .apply(rows)
        .into_iter()
        .map(|d| d.walk.name)
        .collect();
    assert_eq!(names, vec!["Walk 11", "Walk 12"]);
}

#[test]
fn test_page_past_the_end_is_empty() {
    let rows = vec![walk_named("Only", 1.0)];

    let query = params(WalkListParams {
        page_number: 5,
        page_size: 10,
        ..WalkListParams::default()
    });

    assert!(query.apply(rows).is_empty());
}
