//! Tests for page size, sort, and filter parsing.

use std::time::Duration;

use rstest::rstest;

use crate::AlarmdeskConfig;
use crate::api::ApiError;
use crate::table::{PageSize, Sort, SortDirection};

#[rstest]
fn defaults_match_the_list_views() {
    let config = AlarmdeskConfig::default();

    assert_eq!(config.page, 1);
    assert_eq!(config.page_size(), Ok(PageSize::Ten));
    assert_eq!(config.search_debounce(), Duration::from_millis(400));
    assert_eq!(config.request_timeout(), Duration::from_secs(20));
    assert_eq!(config.sort_request(), Ok(None));
    assert_eq!(config.filter_assignments(), Ok(Vec::new()));
}

#[rstest]
#[case(25, Some(PageSize::TwentyFive))]
#[case(200, Some(PageSize::TwoHundred))]
#[case(30, None)]
fn page_size_accepts_offered_sizes(#[case] rows: u32, #[case] expected: Option<PageSize>) {
    let config = AlarmdeskConfig {
        page_size: rows,
        ..Default::default()
    };

    assert_eq!(config.page_size().ok(), expected);
}

#[rstest]
#[case("-next_service_date", Some(Sort { field: "next_service_date".to_owned(), direction: SortDirection::Desc }))]
#[case("address", Some(Sort::ascending("address")))]
#[case("  ", None)]
fn sort_request_parses_ordering_notation(#[case] raw: &str, #[case] expected: Option<Sort>) {
    let config = AlarmdeskConfig {
        sort: Some(raw.to_owned()),
        ..Default::default()
    };

    assert_eq!(config.sort_request(), Ok(expected));
}

#[rstest]
fn sort_request_rejects_bare_dash() {
    let config = AlarmdeskConfig {
        sort: Some("-".to_owned()),
        ..Default::default()
    };

    assert!(config.sort_request().is_err());
}

#[rstest]
fn filter_assignments_split_on_semicolons() {
    let config = AlarmdeskConfig {
        filters: Some("status = overdue; next_service=2024-01-01..2024-03-31;".to_owned()),
        ..Default::default()
    };

    assert_eq!(
        config.filter_assignments(),
        Ok(vec![
            ("status".to_owned(), "overdue".to_owned()),
            (
                "next_service".to_owned(),
                "2024-01-01..2024-03-31".to_owned()
            ),
        ])
    );
}

#[rstest]
#[case("status")]
#[case("=open")]
fn filter_assignments_reject_malformed_entries(#[case] raw: &str) {
    let config = AlarmdeskConfig {
        filters: Some(raw.to_owned()),
        ..Default::default()
    };

    assert!(matches!(
        config.filter_assignments(),
        Err(ApiError::Configuration { .. })
    ));
}
