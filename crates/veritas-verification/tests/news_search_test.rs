//! Google News RSS parsing from a recorded feed.

use test_fixtures::fixture_path;
use veritas_core::config::SearchConfig;
use veritas_core::traits::INewsSearch;
use veritas_verification::search::parse_feed;
use veritas_verification::GoogleNewsSearch;

fn feed() -> Vec<u8> {
    std::fs::read(fixture_path("feeds/google_news.xml")).unwrap()
}

#[test]
fn parses_items_with_publisher_and_clean_snippet() {
    let results = parse_feed(&feed(), 10, 200).unwrap();
    assert_eq!(results.len(), 3);

    let first = &results[0];
    assert_eq!(first.title, "Central bank keeps rates on hold as inflation eases - Reuters");
    assert_eq!(first.source, "Reuters");
    assert_eq!(first.link, "https://news.google.com/rss/articles/CBMiReuters1?oc=5");
    assert!(!first.snippet.contains('<'));
    assert!(first.snippet.starts_with("Central bank keeps rates on hold"));

    assert_eq!(results[2].source, "Unknown");
}

#[test]
fn snippets_are_bounded() {
    let results = parse_feed(&feed(), 10, 200).unwrap();
    assert!(results.iter().all(|r| r.snippet.chars().count() <= 200));
    assert_eq!(results[1].snippet.chars().count(), 200);
}

#[test]
fn respects_max_results() {
    assert_eq!(parse_feed(&feed(), 2, 200).unwrap().len(), 2);
    assert!(parse_feed(&feed(), 0, 200).unwrap().is_empty());
}

#[test]
fn unreachable_endpoint_is_a_search_error() {
    let search = GoogleNewsSearch::new(SearchConfig {
        endpoint: "http://127.0.0.1:9/rss/search".into(),
        timeout_secs: 1,
        ..Default::default()
    });
    let err = search.search("\"anything\"", 5).unwrap_err();
    assert!(err.to_string().contains("news search failed"));
}
