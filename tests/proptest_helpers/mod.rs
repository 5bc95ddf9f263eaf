#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use transkribus_iiif::page::{LineBox, Point};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Page-space point, including slightly negative and off-page positions.
pub fn arb_point() -> impl Strategy<Value = Point> {
    (-50.0f64..5000.0, -50.0f64..5000.0).prop_map(|(x, y)| Point::new(x, y))
}

pub fn arb_polygon(max_points: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(arb_point(), 0..=max_points)
}

/// Box whose origin and extent may fall outside the page.
pub fn arb_line_box() -> impl Strategy<Value = LineBox> {
    (-100i64..6000, -100i64..6000, -20i64..3000, -20i64..500)
        .prop_map(|(x, y, w, h)| LineBox::new(x, y, w, h))
}

pub fn arb_page_size() -> impl Strategy<Value = (i64, i64)> {
    (1i64..5000, 1i64..5000)
}

/// Line text with multi-byte characters mixed in.
pub fn arb_line_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!['a', 'Z', ' ', 'é', 'ß', '€', '7', ';']),
        0..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}
