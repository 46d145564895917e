//! Property-based tests for the dashboard metrics and session pagination.
//!
//! - Success rate stays within [0, 100] and matches the correct/total ratio
//! - Streak equals the backward run from the latest active day
//! - Paging through all pages rebuilds the full listing, newest first

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use lang_portal_backend::services::dashboard::{consecutive_days_ending_at_latest, MetricsEngine};
use lang_portal_backend::services::session::SessionSummarizer;
use lang_portal_backend::services::{total_pages, PageRequest};

mod common;

use common::{at, insert_activity, insert_group, insert_review, insert_session, insert_word};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

fn reference_streak(offsets: &BTreeSet<u16>) -> i64 {
    // offsets count days backwards from a fixed anchor, so the smallest one is the latest day
    let Some(&latest) = offsets.iter().next() else {
        return 0;
    };
    let mut streak = 0;
    let mut expected = latest;
    for &offset in offsets {
        if offset != expected {
            break;
        }
        streak += 1;
        expected += 1;
    }
    streak
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn streak_matches_backward_run(offsets in proptest::collection::btree_set(0u16..60, 0..30)) {
        let anchor = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let dates: BTreeSet<NaiveDate> = offsets
            .iter()
            .map(|&back| anchor - Duration::days(back as i64))
            .collect();

        prop_assert_eq!(consecutive_days_ending_at_latest(&dates), reference_streak(&offsets));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn success_rate_is_bounded(answers in proptest::collection::vec(any::<bool>(), 0..40)) {
        runtime().block_on(async {
            let db = common::create_test_db().await;
            let pool = db.pool();
            let group = insert_group(pool, "Basics").await;
            let activity = insert_activity(pool, "Quiz").await;
            let word = insert_word(pool, "merci", "thank you").await;
            let t = at(2026, 1, 1, 9, 0, 0);
            let session = insert_session(pool, group, activity, t).await;
            for &correct in &answers {
                insert_review(pool, word, session, correct, t).await;
            }

            let rate = MetricsEngine::new(db.store.clone())
                .success_rate()
                .await
                .expect("success rate");

            prop_assert!((0.0..=100.0).contains(&rate));
            if answers.is_empty() {
                prop_assert_eq!(rate, 0.0);
            } else {
                let correct = answers.iter().filter(|&&c| c).count() as f64;
                let expected = correct / answers.len() as f64 * 100.0;
                prop_assert!((rate - expected).abs() < 1e-9);
            }
            Ok(())
        })?;
    }

    #[test]
    fn pages_rebuild_the_full_listing(total in 0i64..20, per_page in 1i64..8) {
        runtime().block_on(async {
            let db = common::create_test_db().await;
            let pool = db.pool();
            let group = insert_group(pool, "Basics").await;
            let activity = insert_activity(pool, "Quiz").await;
            let base = at(2026, 1, 1, 9, 0, 0);

            let mut expected = Vec::new();
            for i in 0..total {
                // every third session shares a timestamp with its predecessor
                let minutes = i - i64::from(i % 3 == 2);
                expected.push(insert_session(pool, group, activity, base + Duration::minutes(minutes)).await);
            }

            let sessions = SessionSummarizer::new(db.store.clone());
            let first = sessions
                .list_summaries(PageRequest::new(1, per_page))
                .await
                .expect("first page");
            let pages = first.pagination().total_pages;
            prop_assert_eq!(pages, total_pages(total, per_page));
            prop_assert_eq!(pages, (total + per_page - 1) / per_page);

            let mut seen: Vec<i64> = first.items.iter().map(|s| s.id).collect();
            for page in 2..=pages {
                let next = sessions
                    .list_summaries(PageRequest::new(page, per_page))
                    .await
                    .expect("page");
                seen.extend(next.items.iter().map(|s| s.id));
            }

            // newest first; equal timestamps by descending id
            expected.reverse();
            prop_assert_eq!(seen, expected);
            Ok(())
        })?;
    }
}
