use proptest::prelude::*;

use crate::helpers::*;

const HEALTHY: &[&str] = &["Echo", "Ariel", "Quiet"];

#[tokio::test]
async fn sequential_baseline_submits_one_at_a_time() {
    let h = harness(HEALTHY);
    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(report.delivered(), 3);
    assert_eq!(h.controller.peak_concurrent_submissions(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn bounded_pool_never_exceeds_its_limit() {
    let h = harness_with(HEALTHY, |b, _| b.max_concurrent_tenants(2));
    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(report.delivered(), 3);
    let peak = h.controller.peak_concurrent_submissions();
    assert!((1..=2).contains(&peak), "peak = {peak}");
    assert!(h.temp_is_empty());
}

#[tokio::test]
async fn concurrent_failures_stay_isolated() {
    let h = harness_with(&["Echo", "Broken", "Ariel", "Quiet"], |b, _| {
        b.max_concurrent_tenants(4)
    });
    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.delivered(), 3);
    assert!(
        report
            .outcome("Broken")
            .unwrap()
            .error()
            .unwrap()
            .is_aggregation()
    );
    // each tenant's notification carries only its own recipients
    for s in h.controller.submissions().await {
        let slug = s.notification.repo_link.rsplit('/').next().unwrap().to_string();
        assert!(
            s.notification
                .recipients
                .iter()
                .all(|r| r.contains(&slug))
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn every_tenant_is_attempted_exactly_once(limit in 1usize..6) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (outcomes, submissions) = rt.block_on(async {
            let h = harness_with(&["Echo", "Broken", "Ariel", "Quiet"], |b, _| {
                b.max_concurrent_tenants(limit)
            });
            let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
            let mut names: Vec<String> =
                report.outcomes.into_iter().map(|o| o.tenant).collect();
            names.sort();
            (names, h.controller.submissions().await.len())
        });
        prop_assert_eq!(outcomes, vec!["Ariel", "Broken", "Echo", "Quiet"]);
        prop_assert_eq!(submissions, 3);
    }
}
