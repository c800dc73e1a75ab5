use std::time::Duration;

use labsync::Scheduler;

use crate::helpers::*;

#[tokio::test]
async fn shutdown_while_waiting_stops_without_firing() {
    let h = harness(&["Quiet"]);
    let s = Scheduler::parse("0 0 6 * * Mon", chrono_tz::Africa::Maputo).unwrap();
    let fired = s.run_until(&h.labsync, async {}).await;
    assert_eq!(fired, 0);
    assert!(h.controller.submissions().await.is_empty());
}

#[tokio::test]
async fn each_tick_runs_a_fresh_batch() {
    let h = harness(&["Quiet"]);
    let s = Scheduler::parse("* * * * * *", chrono_tz::UTC).unwrap();
    let fired = s
        .run_until(&h.labsync, tokio::time::sleep(Duration::from_millis(2500)))
        .await;
    assert!(fired >= 1, "fired = {fired}");
    assert_eq!(h.controller.submissions().await.len(), fired);
}
