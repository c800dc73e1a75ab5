// Shared harness so tests can `use crate::helpers::*;`
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use labsync::{Labsync, LabsyncBuilder};
use labsync_mock::{DynamicMock, DynamicMockController, MockResultsSource, MockTenantDirectory};
use tempfile::TempDir;

// ---------- Fixture tenant links (gateway rules are keyed by link) ----------

pub const ECHO_LINK: &str = "https://files.example.org/d/echo";
pub const ARIEL_LINK: &str = "https://files.example.org/d/ariel";
pub const QUIET_LINK: &str = "https://files.example.org/d/quiet";
pub const BROKEN_LINK: &str = "https://files.example.org/d/broken";

/// Attachment produced for "Echo" over the fixture week.
pub const ECHO_ATTACHMENT: &str = "CSaude_Resultados_SI-SESP_ECHO_01-01-2023_a_07-01-2023.xlsx";

/// A Friday whose previous week (2023-01-01..2023-01-07) holds the fixture results.
pub fn fixture_friday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 13).unwrap()
}

/// A `Labsync` wired to the fixture source and scriptable gateway/repository.
pub struct Harness {
    pub labsync: Labsync,
    pub controller: DynamicMockController,
    /// Parent of every scoped temporary artifact.
    pub temp: TempDir,
}

impl Harness {
    /// True when no temporary artifact is left behind.
    pub fn temp_is_empty(&self) -> bool {
        std::fs::read_dir(self.temp.path()).unwrap().count() == 0
    }
}

fn base_builder(tenants: &[&str], mock: &DynamicMock, temp: &Path) -> LabsyncBuilder {
    Labsync::builder()
        .with_tenant_directory(Arc::new(MockTenantDirectory::only(tenants)))
        .with_results_source(Arc::new(MockResultsSource::new()))
        .with_gateway(Arc::clone(&mock.gateway))
        .with_repository(Arc::clone(&mock.repository))
        .call_timeout(Duration::from_secs(2))
        .temp_dir(temp)
}

/// Harness over the named fixture tenants with default settings.
pub fn harness(tenants: &[&str]) -> Harness {
    harness_with(tenants, |b, _| b)
}

/// Harness over the named fixture tenants, letting the test adjust the builder.
pub fn harness_with(
    tenants: &[&str],
    tweak: impl FnOnce(LabsyncBuilder, &DynamicMock) -> LabsyncBuilder,
) -> Harness {
    let mock = DynamicMock::new_with_controller();
    let temp = tempfile::tempdir().unwrap();
    let builder = tweak(base_builder(tenants, &mock, temp.path()), &mock);
    let labsync = builder.build().unwrap();
    Harness {
        labsync,
        controller: mock.controller,
        temp,
    }
}
