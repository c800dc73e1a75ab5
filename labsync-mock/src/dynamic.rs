use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use labsync_core::connector::{DocumentRepository, NotificationGateway, TenantDirectory};
use labsync_core::{GatewayReceipt, LabsyncError, Notification, Tenant, UploadReceipt};

/// Instruction for how a call should behave.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(LabsyncError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

/// One observed gateway submission.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    /// The notification as received.
    pub notification: Notification,
    /// Whether the attachment file was on disk when `submit` ran.
    pub attachment_existed: bool,
    /// Attachment size in bytes, when it could be read.
    pub attachment_len: Option<u64>,
}

/// One observed repository upload.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    /// Target repository id.
    pub repo_id: String,
    /// Path handed to the repository.
    pub path: PathBuf,
    /// Whether the file was on disk when `upload` ran.
    pub existed: bool,
}

#[derive(Default)]
struct InternalState {
    // keyed by tenant repository link
    submit_rules: HashMap<String, MockBehavior<GatewayReceipt>>,
    // keyed by repository id
    upload_rules: HashMap<String, MockBehavior<UploadReceipt>>,
    tenants: Option<MockBehavior<Vec<Tenant>>>,
    submissions: Vec<SubmissionRecord>,
    uploads: Vec<UploadRecord>,
}

#[derive(Default)]
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) -> GaugeGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        GaugeGuard(self)
    }
}

// Decrements on drop so cancelled (timed-out) calls are not counted forever.
struct GaugeGuard<'a>(&'a Gauge);

impl Drop for GaugeGuard<'_> {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Controller handle used by tests to drive the dynamic doubles from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
    gauge: Arc<Gauge>,
}

impl DynamicMockController {
    /// Set the gateway behavior for notifications carrying `repo_link`.
    pub async fn set_submit_behavior(
        &self,
        repo_link: impl Into<String>,
        behavior: MockBehavior<GatewayReceipt>,
    ) {
        let mut guard = self.state.lock().await;
        guard.submit_rules.insert(repo_link.into(), behavior);
    }

    /// Set the upload behavior for a repository id.
    pub async fn set_upload_behavior(
        &self,
        repo_id: impl Into<String>,
        behavior: MockBehavior<UploadReceipt>,
    ) {
        let mut guard = self.state.lock().await;
        guard.upload_rules.insert(repo_id.into(), behavior);
    }

    /// Set the behavior of the tenant directory.
    pub async fn set_tenants_behavior(&self, behavior: MockBehavior<Vec<Tenant>>) {
        let mut guard = self.state.lock().await;
        guard.tenants = Some(behavior);
    }

    /// Every submission seen so far, in arrival order.
    pub async fn submissions(&self) -> Vec<SubmissionRecord> {
        self.state.lock().await.submissions.clone()
    }

    /// Every upload seen so far, in arrival order.
    pub async fn uploads(&self) -> Vec<UploadRecord> {
        self.state.lock().await.uploads.clone()
    }

    /// Highest number of gateway submissions observed in flight at once.
    #[must_use]
    pub fn peak_concurrent_submissions(&self) -> usize {
        self.gauge.peak.load(Ordering::SeqCst)
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        *guard = InternalState::default();
    }
}

/// Scriptable collaborators sharing one controller.
pub struct DynamicMock {
    /// Notification gateway double; defaults to `200 OK`.
    pub gateway: Arc<dyn NotificationGateway>,
    /// Document repository double; defaults to success.
    pub repository: Arc<dyn DocumentRepository>,
    /// Tenant directory double; empty until scripted.
    pub directory: Arc<dyn TenantDirectory>,
    /// Controller for all three.
    pub controller: DynamicMockController,
}

impl DynamicMock {
    /// Create the three doubles and their controller.
    #[must_use]
    pub fn new_with_controller() -> Self {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let gauge = Arc::new(Gauge::default());
        let inner = Arc::new(DynamicInner {
            state: Arc::clone(&state),
            gauge: Arc::clone(&gauge),
        });
        Self {
            gateway: Arc::clone(&inner) as Arc<dyn NotificationGateway>,
            repository: Arc::clone(&inner) as Arc<dyn DocumentRepository>,
            directory: inner as Arc<dyn TenantDirectory>,
            controller: DynamicMockController { state, gauge },
        }
    }
}

struct DynamicInner {
    state: Arc<Mutex<InternalState>>,
    gauge: Arc<Gauge>,
}

async fn resolve<T>(behavior: Option<MockBehavior<T>>, default: T) -> Result<T, LabsyncError> {
    match behavior {
        Some(MockBehavior::Return(v)) => Ok(v),
        Some(MockBehavior::Fail(e)) => Err(e),
        Some(MockBehavior::Hang) => std::future::pending().await,
        None => Ok(default),
    }
}

async fn file_len(path: &Path) -> Option<u64> {
    tokio::fs::metadata(path).await.ok().map(|m| m.len())
}

#[async_trait]
impl NotificationGateway for DynamicInner {
    async fn submit(&self, notification: &Notification) -> Result<GatewayReceipt, LabsyncError> {
        let _in_flight = self.gauge.enter();
        let attachment_len = match &notification.attachment {
            Some(a) => file_len(&a.path).await,
            None => None,
        };
        // Record and snapshot behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.submissions.push(SubmissionRecord {
                notification: notification.clone(),
                attachment_existed: attachment_len.is_some(),
                attachment_len,
            });
            guard.submit_rules.get(&notification.repo_link).cloned()
        };
        // let the scheduler interleave sibling tenants
        tokio::task::yield_now().await;
        resolve(
            behavior,
            GatewayReceipt {
                status: 200,
                body: "queued".to_string(),
            },
        )
        .await
    }
}

#[async_trait]
impl DocumentRepository for DynamicInner {
    async fn upload(&self, repo_id: &str, path: &Path) -> Result<UploadReceipt, LabsyncError> {
        let existed = file_len(path).await.is_some();
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.uploads.push(UploadRecord {
                repo_id: repo_id.to_string(),
                path: path.to_path_buf(),
                existed,
            });
            guard.upload_rules.get(repo_id).cloned()
        };
        resolve(behavior, UploadReceipt(format!("{repo_id}:ok"))).await
    }
}

#[async_trait]
impl TenantDirectory for DynamicInner {
    async fn reportable_tenants(&self) -> Result<Vec<Tenant>, LabsyncError> {
        let behavior = {
            let guard = self.state.lock().await;
            guard.tenants.clone()
        };
        resolve(behavior, Vec::new()).await
    }
}
