// TestDependencies - mock implementations for testing
//
// Provides in-memory and recording collaborators that can be injected into
// ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{BaseCrmSync, BaseOtpStore, BaseSmsGateway, DeliveryResult, ServerDeps};
use crate::domains::otp::OtpRecord;

// =============================================================================
// In-memory OTP store
// =============================================================================

/// HashMap-backed store with switches to simulate database failures
pub struct InMemoryOtpStore {
    records: Mutex<HashMap<String, OtpRecord>>,
    fail_upserts: AtomicBool,
    fail_reads: AtomicBool,
    upsert_count: AtomicUsize,
    delete_count: AtomicUsize,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_upserts: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            upsert_count: AtomicUsize::new(0),
            delete_count: AtomicUsize::new(0),
        }
    }

    /// Place a record directly, e.g. with a backdated `issued_at`
    pub async fn insert_record(&self, record: OtpRecord) {
        self.records
            .lock()
            .await
            .insert(record.phone.clone(), record);
    }

    /// Current record for a phone without going through the trait
    pub async fn get(&self, phone: &str) -> Option<OtpRecord> {
        self.records.lock().await.get(phone).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    pub fn set_fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of upsert calls, including failed ones
    pub fn upsert_count(&self) -> usize {
        self.upsert_count.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.delete_count.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryOtpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseOtpStore for InMemoryOtpStore {
    async fn upsert(&self, record: &OtpRecord) -> Result<()> {
        self.upsert_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_upserts.load(Ordering::SeqCst) {
            anyhow::bail!("simulated database failure on upsert");
        }
        self.records
            .lock()
            .await
            .insert(record.phone.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, phone: &str) -> Result<Option<OtpRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("simulated database failure on read");
        }
        Ok(self.records.lock().await.get(phone).cloned())
    }

    async fn delete(&self, phone: &str) -> Result<()> {
        self.delete_count.fetch_add(1, Ordering::SeqCst);
        self.records.lock().await.remove(phone);
        Ok(())
    }
}

// =============================================================================
// Mock SMS gateway
// =============================================================================

/// Arguments captured from a send call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub phone: String,
    pub message: String,
}

/// Records every message and answers with queued results (Ok when empty)
pub struct MockSmsGateway {
    responses: Mutex<VecDeque<DeliveryResult>>,
    sent: Mutex<Vec<SentSms>>,
}

impl MockSmsGateway {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Queue the result for the next send call
    pub async fn push_response(&self, response: DeliveryResult) {
        self.responses.lock().await.push_back(response);
    }

    pub async fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().await.clone()
    }

    pub async fn send_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Extract the six digit code from the most recent message
    pub async fn last_code(&self) -> Option<String> {
        let sent = self.sent.lock().await;
        let message = &sent.last()?.message;
        message
            .split(|c: char| !c.is_ascii_digit())
            .find(|part| part.len() == 6)
            .map(str::to_string)
    }
}

impl Default for MockSmsGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSmsGateway for MockSmsGateway {
    async fn send(&self, phone: &str, message: &str) -> DeliveryResult {
        self.sent.lock().await.push(SentSms {
            phone: phone.to_string(),
            message: message.to_string(),
        });
        self.responses.lock().await.pop_front().unwrap_or(Ok(()))
    }
}

// =============================================================================
// Mock CRM sync
// =============================================================================

pub struct MockCrmSync {
    notified: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MockCrmSync {
    pub fn new() -> Self {
        Self {
            notified: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn notified(&self) -> Vec<String> {
        self.notified.lock().await.clone()
    }
}

impl Default for MockCrmSync {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseCrmSync for MockCrmSync {
    async fn notify(&self, phone: &str) -> Result<()> {
        self.notified.lock().await.push(phone.to_string());
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("simulated CRM outage");
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of mocks plus the ServerDeps wired to them
#[derive(Clone)]
pub struct TestDependencies {
    pub store: Arc<InMemoryOtpStore>,
    pub sms: Arc<MockSmsGateway>,
    pub crm: Arc<MockCrmSync>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryOtpStore::new()),
            sms: Arc::new(MockSmsGateway::new()),
            crm: Arc::new(MockCrmSync::new()),
        }
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(self.store.clone(), self.sms.clone(), self.crm.clone())
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
