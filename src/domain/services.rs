//! Collaborator contracts consumed by the engine.
//!
//! Storage, notification delivery, downstream progress lookup and reminder
//! scheduling all live outside this crate. Absence is `Ok(None)`; any other
//! failure is an `Err` that the engine surfaces unchanged and never retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::application::Application;
use crate::domain::types::{ActorUid, CaseId, CaseReference, Channel, LpaType, TimestampUtc};

/// Clock service for timestamp generation.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimestampUtc;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimestampUtc {
        TimestampUtc::now()
    }
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn get(&self, case_id: &CaseId) -> anyhow::Result<Option<Application>>;

    /// Persists the whole application atomically; the last write wins.
    async fn put(&self, application: &Application) -> anyhow::Result<()>;
}

/// Where a notification goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub uid: ActorUid,
    pub channel: Channel,
    pub email: String,
    pub mobile: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTemplate {
    CertificateProviderMeetingPrompt,
    CertificateProviderDetailsChanged,
    CertificateProviderInvite,
    DetailsChangedCertificateProviderNotStarted,
    DetailsChangedCertificateProviderStarted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub case_id: CaseId,
    pub case_reference: Option<CaseReference>,
    pub lpa_type: Option<LpaType>,
    pub donor_full_name: String,
    pub donor_first_names: String,
    pub certificate_provider_uid: ActorUid,
    pub certificate_provider_full_name: String,
    #[serde(default)]
    pub start_url: String,
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(
        &self,
        recipient: &Recipient,
        template: NotificationTemplate,
        payload: &NotificationPayload,
    ) -> anyhow::Result<()>;
}

/// How far a downstream party has got with their own steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartyProgress {
    pub confirmed_own_details: bool,
}

#[async_trait]
pub trait PartyProgressLookup: Send + Sync {
    /// `Ok(None)` when the downstream party has no record yet.
    async fn certificate_provider_progress(
        &self,
        case_id: &CaseId,
    ) -> anyhow::Result<Option<PartyProgress>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderAction {
    RemindCertificateProviderToComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub at: TimestampUtc,
    pub action: ReminderAction,
    pub case_id: CaseId,
}

#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    async fn schedule(&self, reminder: Reminder) -> anyhow::Result<()>;
}
