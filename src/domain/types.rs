//! Strongly typed domain primitives for the application aggregate.
//!
//! These newtypes and answer enums give every recorded answer a closed set of
//! values. They are used throughout derivation, navigation and review.

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for one in-progress application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl CaseId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CaseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CaseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Universal case reference, issued once the application is published.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseReference(pub String);

impl CaseReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CaseReference {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Stable per-member identifier, independent of roster position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorUid(pub Uuid);

impl ActorUid {
    /// Creates a new random member identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ActorUid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActorUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UTC timestamp wrapper for consistent serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimestampUtc(pub DateTime<Utc>);

impl TimestampUtc {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the timestamp as an RFC3339 string.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Adds calendar months, saturating at the last representable date.
    pub fn plus_months(&self, months: u32) -> Self {
        Self(
            self.0
                .checked_add_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

/// Content fingerprint over the reviewable subset of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentHash(pub u64);

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LpaType {
    PropertyAndAffairs,
    PersonalWelfare,
}

/// How a group of attorneys makes decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionMode {
    Solely,
    Jointly,
    JointlyAndSeverally,
    JointlyForSomeSeverallyForOthers,
}

/// Recorded decision mode for a collection.
///
/// `mode_changed` records whether the most recent answer changed the mode; it
/// drives the one-off explanation pages and is not reviewable content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Decisions {
    pub mode: Option<DecisionMode>,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub mode_changed: bool,
}

impl Decisions {
    /// A decision for a group: any mode except `Solely`, with details for the mixed mode.
    pub fn is_complete_for_group(&self) -> bool {
        match self.mode {
            None | Some(DecisionMode::Solely) => false,
            Some(DecisionMode::JointlyForSomeSeverallyForOthers) => !self.details.trim().is_empty(),
            Some(_) => true,
        }
    }

    pub fn is_mode(&self, mode: DecisionMode) -> bool {
        self.mode == Some(mode)
    }

    pub fn is_empty(&self) -> bool {
        self.mode.is_none() && self.details.is_empty()
    }

    pub fn clear(&mut self) {
        self.mode = None;
        self.details.clear();
        self.mode_changed = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanBeUsedWhen {
    HasCapacity,
    CapacityLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeSustainingTreatment {
    OptionA,
    OptionB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementStepIn {
    WhenOneCanNoLongerAct,
    WhenAllCanNoLongerAct,
    AnotherWay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Personally,
    Professionally,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipLength {
    LessThanTwoYears,
    GreaterThanEqualToTwoYears,
}

/// Preferred channel for a party to carry out their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Paper,
    Online,
}

/// Outcome reported by the external identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStatus {
    Confirmed,
    Failed,
    InsufficientEvidence,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityOption {
    OneLogin,
    PostOffice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoVoucherDecision {
    ProveOwnIdentity,
    SelectNewVoucher,
    WithdrawLpa,
    ApplyToCourtOfProtection,
}

/// Fee the applicant is paying or applying for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    FullFee,
    HalfFee,
    NoFee,
    HardshipFee,
    RepeatApplicationFee,
}

impl FeeType {
    /// Whether the fee needs supporting evidence and a caseworker decision.
    pub fn requires_evidence(self) -> bool {
        !matches!(self, FeeType::FullFee)
    }
}

/// Caseworker decision on a reduced-fee application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeDecision {
    Approved,
    Denied,
    MoreEvidenceRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceDelivery {
    Upload,
    Post,
}
