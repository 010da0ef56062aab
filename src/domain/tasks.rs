//! Per-section completion states.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TaskState {
    pub fn is_completed(self) -> bool {
        self == TaskState::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    #[default]
    NotStarted,
    Pending,
    InProgress,
    Approved,
    Denied,
    MoreEvidenceRequired,
    Completed,
}

impl PaymentState {
    pub fn is_completed(self) -> bool {
        self == PaymentState::Completed
    }

    /// Paid in full, or waiting on a caseworker with nothing more to pay now.
    pub fn is_completed_or_pending(self) -> bool {
        matches!(self, PaymentState::Completed | PaymentState::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityState {
    #[default]
    NotStarted,
    InProgress,
    Pending,
    Problem,
    Completed,
}

impl IdentityState {
    pub fn is_completed(self) -> bool {
        self == IdentityState::Completed
    }
}

/// A derived state for any section, keeping the specialised variants distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "state", rename_all = "snake_case")]
pub enum SectionState {
    Task(TaskState),
    Payment(PaymentState),
    Identity(IdentityState),
}

impl SectionState {
    pub fn is_completed(self) -> bool {
        match self {
            SectionState::Task(s) => s.is_completed(),
            SectionState::Payment(s) => s.is_completed(),
            SectionState::Identity(s) => s.is_completed(),
        }
    }
}

/// The fixed set of sections an application is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    YourDetails,
    ChooseAttorneys,
    ChooseReplacementAttorneys,
    UsageConditions,
    Restrictions,
    CertificateProvider,
    PeopleToNotify,
    AddCorrespondent,
    ChooseYourSignatory,
    CheckYourLpa,
    PayForLpa,
    ConfirmYourIdentity,
    SignTheLpa,
}

impl Section {
    pub const ALL: [Section; 13] = [
        Section::YourDetails,
        Section::ChooseAttorneys,
        Section::ChooseReplacementAttorneys,
        Section::UsageConditions,
        Section::Restrictions,
        Section::CertificateProvider,
        Section::PeopleToNotify,
        Section::AddCorrespondent,
        Section::ChooseYourSignatory,
        Section::CheckYourLpa,
        Section::PayForLpa,
        Section::ConfirmYourIdentity,
        Section::SignTheLpa,
    ];

    /// Sections whose answers make up the document and are covered by review.
    pub fn is_reviewable(self) -> bool {
        !matches!(
            self,
            Section::CheckYourLpa
                | Section::PayForLpa
                | Section::ConfirmYourIdentity
                | Section::SignTheLpa
        )
    }

    /// Sections whose derivation reads this section's answers.
    pub fn dependents(self) -> &'static [Section] {
        match self {
            Section::YourDetails => &[
                Section::UsageConditions,
                Section::ChooseYourSignatory,
                Section::ConfirmYourIdentity,
                Section::SignTheLpa,
                Section::CheckYourLpa,
            ],
            Section::ChooseAttorneys => {
                &[Section::ChooseReplacementAttorneys, Section::CheckYourLpa]
            }
            Section::ChooseReplacementAttorneys
            | Section::UsageConditions
            | Section::Restrictions
            | Section::CertificateProvider
            | Section::PeopleToNotify
            | Section::AddCorrespondent
            | Section::ChooseYourSignatory => &[Section::CheckYourLpa],
            Section::CheckYourLpa => &[],
            Section::PayForLpa => &[],
            Section::ConfirmYourIdentity => &[],
            Section::SignTheLpa => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::YourDetails => "your_details",
            Section::ChooseAttorneys => "choose_attorneys",
            Section::ChooseReplacementAttorneys => "choose_replacement_attorneys",
            Section::UsageConditions => "usage_conditions",
            Section::Restrictions => "restrictions",
            Section::CertificateProvider => "certificate_provider",
            Section::PeopleToNotify => "people_to_notify",
            Section::AddCorrespondent => "add_correspondent",
            Section::ChooseYourSignatory => "choose_your_signatory",
            Section::CheckYourLpa => "check_your_lpa",
            Section::PayForLpa => "pay_for_lpa",
            Section::ConfirmYourIdentity => "confirm_your_identity",
            Section::SignTheLpa => "sign_the_lpa",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored per-section states.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tasks {
    pub your_details: TaskState,
    pub choose_attorneys: TaskState,
    pub choose_replacement_attorneys: TaskState,
    pub usage_conditions: TaskState,
    pub restrictions: TaskState,
    pub certificate_provider: TaskState,
    pub people_to_notify: TaskState,
    pub add_correspondent: TaskState,
    pub choose_your_signatory: TaskState,
    pub check_your_lpa: TaskState,
    pub pay_for_lpa: PaymentState,
    pub confirm_your_identity: IdentityState,
    pub sign_the_lpa: TaskState,
}

impl Tasks {
    pub fn get(&self, section: Section) -> SectionState {
        match section {
            Section::YourDetails => SectionState::Task(self.your_details),
            Section::ChooseAttorneys => SectionState::Task(self.choose_attorneys),
            Section::ChooseReplacementAttorneys => {
                SectionState::Task(self.choose_replacement_attorneys)
            }
            Section::UsageConditions => SectionState::Task(self.usage_conditions),
            Section::Restrictions => SectionState::Task(self.restrictions),
            Section::CertificateProvider => SectionState::Task(self.certificate_provider),
            Section::PeopleToNotify => SectionState::Task(self.people_to_notify),
            Section::AddCorrespondent => SectionState::Task(self.add_correspondent),
            Section::ChooseYourSignatory => SectionState::Task(self.choose_your_signatory),
            Section::CheckYourLpa => SectionState::Task(self.check_your_lpa),
            Section::PayForLpa => SectionState::Payment(self.pay_for_lpa),
            Section::ConfirmYourIdentity => SectionState::Identity(self.confirm_your_identity),
            Section::SignTheLpa => SectionState::Task(self.sign_the_lpa),
        }
    }

    /// Stores a derived state. A state of the wrong kind for the section is ignored.
    pub fn set(&mut self, section: Section, state: SectionState) {
        match (section, state) {
            (Section::PayForLpa, SectionState::Payment(s)) => self.pay_for_lpa = s,
            (Section::ConfirmYourIdentity, SectionState::Identity(s)) => {
                self.confirm_your_identity = s
            }
            (section, SectionState::Task(s)) => {
                if let Some(slot) = self.task_slot(section) {
                    *slot = s;
                }
            }
            _ => {}
        }
    }

    fn task_slot(&mut self, section: Section) -> Option<&mut TaskState> {
        match section {
            Section::YourDetails => Some(&mut self.your_details),
            Section::ChooseAttorneys => Some(&mut self.choose_attorneys),
            Section::ChooseReplacementAttorneys => Some(&mut self.choose_replacement_attorneys),
            Section::UsageConditions => Some(&mut self.usage_conditions),
            Section::Restrictions => Some(&mut self.restrictions),
            Section::CertificateProvider => Some(&mut self.certificate_provider),
            Section::PeopleToNotify => Some(&mut self.people_to_notify),
            Section::AddCorrespondent => Some(&mut self.add_correspondent),
            Section::ChooseYourSignatory => Some(&mut self.choose_your_signatory),
            Section::CheckYourLpa => Some(&mut self.check_your_lpa),
            Section::SignTheLpa => Some(&mut self.sign_the_lpa),
            Section::PayForLpa | Section::ConfirmYourIdentity => None,
        }
    }
}
