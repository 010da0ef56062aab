//! Review completion and certificate-provider notification branching.
//!
//! Whether a review is the first one or follows a content change is read from
//! the review record and the content fingerprint alone. The two cases cannot
//! both hold for the same application.

mod service;

pub use service::{ReviewOutcome, ReviewService};

use serde::Serialize;

use crate::change_fingerprint::has_changed_since_review;
use crate::domain::{Application, Channel, NotificationTemplate, PartyProgress};

/// Why the review step is being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// The application has never been reviewed.
    FirstReview,
    /// Reviewed before, and the document content has changed since.
    ContentChanged,
}

/// Classifies the pending review, or `None` when nothing has changed since
/// the last one.
pub fn review_kind(app: &Application) -> Option<ReviewKind> {
    if !app.review.is_reviewed() {
        Some(ReviewKind::FirstReview)
    } else if has_changed_since_review(app) {
        Some(ReviewKind::ContentChanged)
    } else {
        None
    }
}

/// Which class of notification the certificate provider must receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationDirective {
    /// Paper channel, first review: prompt to meet the donor.
    MeetingPrompt,
    /// Paper channel, content changed.
    DetailsChangedPaper,
    /// Online channel, first review: invitation carrying case and party ids.
    Invite,
    /// Online channel, content changed. Wording depends on the certificate
    /// provider's own progress.
    DetailsChangedOnline,
}

impl NotificationDirective {
    /// The decision table for (channel, review kind).
    pub fn select(channel: Channel, kind: ReviewKind) -> Self {
        match (channel, kind) {
            (Channel::Paper, ReviewKind::FirstReview) => Self::MeetingPrompt,
            (Channel::Paper, ReviewKind::ContentChanged) => Self::DetailsChangedPaper,
            (Channel::Online, ReviewKind::FirstReview) => Self::Invite,
            (Channel::Online, ReviewKind::ContentChanged) => Self::DetailsChangedOnline,
        }
    }

    pub fn kind(self) -> ReviewKind {
        match self {
            Self::MeetingPrompt | Self::Invite => ReviewKind::FirstReview,
            Self::DetailsChangedPaper | Self::DetailsChangedOnline => ReviewKind::ContentChanged,
        }
    }

    /// Only the online change notice depends on downstream progress.
    pub fn needs_progress_lookup(self) -> bool {
        self == Self::DetailsChangedOnline
    }

    /// Picks the message template. `progress` is only consulted for the online
    /// change notice, where a missing record means the certificate provider
    /// has not started.
    pub fn template(self, progress: Option<PartyProgress>) -> NotificationTemplate {
        match self {
            Self::MeetingPrompt => NotificationTemplate::CertificateProviderMeetingPrompt,
            Self::DetailsChangedPaper => NotificationTemplate::CertificateProviderDetailsChanged,
            Self::Invite => NotificationTemplate::CertificateProviderInvite,
            Self::DetailsChangedOnline => match progress {
                Some(p) if p.confirmed_own_details => {
                    NotificationTemplate::DetailsChangedCertificateProviderStarted
                }
                _ => NotificationTemplate::DetailsChangedCertificateProviderNotStarted,
            },
        }
    }
}

/// Decides which notification completing the review would send.
///
/// `None` when nothing has changed since the last review, or when the
/// certificate provider has no preferred channel yet.
pub fn resolve_notification_branch(app: &Application) -> Option<NotificationDirective> {
    let kind = review_kind(app)?;
    let channel = app.certificate_provider.channel?;
    Some(NotificationDirective::select(channel, kind))
}

#[cfg(test)]
#[path = "tests/branch_tests.rs"]
mod branch_tests;

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod service_tests;
