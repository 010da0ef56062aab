//! The review-completion operation.
//!
//! Completing a review sends exactly one notification to the certificate
//! provider and only then records the review. Any collaborator failure aborts
//! before the application is written back, so the stored review record never
//! claims a notification that was not sent.

use std::sync::Arc;

use crate::change_fingerprint::mark_reviewed;
use crate::config::EngineConfig;
use crate::derivation::refresh;
use crate::domain::{
    Application, ApplicationStore, CaseId, Clock, EngineError, NotificationPayload,
    NotificationSender, NotificationTemplate, PartyProgressLookup, Recipient, Reminder,
    ReminderAction, ReminderScheduler, Result, Section, SystemClock,
};
use crate::navigation::Step;
use crate::review::{review_kind, NotificationDirective, ReviewKind};
use crate::structured_logger::StructuredLogger;

/// What a completed review did.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub directive: NotificationDirective,
    pub template: NotificationTemplate,
    /// The certificate provider had not been contacted before this review.
    pub first_check: bool,
    pub next_step: Step,
    /// The application as persisted.
    pub application: Application,
}

pub struct ReviewService {
    store: Arc<dyn ApplicationStore>,
    sender: Arc<dyn NotificationSender>,
    progress: Arc<dyn PartyProgressLookup>,
    scheduler: Arc<dyn ReminderScheduler>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    logger: Option<Arc<StructuredLogger>>,
}

impl ReviewService {
    pub fn new(
        store: Arc<dyn ApplicationStore>,
        sender: Arc<dyn NotificationSender>,
        progress: Arc<dyn PartyProgressLookup>,
        scheduler: Arc<dyn ReminderScheduler>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            sender,
            progress,
            scheduler,
            clock: Arc::new(SystemClock),
            config,
            logger: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_logger(mut self, logger: Arc<StructuredLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Completes the review step for `case_id`.
    ///
    /// # Errors
    ///
    /// - `Validation` if the case does not exist or is not ready for review
    /// - `NothingToReview` if nothing changed since the last review
    /// - `Collaborator` if the store, the progress lookup, the reminder
    ///   scheduler or the notification sender fails
    pub async fn complete_review(&self, case_id: &CaseId) -> Result<ReviewOutcome> {
        let mut app = self
            .store
            .get(case_id)
            .await
            .map_err(|e| EngineError::collaborator("application store", e))?
            .ok_or_else(|| EngineError::validation("case_id", format!("no application {case_id}")))?;

        if !app.ready_for_review() {
            return Err(EngineError::validation(
                "check_your_lpa",
                "complete every section before checking the LPA",
            ));
        }
        let kind = review_kind(&app).ok_or(EngineError::NothingToReview)?;
        let channel = app.certificate_provider.channel.ok_or_else(|| {
            EngineError::validation("channel", "the certificate provider has no channel")
        })?;
        let directive = NotificationDirective::select(channel, kind);

        let progress = if directive.needs_progress_lookup() {
            self.progress
                .certificate_provider_progress(case_id)
                .await
                .map_err(|e| EngineError::collaborator("party progress lookup", e))?
        } else {
            None
        };

        let now = self.clock.now();
        if directive == NotificationDirective::Invite {
            app.certificate_provider_invited_at = Some(now);
            let reminder = Reminder {
                at: now.plus_months(self.config.certificate_provider_reminder_months),
                action: ReminderAction::RemindCertificateProviderToComplete,
                case_id: case_id.clone(),
            };
            self.scheduler
                .schedule(reminder)
                .await
                .map_err(|e| EngineError::collaborator("reminder scheduler", e))?;
        }

        let template = directive.template(progress);
        let recipient = recipient(&app);
        let payload = self.payload(&app, directive);
        self.sender
            .send(&recipient, template, &payload)
            .await
            .map_err(|e| EngineError::collaborator("notification sender", e))?;

        mark_reviewed(&mut app, now);
        refresh(&mut app, &[Section::CheckYourLpa]);
        app.updated_at = now;
        self.store
            .put(&app)
            .await
            .map_err(|e| EngineError::collaborator("application store", e))?;

        if let Some(logger) = &self.logger {
            logger.log_notification(case_id, directive, template);
        }
        tracing::info!(
            case_id = %case_id,
            directive = ?directive,
            template = ?template,
            "review completed"
        );

        Ok(ReviewOutcome {
            directive,
            template,
            first_check: kind == ReviewKind::FirstReview,
            next_step: Step::LpaDetailsSaved,
            application: app,
        })
    }

    fn payload(&self, app: &Application, directive: NotificationDirective) -> NotificationPayload {
        let cp = &app.certificate_provider;
        let start_url = if directive == NotificationDirective::MeetingPrompt {
            self.config.certificate_provider_start_url()
        } else {
            String::new()
        };
        NotificationPayload {
            case_id: app.case_id.clone(),
            case_reference: app.case_reference.clone(),
            lpa_type: app.lpa_type,
            donor_full_name: app.donor.full_name(),
            donor_first_names: app.donor.first_names.clone(),
            certificate_provider_uid: cp.uid,
            certificate_provider_full_name: cp.full_name(),
            start_url,
        }
    }
}

fn recipient(app: &Application) -> Recipient {
    let cp = &app.certificate_provider;
    Recipient {
        uid: cp.uid,
        channel: cp.channel.unwrap_or(crate::domain::Channel::Paper),
        email: cp.email.clone(),
        mobile: cp.mobile.clone(),
    }
}
