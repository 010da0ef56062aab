//! Command-driven mutation of one application.
//!
//! This module provides the ONLY place application answers change. The state
//! machine owns the application snapshot, validates commands, re-derives the
//! sections each command affects and logs commands and events. A command
//! either applies completely or leaves the application untouched.

mod commands;
mod events;
mod milestones;
mod parties;

pub use commands::{AttorneyParty, StepCommand};
pub use events::StepEvent;

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::derivation::{derive_all, refresh};
use crate::domain::{Application, Clock, EngineError, Result, Section, SystemClock};
use crate::structured_logger::StructuredLogger;

pub struct ApplicationStateMachine {
    app: Application,
    logger: Arc<StructuredLogger>,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl ApplicationStateMachine {
    /// Wraps a loaded application. Every section is re-derived on load so the
    /// stored states match the answers from the first command onwards.
    pub fn new(app: Application, logger: Arc<StructuredLogger>, config: EngineConfig) -> Self {
        let mut app = app;
        app.tasks = derive_all(&app);
        Self {
            app,
            logger,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// All mutations go through this single method.
    pub fn apply(&mut self, command: StepCommand) -> Result<Vec<StepEvent>> {
        let case_id = self.app.case_id.clone();
        self.logger.log_command(&case_id, &command);

        let mut next = self.app.clone();
        let events = self.apply_internal(&mut next, command).map_err(|err| {
            tracing::debug!(case_id = %case_id, error = %err, "command rejected");
            err
        })?;

        for event in &events {
            self.logger.log_event(&case_id, event);
        }
        self.app = next;
        Ok(events)
    }

    fn apply_internal(&self, app: &mut Application, command: StepCommand) -> Result<Vec<StepEvent>> {
        if app.is_signed() && command.changes_document() {
            return Err(EngineError::validation(
                "application",
                "a signed application cannot be changed",
            ));
        }

        let now = self.clock.now();
        let mut touched: Vec<Section> = command.section().into_iter().collect();
        let mut events = if touched.iter().any(|s| !s.is_reviewable()) {
            milestones::apply(app, command, now)?
        } else {
            parties::apply(app, command, &self.config, now)?
        };

        let decided = (
            app.attorney_decisions.clone(),
            app.replacement_attorney_decisions.clone(),
        );
        app.normalise_decisions();
        let resets = [
            (app.attorney_decisions != decided.0, Section::ChooseAttorneys),
            (
                app.replacement_attorney_decisions != decided.1,
                Section::ChooseReplacementAttorneys,
            ),
        ];
        for (_, section) in resets.into_iter().filter(|(reset, _)| *reset) {
            events.push(StepEvent::DecisionsReset { section });
            touched.push(section);
        }

        events.extend(
            refresh(app, &touched)
                .into_iter()
                .map(|change| StepEvent::TaskStateChanged {
                    section: change.section,
                    from: change.from,
                    to: change.to,
                }),
        );
        app.updated_at = now;
        Ok(events)
    }

    /// Returns the current application (for persisting).
    pub fn application(&self) -> &Application {
        &self.app
    }

    pub fn into_application(self) -> Application {
        self.app
    }
}

#[cfg(test)]
mod tests;
