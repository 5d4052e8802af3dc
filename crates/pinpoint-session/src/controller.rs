//! Session state machine.

use tracing::debug;

use pinpoint_core::{
    build_request, CoreError, Failure, InboundResult, Message, OutboundRequest, RequestId,
    Session, SessionStatus,
};

use crate::event::SessionSnapshot;

/// A submission accepted by the controller and waiting to be sent.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub id: RequestId,
    pub request: OutboundRequest,
}

/// How an in-flight request was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An assistant message was appended; the session is Idle.
    Answered,
    /// An error message was appended; the session is Failed until acknowledged.
    Failed(Failure),
}

/// Owns the session and applies every transition to it.
#[derive(Debug, Default)]
pub struct SessionController {
    session: Session,
    in_flight: Option<RequestId>,
    last_failure: Option<Failure>,
}

impl SessionController {
    /// Create a controller with a fresh idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Id of the request currently in flight.
    pub fn in_flight(&self) -> Option<&RequestId> {
        self.in_flight.as_ref()
    }

    /// Copy of the state the display layer renders.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            history: self.session.history().to_vec(),
            highlighted: self.session.highlighted().map(str::to_string),
            status: self.session.status(),
            last_failure: self.last_failure.clone(),
        }
    }

    /// Accept a user submission.
    ///
    /// Rejected without any change while a request is in flight, while a
    /// failure is still unacknowledged, or when the text is blank. On success
    /// the user message is already in the history and the session is Waiting.
    pub fn submit(&mut self, text: &str) -> Result<PendingSubmission, CoreError> {
        let status = self.session.status();
        if !status.accepts_submissions() {
            return Err(match status {
                SessionStatus::Failed => CoreError::FailureNotAcknowledged,
                _ => CoreError::RequestInFlight,
            });
        }
        if text.trim().is_empty() {
            return Err(CoreError::EmptySubmission);
        }

        let pending = Message::user(text);
        let request = build_request(
            self.session.history(),
            &pending,
            self.session.highlighted(),
        );

        self.session.append(pending)?;
        self.session.transition(SessionStatus::Waiting)?;

        let id = RequestId::generate();
        debug!(
            request_id = %id,
            messages = request.messages.len(),
            highlighted = request.highlight_context.is_some(),
            "Submission accepted"
        );
        self.in_flight = Some(id.clone());
        self.last_failure = None;

        Ok(PendingSubmission { id, request })
    }

    /// Forward a selection change to the highlight capture.
    pub fn on_selection_changed(&mut self, text: &str) -> bool {
        self.session.capture_selection(text)
    }

    /// Fold the result of the in-flight request into the session.
    ///
    /// The highlight is cleared whatever the outcome.
    pub fn resolve(
        &mut self,
        id: &RequestId,
        result: InboundResult,
    ) -> Result<Resolution, CoreError> {
        if self.in_flight.as_ref() != Some(id) {
            return Err(CoreError::UnknownRequest(id.to_string()));
        }

        let resolution = match result {
            InboundResult::Success { content } => {
                self.session.append(Message::assistant(content))?;
                self.session.transition(SessionStatus::Idle)?;
                Resolution::Answered
            }
            InboundResult::Failure(failure) => {
                self.session.append(Message::error(failure.message.clone()))?;
                self.session.transition(SessionStatus::Failed)?;
                self.last_failure = Some(failure.clone());
                Resolution::Failed(failure)
            }
        };

        self.session.clear_highlight();
        self.in_flight = None;
        Ok(resolution)
    }

    /// Return to Idle once a failure has been shown.
    ///
    /// Only valid while Failed. The failure stays in `last_failure` until the
    /// next accepted submission.
    pub fn acknowledge_failure(&mut self) -> Result<(), CoreError> {
        let from = self.session.status();
        if from != SessionStatus::Failed {
            return Err(CoreError::InvalidStateTransition {
                from,
                to: SessionStatus::Idle,
            });
        }
        self.session.transition(SessionStatus::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinpoint_core::{ChatRole, FailureKind};

    #[test]
    fn test_submit_appends_user_message_and_waits() {
        let mut controller = SessionController::new();
        let pending = controller.submit("Summarize this.").unwrap();

        assert_eq!(controller.session().status(), SessionStatus::Waiting);
        assert_eq!(
            controller.session().history(),
            &[Message::user("Summarize this.")]
        );
        assert_eq!(pending.request.messages, vec![Message::user("Summarize this.")]);
        assert_eq!(controller.in_flight(), Some(&pending.id));
    }

    #[test]
    fn test_blank_submissions_are_rejected() {
        let mut controller = SessionController::new();
        for text in ["", "   ", "\n\t"] {
            assert_eq!(controller.submit(text).unwrap_err(), CoreError::EmptySubmission);
        }
        assert!(controller.session().history().is_empty());
        assert_eq!(controller.session().status(), SessionStatus::Idle);
    }

    #[test]
    fn test_submit_while_waiting_is_rejected() {
        let mut controller = SessionController::new();
        controller.submit("first").unwrap();
        let before = controller.snapshot();

        assert_eq!(controller.submit("second").unwrap_err(), CoreError::RequestInFlight);
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn test_success_clears_highlight() {
        let mut controller = SessionController::new();
        controller.on_selection_changed("the quick brown fox");
        let pending = controller.submit("What does X mean?").unwrap();

        let last = pending.request.messages.last().unwrap();
        assert_eq!(last.role(), ChatRole::System);
        assert!(last.content().contains("the quick brown fox"));

        let resolution = controller
            .resolve(&pending.id, InboundResult::success("It means Y."))
            .unwrap();
        assert_eq!(resolution, Resolution::Answered);
        assert_eq!(controller.session().highlighted(), None);
        assert_eq!(controller.session().status(), SessionStatus::Idle);
        // Synthetic entry never reaches the history.
        assert!(controller
            .session()
            .history()
            .iter()
            .all(|m| m.role() != ChatRole::System));
    }

    #[test]
    fn test_failure_appends_error_and_clears_highlight() {
        let mut controller = SessionController::new();
        controller.on_selection_changed("span");
        let pending = controller.submit("question").unwrap();

        let resolution = controller
            .resolve(
                &pending.id,
                InboundResult::Failure(Failure::upstream(503, "rate limited")),
            )
            .unwrap();

        assert!(matches!(resolution, Resolution::Failed(ref f) if f.kind == FailureKind::Upstream));
        assert_eq!(controller.session().status(), SessionStatus::Failed);
        assert_eq!(controller.session().highlighted(), None);
        assert_eq!(
            controller.session().history().last(),
            Some(&Message::error("rate limited"))
        );

        controller.acknowledge_failure().unwrap();
        assert_eq!(controller.session().status(), SessionStatus::Idle);
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut controller = SessionController::new();
        controller.submit("question").unwrap();
        let before = controller.snapshot();

        let result = controller.resolve(&RequestId::new("other"), InboundResult::success("late"));
        assert!(matches!(result, Err(CoreError::UnknownRequest(_))));
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn test_collapsed_selection_keeps_previous_highlight() {
        let mut controller = SessionController::new();
        assert!(controller.on_selection_changed("fox"));
        assert!(!controller.on_selection_changed(""));
        assert_eq!(controller.session().highlighted(), Some("fox"));
    }

    #[test]
    fn test_failure_holds_until_acknowledged() {
        let mut controller = SessionController::new();
        let pending = controller.submit("question").unwrap();
        controller
            .resolve(
                &pending.id,
                InboundResult::Failure(Failure::upstream(503, "rate limited")),
            )
            .unwrap();
        let failed = controller.snapshot();
        assert_eq!(failed.last_failure, Some(Failure::upstream(503, "rate limited")));

        assert_eq!(
            controller.submit("retry").unwrap_err(),
            CoreError::FailureNotAcknowledged
        );
        assert_eq!(controller.snapshot(), failed);

        controller.acknowledge_failure().unwrap();
        let idle = controller.snapshot();
        assert_eq!(idle.status, SessionStatus::Idle);
        assert_eq!(idle.last_failure, failed.last_failure);

        controller.submit("retry").unwrap();
        assert_eq!(controller.snapshot().last_failure, None);
    }

    #[test]
    fn test_acknowledge_requires_failed() {
        let mut controller = SessionController::new();
        assert!(controller.acknowledge_failure().is_err());

        controller.submit("question").unwrap();
        assert_eq!(
            controller.acknowledge_failure().unwrap_err(),
            CoreError::InvalidStateTransition {
                from: SessionStatus::Waiting,
                to: SessionStatus::Idle,
            }
        );
        assert_eq!(controller.session().status(), SessionStatus::Waiting);
    }
}
