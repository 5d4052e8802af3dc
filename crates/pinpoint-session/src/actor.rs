//! Session actor: the only task that mutates the session.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use pinpoint_client::Transport;
use pinpoint_core::{FailureKind, InboundResult, RequestId};

use crate::controller::{PendingSubmission, Resolution, SessionController};
use crate::error::SessionError;
use crate::event::{SessionCommand, SessionSnapshot};
use crate::UNEXPECTED_ERROR_MESSAGE;

const COMMAND_BUFFER: usize = 32;

/// Result of a transport call, reported back to the actor.
struct Completion {
    id: RequestId,
    result: InboundResult,
}

/// Start the session actor on the current tokio runtime.
///
/// Returns a cloneable handle plus the actor's join handle.
pub fn spawn_session(transport: Arc<dyn Transport>) -> (SessionHandle, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let controller = SessionController::new();
    let (state_tx, state_rx) = watch::channel(controller.snapshot());

    let actor = SessionActor {
        controller,
        transport,
        state_tx,
    };
    let task = tokio::spawn(actor.run(cmd_rx));

    (SessionHandle { cmd_tx, state_rx }, task)
}

struct SessionActor {
    controller: SessionController,
    transport: Arc<dyn Transport>,
    state_tx: watch::Sender<SessionSnapshot>,
}

impl SessionActor {
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<SessionCommand>) {
        let (done_tx, mut done_rx) = mpsc::channel::<Completion>(1);
        info!("Session started");

        loop {
            tokio::select! {
                Some(completion) = done_rx.recv() => {
                    self.complete(completion);
                }

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Submit { text, reply }) => {
                            let result = self.submit(&text, &done_tx);
                            let _ = reply.send(result);
                        }
                        Some(SessionCommand::SelectionChanged { text, reply }) => {
                            let captured = self.controller.on_selection_changed(&text);
                            if captured {
                                debug!(chars = text.chars().count(), "Highlight captured");
                                self.publish();
                            }
                            let _ = reply.send(captured);
                        }
                        Some(SessionCommand::Acknowledge { reply }) => {
                            let result = self.controller.acknowledge_failure();
                            match &result {
                                Ok(()) => {
                                    debug!("Failure acknowledged");
                                    self.publish();
                                }
                                Err(e) => debug!(error = %e, "Nothing to acknowledge"),
                            }
                            let _ = reply.send(result);
                        }
                        Some(SessionCommand::Shutdown) | None => {
                            info!("Session shutting down");
                            break;
                        }
                    }
                }
            }
        }
    }

    fn submit(
        &mut self,
        text: &str,
        done_tx: &mpsc::Sender<Completion>,
    ) -> Result<RequestId, pinpoint_core::CoreError> {
        let PendingSubmission { id, request } = match self.controller.submit(text) {
            Ok(pending) => pending,
            Err(e) => {
                debug!(error = %e, "Submission rejected");
                return Err(e);
            }
        };
        self.publish();

        let transport = self.transport.clone();
        let done_tx = done_tx.clone();
        let request_id = id.clone();

        tokio::spawn(async move {
            // The exchange runs on its own task so a panic inside the
            // transport surfaces here as a JoinError.
            let exchange = tokio::spawn(async move { transport.send(&request).await });
            let result = match exchange.await {
                Ok(result) => result,
                Err(e) => {
                    error!(request_id = %request_id, error = %e, "Transport task failed");
                    InboundResult::failure(FailureKind::Unknown, UNEXPECTED_ERROR_MESSAGE)
                }
            };
            if done_tx
                .send(Completion {
                    id: request_id,
                    result,
                })
                .await
                .is_err()
            {
                debug!("Session closed before the result arrived");
            }
        });

        Ok(id)
    }

    fn complete(&mut self, completion: Completion) {
        let Completion { id, result } = completion;

        match self.controller.resolve(&id, result) {
            Ok(Resolution::Answered) => {
                info!(request_id = %id, "Response received");
                self.publish();
            }
            Ok(Resolution::Failed(failure)) => {
                warn!(
                    request_id = %id,
                    kind = %failure.kind,
                    message = %failure.message,
                    "Request failed"
                );
                self.publish();
            }
            Err(e) => {
                warn!(request_id = %id, error = %e, "Discarding result");
            }
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.controller.snapshot());
    }
}

/// Cloneable handle to the session actor.
#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
    state_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Submit a user message.
    pub async fn submit(&self, text: impl Into<String>) -> Result<RequestId, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(SessionCommand::Submit {
                text: text.into(),
                reply,
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(rx.await.map_err(|_| SessionError::Closed)??)
    }

    /// Submit from a thread outside the runtime.
    pub fn blocking_submit(&self, text: impl Into<String>) -> Result<RequestId, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .blocking_send(SessionCommand::Submit {
                text: text.into(),
                reply,
            })
            .map_err(|_| SessionError::Closed)?;
        Ok(rx.blocking_recv().map_err(|_| SessionError::Closed)??)
    }

    /// Report a selection change. Returns true if it became the highlight.
    pub async fn select(&self, text: impl Into<String>) -> Result<bool, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(SessionCommand::SelectionChanged {
                text: text.into(),
                reply,
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Report a selection change from a thread outside the runtime.
    pub fn blocking_select(&self, text: impl Into<String>) -> Result<bool, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .blocking_send(SessionCommand::SelectionChanged {
                text: text.into(),
                reply,
            })
            .map_err(|_| SessionError::Closed)?;
        rx.blocking_recv().map_err(|_| SessionError::Closed)
    }

    /// Confirm the current failure has been shown, returning to Idle.
    pub async fn acknowledge(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(SessionCommand::Acknowledge { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(rx.await.map_err(|_| SessionError::Closed)??)
    }

    /// Confirm a failure from a thread outside the runtime.
    pub fn blocking_acknowledge(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .blocking_send(SessionCommand::Acknowledge { reply })
            .map_err(|_| SessionError::Closed)?;
        Ok(rx.blocking_recv().map_err(|_| SessionError::Closed)??)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified on every published state.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_rx.clone()
    }

    /// Stop the actor.
    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(SessionCommand::Shutdown).await;
    }

    /// Stop the actor from a thread outside the runtime.
    pub fn blocking_shutdown(&self) {
        let _ = self.cmd_tx.blocking_send(SessionCommand::Shutdown);
    }
}
