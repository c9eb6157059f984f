//! Background consumption of a live stream.
//!
//! Each subscription owns one tokio task that opens the stream, decodes each
//! line and hands the record to the subscriber's handler, in arrival order.
//! The task reports its progress through a `watch` channel so callers can
//! observe the lifecycle without touching the handler.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::decoder::{Record, StreamDecoder};
use super::kind::StreamKind;
use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

/// Lifecycle of a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Connecting,
    Streaming,
    /// The server ended the body.
    Closed,
    /// The stream could not be opened or ended with an error.
    Failed(String),
    /// Closed by the subscriber.
    Terminated,
}

impl StreamState {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Closed | Self::Failed(_) | Self::Terminated)
    }
}

/// How a subscription ended.
#[derive(Debug)]
pub enum StreamOutcome {
    Closed,
    Failed(ClientError),
    Terminated,
}

/// Handle to a running subscription. Dropping the handle leaves the stream
/// running; call [`Subscription::close`] to stop it.
#[derive(Debug)]
pub struct Subscription {
    kind: StreamKind,
    state_rx: watch::Receiver<StreamState>,
    state_tx: Arc<watch::Sender<StreamState>>,
    task: JoinHandle<StreamOutcome>,
}

impl Subscription {
    pub(crate) fn spawn<F>(transport: Transport, kind: StreamKind, handler: F) -> Self
    where
        F: FnMut(Record) + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(StreamState::Idle);
        let state_tx = Arc::new(state_tx);

        let task_kind = kind.clone();
        let task_state = Arc::clone(&state_tx);
        let task = tokio::spawn(async move {
            let outcome = AssertUnwindSafe(run(transport, task_kind.clone(), handler, &task_state))
                .catch_unwind()
                .await;
            match outcome {
                Ok(outcome) => outcome,
                Err(payload) => fail(
                    &task_kind,
                    &task_state,
                    ClientError::HandlerPanicked(panic_message(payload.as_ref())),
                ),
            }
        });

        Self {
            kind,
            state_rx,
            state_tx,
            task,
        }
    }

    pub fn kind(&self) -> &StreamKind {
        &self.kind
    }

    pub fn state(&self) -> StreamState {
        self.state_rx.borrow().clone()
    }

    /// Wait for the next state transition and return the new state.
    ///
    /// Returns `None` once the final state has been observed, since no
    /// further transition can follow it.
    pub async fn changed(&mut self) -> Option<StreamState> {
        if !self.state_rx.has_changed().unwrap_or(false) {
            let finished = self.state_rx.borrow().is_finished();
            if finished {
                return None;
            }
            self.state_rx.changed().await.ok()?;
        }
        Some(self.state_rx.borrow_and_update().clone())
    }

    /// Wait until the subscription reaches a final state.
    pub async fn finished(&mut self) -> StreamState {
        match self.state_rx.wait_for(StreamState::is_finished).await {
            Ok(state) => state.clone(),
            Err(_) => StreamState::Terminated,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop reading. The handler is not invoked again.
    pub fn close(&self) {
        self.task.abort();
        self.state_tx.send_if_modified(|state| {
            if state.is_finished() {
                return false;
            }
            *state = StreamState::Terminated;
            true
        });
        tracing::info!(stream = %self.kind, "Subscription closed by subscriber");
    }

    /// Wait for the task and return how it ended.
    pub async fn join(self) -> StreamOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => StreamOutcome::Terminated,
            Err(e) => {
                let error = ClientError::HandlerPanicked(e.to_string());
                self.state_tx
                    .send_replace(StreamState::Failed(error.to_string()));
                StreamOutcome::Failed(error)
            }
        }
    }
}

async fn run<F>(
    transport: Transport,
    kind: StreamKind,
    handler: F,
    state: &watch::Sender<StreamState>,
) -> StreamOutcome
where
    F: FnMut(Record) + Send + 'static,
{
    state.send_replace(StreamState::Connecting);
    tracing::info!(stream = %kind, "Opening stream");

    let lines = match transport.lines(kind.request()).await {
        Ok(lines) => lines,
        Err(e) => return fail(&kind, state, e),
    };

    state.send_replace(StreamState::Streaming);
    match pump(lines, kind.decoder(), handler).await {
        Ok(()) => {
            tracing::info!(stream = %kind, "Stream closed by server");
            state.send_replace(StreamState::Closed);
            StreamOutcome::Closed
        }
        Err(e) => fail(&kind, state, e),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn fail(kind: &StreamKind, state: &watch::Sender<StreamState>, error: ClientError) -> StreamOutcome {
    tracing::warn!(stream = %kind, error = %error, "Stream failed");
    state.send_replace(StreamState::Failed(error.to_string()));
    StreamOutcome::Failed(error)
}

/// Read lines until the body ends, delivering every decoded record.
pub(crate) async fn pump<R, F>(
    mut lines: Lines<R>,
    mut decoder: StreamDecoder,
    mut handler: F,
) -> ClientResult<()>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(Record),
{
    while let Some(line) = lines.next_line().await? {
        tracing::trace!(line = %line, "Stream line");
        if let Some(record) = decoder.feed(&line)? {
            handler(record);
        }
    }
    Ok(())
}
