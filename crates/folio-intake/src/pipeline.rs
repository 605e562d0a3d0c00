// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion pipeline: dedup, session lookup, conversation turn, reply.
//!
//! Each message in a batch runs through:
//!
//! 1. completeness check (id and sender present)
//! 2. [`MessageStore::record`] for dedup; a store error is logged and the
//!    message is treated as new
//! 3. [`SessionStore::get_or_create`]
//! 4. [`engine::transition`] on the normalized body
//! 5. the ticket effect, then [`SessionStore::set_state`]
//! 6. [`OutboundSender::send_text`]; a failed send does not undo 5
//!
//! A session or ticket store error aborts the current message only.

use std::sync::Arc;
use std::time::Instant;

use folio_core::types::{InboundMessage, RecordOutcome};
use folio_core::{
    ConversationState, DedupPolicy, FolioError, MessageStore, OutboundSender, SessionStore,
    TicketStore,
};
use tracing::{debug, error, info, warn};

use crate::engine::{self, Effect};
use crate::normalize::normalize;
use crate::replies;

/// What happened to one completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSummary {
    pub message_id: String,
    pub user_id: String,
    /// State read from the session store.
    pub from: ConversationState,
    /// State committed for the next turn.
    pub to: ConversationState,
    /// A reset keyword overrode `from`.
    pub reset: bool,
    /// Ticket opened or updated by this turn.
    pub ticket_id: Option<i64>,
    /// Whether the message id had already been recorded (only possible
    /// under [`DedupPolicy::Reprocess`]).
    pub redelivered: bool,
    pub reply: String,
    /// Whether the platform accepted the reply.
    pub delivered: bool,
}

/// Per-message result of [`IngestionPipeline::process_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    Processed(TurnSummary),
    /// Already recorded; skipped under [`DedupPolicy::Skip`].
    Duplicate { message_id: String },
    /// Missing id or sender.
    Skipped { reason: &'static str },
    /// A session or ticket store failure aborted the turn.
    Failed { message_id: String, error: String },
}

/// Counts for one batch, plus each message's outcome in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    /// Messages whose id was already recorded, whether skipped or reprocessed.
    pub duplicates: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<MessageOutcome>,
}

impl BatchReport {
    fn push(&mut self, outcome: MessageOutcome) {
        match &outcome {
            MessageOutcome::Processed(turn) => {
                self.processed += 1;
                if turn.redelivered {
                    self.duplicates += 1;
                }
            }
            MessageOutcome::Duplicate { .. } => self.duplicates += 1,
            MessageOutcome::Skipped { .. } => self.skipped += 1,
            MessageOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Drives conversation turns for inbound message batches.
#[derive(Clone)]
pub struct IngestionPipeline {
    messages: Arc<dyn MessageStore>,
    sessions: Arc<dyn SessionStore>,
    tickets: Arc<dyn TicketStore>,
    sender: Arc<dyn OutboundSender>,
    dedup: DedupPolicy,
}

impl IngestionPipeline {
    pub fn new(
        messages: Arc<dyn MessageStore>,
        sessions: Arc<dyn SessionStore>,
        tickets: Arc<dyn TicketStore>,
        sender: Arc<dyn OutboundSender>,
    ) -> Self {
        Self {
            messages,
            sessions,
            tickets,
            sender,
            dedup: DedupPolicy::default(),
        }
    }

    pub fn with_dedup_policy(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn dedup_policy(&self) -> DedupPolicy {
        self.dedup
    }

    /// Process every message in order. Never fails: each message's result
    /// is reported in the returned [`BatchReport`].
    pub async fn process_batch(&self, batch: Vec<InboundMessage>) -> BatchReport {
        let mut report = BatchReport::default();
        for message in &batch {
            report.push(self.process_message(message).await);
        }
        debug!(
            processed = report.processed,
            duplicates = report.duplicates,
            skipped = report.skipped,
            failed = report.failed,
            "batch complete"
        );
        report
    }

    /// Run one message through dedup and the conversation turn.
    pub async fn process_message(&self, message: &InboundMessage) -> MessageOutcome {
        if !message.is_complete() {
            debug!(message_id = %message.id, "skipping message without id or sender");
            #[cfg(feature = "prometheus")]
            folio_prometheus::record_message("skipped");
            return MessageOutcome::Skipped {
                reason: "missing id or sender",
            };
        }

        let redelivered = match self.messages.record(message).await {
            Ok(RecordOutcome::Inserted) => false,
            Ok(RecordOutcome::Duplicate) => true,
            Err(e) => {
                warn!(
                    message_id = %message.id,
                    error = %e,
                    "failed to record message, processing anyway"
                );
                false
            }
        };

        if redelivered && self.dedup == DedupPolicy::Skip {
            info!(
                message_id = %message.id,
                user_id = %message.sender,
                "duplicate delivery skipped"
            );
            #[cfg(feature = "prometheus")]
            folio_prometheus::record_message("duplicate");
            return MessageOutcome::Duplicate {
                message_id: message.id.clone(),
            };
        }

        let started = Instant::now();
        match self.run_turn(message, redelivered).await {
            Ok(turn) => {
                #[cfg(feature = "prometheus")]
                {
                    folio_prometheus::record_message("processed");
                    folio_prometheus::record_turn_latency(started.elapsed().as_secs_f64());
                }
                debug!(
                    message_id = %turn.message_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "turn complete"
                );
                MessageOutcome::Processed(turn)
            }
            Err(e) => {
                error!(
                    message_id = %message.id,
                    user_id = %message.sender,
                    error = %e,
                    "conversation turn aborted"
                );
                #[cfg(feature = "prometheus")]
                folio_prometheus::record_message("failed");
                MessageOutcome::Failed {
                    message_id: message.id.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    async fn run_turn(
        &self,
        message: &InboundMessage,
        redelivered: bool,
    ) -> Result<TurnSummary, FolioError> {
        let user_id = message.sender.as_str();
        let session = self.sessions.get_or_create(user_id).await?;
        let decision = engine::transition(session.state, &normalize(&message.body));

        if decision.reset {
            debug!(user_id, from = %session.state, "reset keyword");
        }

        let ticket_id = match decision.effect {
            Effect::None => None,
            Effect::OpenTicket(category) => {
                let id = self.tickets.open(user_id, category).await?;
                info!(user_id, ticket_id = id, %category, "ticket opened");
                #[cfg(feature = "prometheus")]
                folio_prometheus::record_ticket_opened(&category.to_string());
                Some(id)
            }
            Effect::AttachDetails => {
                let attached = self.tickets.attach_details(user_id, &message.body).await?;
                match attached {
                    Some(id) => info!(user_id, ticket_id = id, "ticket details attached"),
                    None => warn!(user_id, "no open ticket to attach details to"),
                }
                attached
            }
        };

        self.sessions.set_state(user_id, decision.next).await?;
        debug!(user_id, from = %session.state, to = %decision.next, "state committed");

        let reply = replies::render(decision.reply, ticket_id);
        let receipt = self.sender.send_text(user_id, &reply).await;
        #[cfg(feature = "prometheus")]
        folio_prometheus::record_outbound(receipt.ok);
        if !receipt.ok {
            warn!(
                user_id,
                status = ?receipt.status,
                detail = %receipt.detail,
                "reply not delivered; state already committed"
            );
        }

        Ok(TurnSummary {
            message_id: message.id.clone(),
            user_id: user_id.to_string(),
            from: session.state,
            to: decision.next,
            reset: decision.reset,
            ticket_id,
            redelivered,
            reply,
            delivered: receipt.ok,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_test_utils::{FailingTicketStore, MockSender, TestStorage};
    use tracing_test::traced_test;

    struct Fixture {
        db: TestStorage,
        sender: Arc<MockSender>,
        pipeline: IngestionPipeline,
    }

    async fn fixture_with(tickets: Option<Arc<dyn TicketStore>>) -> Fixture {
        let db = TestStorage::new().await.unwrap();
        let sender = Arc::new(MockSender::new());
        let tickets: Arc<dyn TicketStore> = match tickets {
            Some(store) => store,
            None => db.storage.clone(),
        };
        let pipeline = IngestionPipeline::new(
            db.storage.clone(),
            db.storage.clone(),
            tickets,
            sender.clone(),
        );
        Fixture {
            db,
            sender,
            pipeline,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(None).await
    }

    #[tokio::test]
    async fn incomplete_messages_are_skipped() {
        let f = fixture().await;
        let report = f
            .pipeline
            .process_batch(vec![
                InboundMessage::text("", "u1", "hola"),
                InboundMessage::text("m1", "  ", "hola"),
            ])
            .await;
        assert_eq!(report.skipped, 2);
        assert_eq!(report.processed, 0);
        assert_eq!(f.sender.sent_count().await, 0);
        assert_eq!(f.db.storage.count_messages(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn turn_summary_describes_transition() {
        let f = fixture().await;
        let outcome = f
            .pipeline
            .process_message(&InboundMessage::text("m1", "u1", "Hola"))
            .await;
        let MessageOutcome::Processed(turn) = outcome else {
            panic!("expected processed, got {outcome:?}");
        };
        assert_eq!(turn.from, ConversationState::Initial);
        assert_eq!(turn.to, ConversationState::AwaitOption);
        assert_eq!(turn.reply, replies::MENU);
        assert!(turn.delivered);
        assert!(!turn.reset);
        assert!(!turn.redelivered);
    }

    #[tokio::test]
    async fn ticket_failure_aborts_only_that_message() {
        let failing = Arc::new(FailingTicketStore::new());
        let f = fixture_with(Some(failing.clone() as Arc<dyn TicketStore>)).await;
        f.pipeline
            .process_message(&InboundMessage::text("m1", "u1", "hola"))
            .await;

        let report = f
            .pipeline
            .process_batch(vec![
                InboundMessage::text("m2", "u1", "1"),
                InboundMessage::text("m3", "u2", "hola"),
            ])
            .await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.processed, 1);
        assert_eq!(failing.calls(), 1);
        assert!(matches!(
            &report.outcomes[0],
            MessageOutcome::Failed { message_id, .. } if message_id == "m2"
        ));

        // u1 keeps its state and gets no reply for the failed turn.
        let u1 = f.db.storage.get_session("u1").await.unwrap().unwrap();
        assert_eq!(u1.state, ConversationState::AwaitOption);
        assert_eq!(f.sender.sent_to("u1").await.len(), 1);
        assert_eq!(f.sender.sent_to("u2").await.len(), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_send_still_commits_state() {
        let f = fixture().await;
        f.sender.fail_with(503, "unavailable").await;

        let outcome = f
            .pipeline
            .process_message(&InboundMessage::text("m1", "u1", "hola"))
            .await;
        let MessageOutcome::Processed(turn) = outcome else {
            panic!("expected processed");
        };
        assert!(!turn.delivered);

        let session = f.db.storage.get_session("u1").await.unwrap().unwrap();
        assert_eq!(session.state, ConversationState::AwaitOption);
        assert_eq!(f.sender.sent_count().await, 1, "exactly one attempt");
        assert!(logs_contain("reply not delivered"));
    }

    #[tokio::test]
    async fn duplicate_is_skipped_by_default() {
        let f = fixture().await;
        assert_eq!(f.pipeline.dedup_policy(), DedupPolicy::Skip);

        let msg = InboundMessage::text("m1", "u1", "hola");
        f.pipeline.process_message(&msg).await;
        let outcome = f.pipeline.process_message(&msg).await;

        assert_eq!(
            outcome,
            MessageOutcome::Duplicate {
                message_id: "m1".into()
            }
        );
        assert_eq!(f.sender.sent_count().await, 1);
        let session = f.db.storage.get_session("u1").await.unwrap().unwrap();
        assert_eq!(session.state, ConversationState::AwaitOption);
    }

    #[tokio::test]
    async fn duplicate_is_rerun_under_reprocess() {
        let f = fixture().await;
        let pipeline = f.pipeline.clone().with_dedup_policy(DedupPolicy::Reprocess);

        let msg = InboundMessage::text("m1", "u1", "hola");
        pipeline.process_message(&msg).await;
        let report = pipeline.process_batch(vec![msg]).await;

        assert_eq!(report.processed, 1);
        assert_eq!(report.duplicates, 1);
        let MessageOutcome::Processed(turn) = &report.outcomes[0] else {
            panic!("expected processed");
        };
        assert!(turn.redelivered);
        // Second run evaluates AWAIT_OPTION with "hola": invalid option.
        assert_eq!(turn.reply, replies::INVALID_OPTION);
        assert_eq!(f.sender.sent_count().await, 2);
    }
}
