use std::sync::Mutex;

use async_trait::async_trait;
use recap::BotError;
use recap::worker::summarize::NO_MESSAGES_MESSAGE;
use recap::delivery::{
    DM_CONFIRMATION, DeferredInteraction, DeliveryLimits, Dispatcher, DisplayUnit,
    ERROR_REPLY_PREFIX, LiveMessage, ReplyContent, ReplyPayload, ReplyTransport, ResponseState,
    ResponseTarget, SUMMARY_COLOR, SentMessage,
};

/// One platform call seen by the mock transport.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Post {
        channel_id: String,
        thread_ts: Option<String>,
        payload: ReplyPayload,
    },
    Respond {
        replace_original: bool,
        payload: ReplyPayload,
    },
    Direct {
        user_id: String,
        payload: ReplyPayload,
    },
}

/// Records every call; fails calls whose index is in `fail_at`.
#[derive(Default)]
struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    fail_at: Vec<usize>,
}

impl RecordingTransport {
    fn failing_at(fail_at: &[usize]) -> Self {
        Self {
            calls: Mutex::default(),
            fail_at: fail_at.to_vec(),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<usize, BotError> {
        let mut calls = self.calls.lock().unwrap();
        let idx = calls.len();
        calls.push(call);
        if self.fail_at.contains(&idx) {
            return Err(BotError::ApiError(format!("call {idx} rejected")));
        }
        Ok(idx)
    }
}

#[async_trait]
impl ReplyTransport for RecordingTransport {
    async fn post_message(
        &self,
        channel_id: &str,
        thread_ts: Option<&str>,
        payload: &ReplyPayload,
    ) -> Result<SentMessage, BotError> {
        let idx = self.record(Call::Post {
            channel_id: channel_id.to_string(),
            thread_ts: thread_ts.map(ToString::to_string),
            payload: payload.clone(),
        })?;
        Ok(SentMessage {
            channel_id: channel_id.to_string(),
            ts: format!("ts-{idx}"),
        })
    }

    async fn respond(
        &self,
        _response_url: &str,
        payload: &ReplyPayload,
        replace_original: bool,
    ) -> Result<(), BotError> {
        self.record(Call::Respond {
            replace_original,
            payload: payload.clone(),
        })?;
        Ok(())
    }

    async fn send_direct(
        &self,
        user_id: &str,
        payload: &ReplyPayload,
    ) -> Result<SentMessage, BotError> {
        let idx = self.record(Call::Direct {
            user_id: user_id.to_string(),
            payload: payload.clone(),
        })?;
        Ok(SentMessage {
            channel_id: "D1".to_string(),
            ts: format!("ts-{idx}"),
        })
    }
}

fn live_target() -> ResponseTarget {
    ResponseTarget::LiveMessage(LiveMessage {
        channel_id: "C1".to_string(),
        ts: "100.1".to_string(),
        thread_ts: None,
        user_id: "U1".to_string(),
    })
}

fn interaction_target(state: ResponseState, channel_id: Option<&str>) -> ResponseTarget {
    ResponseTarget::DeferredInteraction(DeferredInteraction {
        response_url: "https://hooks.slack.com/commands/1".to_string(),
        channel_id: channel_id.map(ToString::to_string),
        user_id: "U1".to_string(),
        state,
    })
}

fn text(payload: &str) -> ReplyPayload {
    ReplyPayload::Text(payload.to_string())
}

fn long_summary() -> ReplyContent {
    ReplyContent::Units(vec![
        DisplayUnit::new(SUMMARY_COLOR)
            .with_title("Summary of #general")
            .with_body("w".repeat(9000))
            .with_footer("gpt-4o · 50 messages"),
    ])
}

#[tokio::test]
async fn test_plain_text_to_live_message_is_one_threaded_reply() {
    let transport = RecordingTransport::default();
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = live_target();

    let sent = dispatcher
        .safe_reply(&mut target, "No messages found to summarize.", false)
        .await;

    assert_eq!(
        transport.calls(),
        vec![Call::Post {
            channel_id: "C1".to_string(),
            thread_ts: Some("100.1".to_string()),
            payload: text("No messages found to summarize."),
        }]
    );
    assert_eq!(NO_MESSAGES_MESSAGE, "No messages found to summarize.");
    assert_eq!(
        sent,
        Some(SentMessage {
            channel_id: "C1".to_string(),
            ts: "ts-0".to_string(),
        })
    );
}

#[tokio::test]
async fn test_dm_for_deferred_interaction_confirms_with_update() {
    let transport = RecordingTransport::default();
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = interaction_target(ResponseState::Deferred, Some("C1"));

    let sent = dispatcher.safe_reply(&mut target, "Summary text", true).await;

    assert_eq!(sent, None);
    assert_eq!(
        transport.calls(),
        vec![
            Call::Direct {
                user_id: "U1".to_string(),
                payload: text("Summary text"),
            },
            Call::Respond {
                replace_original: true,
                payload: text(DM_CONFIRMATION),
            },
        ]
    );
    assert_eq!(target.response_state(), Some(ResponseState::Responded));
}

#[tokio::test]
async fn test_dm_for_live_message_returns_first_dm() {
    let transport = RecordingTransport::default();
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = live_target();

    let sent = dispatcher.safe_reply(&mut target, long_summary(), true).await;

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| matches!(c, Call::Direct { .. })));
    assert_eq!(sent.map(|s| s.ts), Some("ts-0".to_string()));
}

#[tokio::test]
async fn test_failed_send_produces_single_error_notice() {
    let transport = RecordingTransport::failing_at(&[0]);
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = live_target();

    let sent = dispatcher.safe_reply(&mut target, "Hello", false).await;

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    match &calls[1] {
        Call::Post {
            payload: ReplyPayload::Text(notice),
            ..
        } => {
            assert!(notice.starts_with(ERROR_REPLY_PREFIX));
            assert!(notice.contains("call 0 rejected"));
        }
        other => panic!("unexpected fallback call {other:?}"),
    }
    assert_eq!(sent.map(|s| s.ts), Some("ts-1".to_string()));
}

#[tokio::test]
async fn test_failed_fallback_is_swallowed() {
    let transport = RecordingTransport::failing_at(&[0, 1]);
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = live_target();

    let sent = dispatcher.safe_reply(&mut target, "Hello", false).await;

    assert_eq!(sent, None);
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_failed_dm_falls_back_in_channel() {
    let transport = RecordingTransport::failing_at(&[0]);
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = interaction_target(ResponseState::Deferred, Some("C1"));

    let sent = dispatcher.safe_reply(&mut target, "Summary", true).await;

    assert_eq!(sent, None);
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(
        &calls[1],
        Call::Respond { replace_original: true, payload: ReplyPayload::Text(t) }
            if t.starts_with(ERROR_REPLY_PREFIX)
    ));
}

#[tokio::test]
async fn test_long_summary_for_interaction_updates_then_follows_up() {
    let transport = RecordingTransport::default();
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = interaction_target(ResponseState::Deferred, Some("C9"));

    let sent = dispatcher.safe_reply(&mut target, long_summary(), false).await;

    assert_eq!(sent, None);
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        Call::Respond {
            replace_original: true,
            payload: ReplyPayload::Units(units),
        } => {
            assert_eq!(units.len(), 1);
            assert_eq!(units[0].title(), Some("Summary of #general"));
        }
        other => panic!("unexpected first call {other:?}"),
    }
    match &calls[1] {
        Call::Post {
            channel_id,
            thread_ts: None,
            payload: ReplyPayload::Units(units),
        } => {
            assert_eq!(channel_id, "C9");
            assert_eq!(units.len(), 2);
            assert_eq!(units[1].footer(), Some("gpt-4o · 50 messages"));
        }
        other => panic!("unexpected follow-up {other:?}"),
    }
}

#[tokio::test]
async fn test_follow_up_without_channel_is_skipped() {
    let transport = RecordingTransport::default();
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = interaction_target(ResponseState::Deferred, None);

    let sent = dispatcher.safe_reply(&mut target, long_summary(), false).await;

    assert_eq!(sent, None);
    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], Call::Respond { .. }));
}

#[tokio::test]
async fn test_not_responded_interaction_uses_initial_response() {
    let transport = RecordingTransport::default();
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = interaction_target(ResponseState::NotResponded, Some("C1"));

    dispatcher.safe_reply(&mut target, "first", false).await;
    dispatcher.safe_reply(&mut target, "second", false).await;

    assert_eq!(
        transport.calls(),
        vec![
            Call::Respond {
                replace_original: false,
                payload: text("first"),
            },
            Call::Post {
                channel_id: "C1".to_string(),
                thread_ts: None,
                payload: text("second"),
            },
        ]
    );
}

#[tokio::test]
async fn test_live_multi_part_reply_stays_in_thread() {
    let transport = RecordingTransport::default();
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = ResponseTarget::LiveMessage(LiveMessage {
        channel_id: "C1".to_string(),
        ts: "200.2".to_string(),
        thread_ts: Some("150.0".to_string()),
        user_id: "U1".to_string(),
    });

    let sent = dispatcher.safe_reply(&mut target, long_summary(), false).await;

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| matches!(
        c,
        Call::Post { thread_ts: Some(t), .. } if t == "150.0"
    )));
    assert_eq!(sent.map(|s| s.ts), Some("ts-0".to_string()));
}

#[tokio::test]
async fn test_error_mid_reply_stops_further_sends() {
    let transport = RecordingTransport::failing_at(&[1]);
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = interaction_target(ResponseState::Deferred, Some("C1"));

    dispatcher.safe_reply(&mut target, long_summary(), false).await;

    let calls = transport.calls();
    // update, failed follow-up, then the notice as a follow-up since the update landed
    assert_eq!(calls.len(), 3);
    assert!(matches!(
        &calls[2],
        Call::Post { payload: ReplyPayload::Text(t), .. } if t.starts_with(ERROR_REPLY_PREFIX)
    ));
}

#[tokio::test]
async fn test_dm_for_unanswered_interaction_confirms_with_initial_response() {
    let transport = RecordingTransport::default();
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = interaction_target(ResponseState::NotResponded, None);

    let sent = dispatcher.safe_reply(&mut target, "Summary text", true).await;

    assert_eq!(sent, None);
    assert_eq!(
        transport.calls(),
        vec![
            Call::Direct {
                user_id: "U1".to_string(),
                payload: text("Summary text"),
            },
            Call::Respond {
                replace_original: false,
                payload: text(DM_CONFIRMATION),
            },
        ]
    );
    assert_eq!(target.response_state(), Some(ResponseState::Responded));
}

#[tokio::test]
async fn test_answered_interaction_without_channel_sends_nothing() {
    let transport = RecordingTransport::default();
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = interaction_target(ResponseState::Responded, None);

    let sent = dispatcher.safe_reply(&mut target, "late reply", false).await;

    assert_eq!(sent, None);
    assert!(transport.calls().is_empty());
    assert_eq!(target.response_state(), Some(ResponseState::Responded));
}

#[tokio::test]
async fn test_answered_interaction_with_channel_posts_follow_up() {
    let transport = RecordingTransport::default();
    let dispatcher = Dispatcher::new(&transport, DeliveryLimits::default());
    let mut target = interaction_target(ResponseState::Responded, Some("C1"));

    let sent = dispatcher.safe_reply(&mut target, "late reply", false).await;

    assert_eq!(sent, None);
    assert_eq!(
        transport.calls(),
        vec![Call::Post {
            channel_id: "C1".to_string(),
            thread_ts: None,
            payload: text("late reply"),
        }]
    );
}
