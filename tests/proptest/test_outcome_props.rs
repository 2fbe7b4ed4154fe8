//! Property-based tests for run outcome evaluation
//!
//! Whatever a sandbox relays, the verdict depends only on whether an
//! error from the judged run arrived and whether the bundle had content.

use codequest::console::MessageLog;
use codequest::evaluator::{OutcomeEvaluator, RunTicket};
use codequest::models::{RunOutcome, RuntimeMessage, SourceBundle};
use codequest::sandbox::{MessageChannel, RunId};
use proptest::prelude::*;
use std::time::Duration;

fn message_strategy() -> impl Strategy<Value = RuntimeMessage> {
    prop_oneof![
        ".{0,20}".prop_map(RuntimeMessage::Log),
        ".{0,20}".prop_map(RuntimeMessage::Warn),
        ".{0,20}".prop_map(RuntimeMessage::Error),
    ]
}

fn bundle_strategy() -> impl Strategy<Value = SourceBundle> {
    ("[ \t\n]{0,3}|<p>x</p>", "[ \t\n]{0,3}|p\\{\\}", "[ \t\n]{0,3}|go\\(\\)")
        .prop_map(|(markup, style, script)| SourceBundle::new(markup, style, script))
}

fn judge(messages: &[(bool, RuntimeMessage)], bundle: &SourceBundle) -> (RunOutcome, usize) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    runtime.block_on(async {
        let (channel, mut inbox) = MessageChannel::new();
        let own = channel.sender_for(RunId(2));
        let stale = channel.sender_for(RunId(1));
        for (is_own, message) in messages {
            let sender = if *is_own { &own } else { &stale };
            sender.send(message.clone());
        }

        let mut log = MessageLog::new();
        let outcome = OutcomeEvaluator::new(Duration::from_millis(5))
            .judge(RunTicket::start(RunId(2)), bundle, &mut inbox, &mut log)
            .await;
        (outcome, log.len())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_verdict_depends_only_on_own_errors(
        messages in prop::collection::vec((any::<bool>(), message_strategy()), 0..20),
        bundle in bundle_strategy(),
    ) {
        let (outcome, shown) = judge(&messages, &bundle);

        let own_error = messages.iter().any(|(own, m)| *own && m.is_error());
        prop_assert_eq!(outcome.errored, own_error);
        prop_assert_eq!(outcome.had_any_content, bundle.has_content());
        prop_assert_eq!(outcome.is_success(), !own_error && bundle.has_content());
        // every message is displayed, stale or not
        prop_assert_eq!(shown, messages.len());
    }

    #[test]
    fn test_whitespace_only_bundle_never_succeeds(
        markup in "[ \t\n]{0,5}",
        style in "[ \t\n]{0,5}",
        script in "[ \t\n]{0,5}",
    ) {
        let bundle = SourceBundle::new(markup, style, script);
        let outcome = RunOutcome::evaluate(false, &bundle);
        prop_assert!(!outcome.is_success());
    }
}
