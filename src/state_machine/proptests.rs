//! Property-based tests for the pipeline steps
//!
//! Runs whole turns through the pure steps with a scripted model outcome and
//! checks the history invariants across arbitrary input sequences.

use super::*;
use crate::llm::LlmError;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// One turn over the linear table, with the model answering `outcome`
fn run_turn(state: &mut ConversationState, input: &str, outcome: Result<String, LlmError>) {
    state.user_input = input.to_string();
    state.apply(admit_input(state));
    match plan_reply(state) {
        ReplyPlan::Respond(update) => state.apply(update),
        ReplyPlan::Generate => {
            let update = apply_reply(state, outcome);
            state.apply(update);
        }
    }
    state.apply(refresh_metadata(state));
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z?! ]{1,40}",
        Just(String::new()),
        "[ \t\n]{1,5}",
    ]
}

fn arb_non_blank_input() -> impl Strategy<Value = String> {
    "[ ]{0,3}[a-zA-Z?!]{1,30}[ ]{0,3}"
}

fn arb_outcome() -> impl Strategy<Value = Result<String, LlmError>> {
    prop_oneof![
        "[a-zA-Z .]{0,40}".prop_map(Ok::<String, LlmError>),
        "[a-z ]{1,20}".prop_map(|m| Err::<String, _>(LlmError::network(m))),
        "[a-z ]{1,20}".prop_map(|m| Err::<String, _>(LlmError::rate_limit(m))),
    ]
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::System), Just(Role::User), Just(Role::Assistant)]
}

fn arb_messages() -> impl Strategy<Value = Vec<Message>> {
    proptest::collection::vec(
        (arb_role(), "[a-z ]{0,20}").prop_map(|(role, content)| Message::new(role, content)),
        0..12,
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_system_message_at_most_once_and_first(
        turns in proptest::collection::vec((arb_input(), arb_outcome()), 1..8)
    ) {
        let mut state = ConversationState::new("prop");
        for (input, outcome) in turns {
            run_turn(&mut state, &input, outcome);
            let systems = state.messages.iter().filter(|m| m.role == Role::System).count();
            prop_assert!(systems <= 1);
            prop_assert!(state.system_message_well_placed());
            prop_assert_eq!(state.has_system_message(), !state.messages.is_empty());
        }
    }

    #[test]
    fn prop_history_is_append_only(
        turns in proptest::collection::vec((arb_input(), arb_outcome()), 1..8)
    ) {
        let mut state = ConversationState::new("prop");
        for (input, outcome) in turns {
            let before = state.messages.clone();
            run_turn(&mut state, &input, outcome);
            prop_assert!(state.messages.len() >= before.len());
            prop_assert_eq!(&state.messages[..before.len()], &before[..]);
        }
    }

    #[test]
    fn prop_non_blank_turn_adds_user_and_assistant(
        prior in proptest::collection::vec((arb_non_blank_input(), arb_outcome()), 0..4),
        input in arb_non_blank_input(),
        outcome in arb_outcome(),
    ) {
        let mut state = ConversationState::new("prop");
        for (i, o) in prior {
            run_turn(&mut state, &i, o);
        }
        let before = state.messages.len();
        run_turn(&mut state, &input, outcome);

        let expected = if before == 0 { 3 } else { 2 };
        prop_assert_eq!(state.messages.len(), before + expected);
        prop_assert_eq!(state.messages[state.messages.len() - 2].role, Role::User);
        prop_assert_eq!(state.messages[state.messages.len() - 1].role, Role::Assistant);
        prop_assert_eq!(
            &state.messages[state.messages.len() - 1].content,
            &state.assistant_response
        );
    }

    #[test]
    fn prop_blank_turn_leaves_history_alone(
        prior in proptest::collection::vec((arb_non_blank_input(), arb_outcome()), 0..4),
        blank in "[ \t\n]{0,6}",
    ) {
        let mut state = ConversationState::new("prop");
        for (i, o) in prior {
            run_turn(&mut state, &i, o);
        }
        let before = state.messages.clone();
        run_turn(&mut state, &blank, Ok("unused".to_string()));

        prop_assert_eq!(&state.messages, &before);
        let expected = if before.is_empty() {
            crate::system_prompt::GREETING
        } else {
            crate::system_prompt::EMPTY_INPUT_PROMPT
        };
        prop_assert_eq!(state.assistant_response.as_str(), expected);
    }

    #[test]
    fn prop_metadata_refresh_is_idempotent(messages in arb_messages()) {
        let mut state = ConversationState::new("prop");
        state.messages = messages;

        state.apply(refresh_metadata(&state));
        let once = state.metadata.clone();
        state.apply(refresh_metadata(&state));

        prop_assert_eq!(&state.metadata, &once);
    }

    #[test]
    fn prop_metadata_matches_history(messages in arb_messages()) {
        let meta = Metadata::from_messages(&messages);
        prop_assert_eq!(meta.total_messages, messages.len());
        prop_assert_eq!(
            meta.user_messages + meta.assistant_messages
                + messages.iter().filter(|m| m.role == Role::System).count(),
            messages.len()
        );
        prop_assert_eq!(meta.last_updated.is_some(), !messages.is_empty());
    }

    #[test]
    fn prop_conversation_id_never_changes(
        turns in proptest::collection::vec((arb_input(), arb_outcome()), 1..6)
    ) {
        let mut state = ConversationState::new("fixed-id");
        for (input, outcome) in turns {
            run_turn(&mut state, &input, outcome);
            prop_assert_eq!(state.conversation_id.as_str(), "fixed-id");
        }
    }
}
