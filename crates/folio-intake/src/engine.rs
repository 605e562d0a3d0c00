// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The intake dialogue as a pure transition function.
//!
//! [`transition`] maps `(current state, normalized text)` to the next state,
//! the store effect to execute, and the reply to send. It performs no I/O;
//! the pipeline executes the effect and commits the state.
//!
//! ```text
//! INITIAL ──any──▶ AWAIT_OPTION ──1|2|3──▶ AWAIT_DETAILS ──any──▶ INITIAL
//!                      │   ▲                                      ▲
//!                      │   └──────other (invalid option)          │
//!                      └──4|5─────────────────────────────────────┘
//! ```
//!
//! A reset keyword in any state is evaluated as if the user were in
//! `INITIAL`.

use folio_core::{ConversationState, TicketCategory};

/// Words that restart the dialogue from any state.
pub const RESET_KEYWORDS: [&str; 3] = ["menu", "inicio", "0"];

/// Store operation a turn requires before the state is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Open a ticket in this category.
    OpenTicket(TicketCategory),
    /// Attach the raw message body to the user's latest open ticket.
    AttachDetails,
}

/// Which reply text to send. Rendering lives in [`crate::replies`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Menu,
    DetailsPrompt(TicketCategory),
    Packages,
    Advisor,
    InvalidOption,
    /// Details received; the text includes the ticket id when one was updated.
    Confirmation,
}

/// Decision for one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State the table was evaluated in: `INITIAL` after a reset keyword,
    /// otherwise the stored state.
    pub evaluated: ConversationState,
    /// Whether a reset keyword overrode the stored state.
    pub reset: bool,
    pub effect: Effect,
    /// State to commit.
    pub next: ConversationState,
    pub reply: Reply,
}

/// Whether `normalized` is one of [`RESET_KEYWORDS`].
pub fn is_reset_keyword(normalized: &str) -> bool {
    RESET_KEYWORDS.contains(&normalized)
}

/// Category for a ticket-opening menu option.
pub fn category_for_option(normalized: &str) -> Option<TicketCategory> {
    match normalized {
        "1" => Some(TicketCategory::Support),
        "2" => Some(TicketCategory::Security),
        "3" => Some(TicketCategory::Surveillance),
        _ => None,
    }
}

/// Decide the turn for a user in `current` who sent `normalized`.
///
/// Total over every state and input.
pub fn transition(current: ConversationState, normalized: &str) -> Transition {
    let reset = is_reset_keyword(normalized);
    let evaluated = if reset {
        ConversationState::Initial
    } else {
        current
    };

    let (effect, next, reply) = match evaluated {
        ConversationState::Initial => (Effect::None, ConversationState::AwaitOption, Reply::Menu),
        ConversationState::AwaitOption => match normalized {
            "4" => (Effect::None, ConversationState::Initial, Reply::Packages),
            "5" => (Effect::None, ConversationState::Initial, Reply::Advisor),
            other => match category_for_option(other) {
                Some(category) => (
                    Effect::OpenTicket(category),
                    ConversationState::AwaitDetails,
                    Reply::DetailsPrompt(category),
                ),
                None => (
                    Effect::None,
                    ConversationState::AwaitOption,
                    Reply::InvalidOption,
                ),
            },
        },
        ConversationState::AwaitDetails => (
            Effect::AttachDetails,
            ConversationState::Initial,
            Reply::Confirmation,
        ),
    };

    Transition {
        evaluated,
        reset,
        effect,
        next,
        reply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use proptest::prelude::*;

    const ALL_STATES: [ConversationState; 3] = [
        ConversationState::Initial,
        ConversationState::AwaitOption,
        ConversationState::AwaitDetails,
    ];

    #[test]
    fn initial_always_shows_menu() {
        for input in ["hola", "1", "", "[tipo: image]"] {
            let t = transition(ConversationState::Initial, input);
            assert_eq!(t.reply, Reply::Menu);
            assert_eq!(t.effect, Effect::None);
            assert_eq!(t.next, ConversationState::AwaitOption);
        }
    }

    #[test]
    fn ticket_options_open_tickets() {
        let cases = [
            ("1", TicketCategory::Support),
            ("2", TicketCategory::Security),
            ("3", TicketCategory::Surveillance),
        ];
        for (input, category) in cases {
            let t = transition(ConversationState::AwaitOption, input);
            assert_eq!(t.effect, Effect::OpenTicket(category));
            assert_eq!(t.next, ConversationState::AwaitDetails);
            assert_eq!(t.reply, Reply::DetailsPrompt(category));
        }
    }

    #[test]
    fn info_options_return_to_initial() {
        let t = transition(ConversationState::AwaitOption, "4");
        assert_eq!(
            (t.effect, t.next, t.reply),
            (Effect::None, ConversationState::Initial, Reply::Packages)
        );

        let t = transition(ConversationState::AwaitOption, "5");
        assert_eq!(
            (t.effect, t.next, t.reply),
            (Effect::None, ConversationState::Initial, Reply::Advisor)
        );
    }

    #[test]
    fn invalid_option_keeps_state() {
        for input in ["9", "6", "1 2", "uno", "[tipo: sticker]", ""] {
            let t = transition(ConversationState::AwaitOption, input);
            assert_eq!(t.next, ConversationState::AwaitOption, "input {input:?}");
            assert_eq!(t.reply, Reply::InvalidOption);
            assert_eq!(t.effect, Effect::None);
        }
    }

    #[test]
    fn details_are_attached_then_back_to_initial() {
        let t = transition(
            ConversationState::AwaitDetails,
            &normalize("No enciende la PC desde ayer"),
        );
        assert_eq!(t.effect, Effect::AttachDetails);
        assert_eq!(t.next, ConversationState::Initial);
        assert_eq!(t.reply, Reply::Confirmation);
        assert!(!t.reset);
    }

    #[test]
    fn menu_from_await_details_shows_menu_not_confirmation() {
        let t = transition(ConversationState::AwaitDetails, &normalize("  MENU "));
        assert!(t.reset);
        assert_eq!(t.evaluated, ConversationState::Initial);
        assert_eq!(t.reply, Reply::Menu);
        assert_eq!(t.effect, Effect::None);
    }

    #[test]
    fn zero_is_a_reset_not_an_option() {
        let t = transition(ConversationState::AwaitOption, "0");
        assert!(t.reset);
        assert_eq!(t.reply, Reply::Menu);
    }

    #[test]
    fn digits_with_padding_still_match_after_normalize() {
        let t = transition(ConversationState::AwaitOption, &normalize(" 2 "));
        assert_eq!(t.effect, Effect::OpenTicket(TicketCategory::Security));
    }

    fn any_state() -> impl Strategy<Value = ConversationState> {
        prop::sample::select(ALL_STATES.to_vec())
    }

    proptest! {
        #[test]
        fn every_state_and_input_has_a_defined_turn(
            state in any_state(),
            raw in "\\PC{0,40}"
        ) {
            let t = transition(state, &normalize(&raw));
            // Effects only occur in the states that own them.
            match t.effect {
                Effect::OpenTicket(_) => {
                    prop_assert_eq!(t.evaluated, ConversationState::AwaitOption);
                }
                Effect::AttachDetails => {
                    prop_assert_eq!(t.evaluated, ConversationState::AwaitDetails);
                }
                Effect::None => {}
            }
            prop_assert_eq!(t.reset, t.evaluated != state || is_reset_keyword(&normalize(&raw)));
        }

        #[test]
        fn reset_keywords_always_reenter_initial(
            state in any_state(),
            keyword in prop::sample::select(RESET_KEYWORDS.to_vec()),
            pad_left in "[ \t]{0,3}",
            pad_right in "[ \t]{0,3}",
            upper in any::<bool>(),
        ) {
            let word = if upper { keyword.to_uppercase() } else { keyword.to_string() };
            let t = transition(state, &normalize(&format!("{pad_left}{word}{pad_right}")));
            prop_assert!(t.reset);
            prop_assert_eq!(t.evaluated, ConversationState::Initial);
            prop_assert_eq!(t.reply, Reply::Menu);
            prop_assert_eq!(t.next, ConversationState::AwaitOption);
        }

        #[test]
        fn non_text_placeholder_is_invalid_option(kind in "[a-z_]{1,12}") {
            let body = folio_core::types::placeholder_body(&kind);
            let t = transition(ConversationState::AwaitOption, &normalize(&body));
            prop_assert_eq!(t.reply, Reply::InvalidOption);
        }
    }
}
