// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-to-intent classification for inbound chat messages.
//!
//! Users interact in Thai via two trigger words and tap-to-send selection
//! payloads. Classification is exact-match on the trimmed text; anything
//! unrecognized falls back to the greeting menu rather than an error.

use sudsbot_core::MachineKind;

/// Trigger word that opens the washer list.
pub const WASHER_TRIGGER: &str = "ซักผ้า";
/// Trigger word that opens the dryer list.
pub const DRYER_TRIGGER: &str = "อบผ้า";

/// Separator inside a selection payload (`ซัก_เลือก_3`).
const SELECT_SEPARATOR: &str = "_เลือก_";

/// What an inbound text message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Unrecognized or first-contact text: show the service menu.
    GreetOrUnknown,
    /// List active washers.
    ListWashers,
    /// List active dryers.
    ListDryers,
    /// A tapped machine choice.
    SelectMachine { kind: MachineKind, number: i64 },
}

/// Classify a raw message text into an [`Intent`].
///
/// Matching is exact on the trimmed text. Partial matches ("ซักผ้าหน่อย")
/// deliberately fall through to the menu.
pub fn classify(text: &str) -> Intent {
    let trimmed = text.trim();
    match trimmed {
        WASHER_TRIGGER => Intent::ListWashers,
        DRYER_TRIGGER => Intent::ListDryers,
        _ => match parse_selection(trimmed) {
            Some((kind, number)) => Intent::SelectMachine { kind, number },
            None => Intent::GreetOrUnknown,
        },
    }
}

/// Build the payload a quick-reply button sends back for a machine.
pub fn selection_payload(kind: MachineKind, number: i64) -> String {
    format!("{}{}{}", kind.service_word(), SELECT_SEPARATOR, number)
}

/// Parse a selection payload of the form `<service_word>_เลือก_<number>`.
///
/// Returns `None` for anything malformed: unknown service word,
/// non-numeric suffix, or a non-positive number.
pub fn parse_selection(text: &str) -> Option<(MachineKind, i64)> {
    let (word, rest) = text.split_once(SELECT_SEPARATOR)?;
    let kind = MachineKind::from_service_word(word)?;
    let number: i64 = rest.parse().ok()?;
    if number <= 0 {
        return None;
    }
    Some((kind, number))
}
