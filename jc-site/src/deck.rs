//! Flip-card deck state
//!
//! Cards flip when activated; a flipped card is shown enlarged in focus mode.
//! At most one card is focused at a time.

use serde::Serialize;
use std::collections::BTreeSet;

/// Upper bound on the focus-mode enlargement
pub const MAX_FOCUS_SCALE: f64 = 2.5;
/// Share of the viewport width a focused card may occupy
pub const FOCUS_WIDTH_RATIO: f64 = 0.9;
/// Share of the viewport height a focused card may occupy
pub const FOCUS_HEIGHT_RATIO: f64 = 0.85;

/// Keys the deck reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckKey {
    Enter,
    Space,
    Escape,
    Other,
}

impl DeckKey {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// A card's on-screen rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Transform that moves a card to the viewport centre and enlarges it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FocusTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl FocusTransform {
    pub fn css(&self) -> String {
        format!(
            "translate({:.1}px, {:.1}px) scale({:.3})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

/// Compute the focus-mode transform for a card.
///
/// The scale fills at most 90% of the viewport width and 85% of its height,
/// capped at [`MAX_FOCUS_SCALE`] and never shrinking the card.
pub fn focus_transform(viewport: Viewport, card: CardRect) -> FocusTransform {
    let scale = if card.width > 0.0 && card.height > 0.0 {
        (viewport.width * FOCUS_WIDTH_RATIO / card.width)
            .min(viewport.height * FOCUS_HEIGHT_RATIO / card.height)
            .min(MAX_FOCUS_SCALE)
            .max(1.0)
    } else {
        1.0
    };

    let card_centre_x = card.left + card.width / 2.0;
    let card_centre_y = card.top + card.height / 2.0;

    FocusTransform {
        translate_x: viewport.width / 2.0 - card_centre_x,
        translate_y: viewport.height / 2.0 - card_centre_y,
        scale,
    }
}

/// What a deck interaction changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckChange {
    /// Card flipped and now focused (previous focus, if any, was cleared)
    Focused { card: usize, unfocused: Option<usize> },
    /// Focused card returned to its front face
    Unfocused { card: usize },
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeckState {
    flipped: BTreeSet<usize>,
    focused: Option<usize>,
}

impl DeckState {
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn is_flipped(&self, card: usize) -> bool {
        self.flipped.contains(&card)
    }

    pub fn is_focused(&self, card: usize) -> bool {
        self.focused == Some(card)
    }

    /// Pointer activation, or Enter/Space on a card.
    ///
    /// Re-activating the focused card dismisses it; activating another card
    /// first clears the current focus.
    pub fn activate(&mut self, card: usize) -> DeckChange {
        if self.focused == Some(card) {
            return self.dismiss();
        }

        let unfocused = self.focused.take();
        if let Some(previous) = unfocused {
            self.flipped.remove(&previous);
        }

        self.flipped.insert(card);
        self.focused = Some(card);
        DeckChange::Focused { card, unfocused }
    }

    /// Overlay click or Escape: leave focus mode
    pub fn dismiss(&mut self) -> DeckChange {
        match self.focused.take() {
            Some(card) => {
                self.flipped.remove(&card);
                DeckChange::Unfocused { card }
            }
            None => DeckChange::Unchanged,
        }
    }

    pub fn key(&mut self, card: usize, key: DeckKey) -> DeckChange {
        match key {
            DeckKey::Enter | DeckKey::Space => self.activate(card),
            DeckKey::Escape => self.dismiss(),
            DeckKey::Other => DeckChange::Unchanged,
        }
    }

    /// Drop state for cards that are no longer displayed
    pub fn retain(&mut self, visible: impl Fn(usize) -> bool) {
        self.flipped.retain(|card| visible(*card));
        if self.focused.is_some_and(|card| !visible(card)) {
            self.focused = None;
        }
    }
}
