//! Qualitative day labels.

use std::fmt;

/// The dominant weather driver of a day, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vibe {
    Water,
    Air,
    CottonCandy,
    Ether,
    Fire,
    Earth,
}

impl Vibe {
    pub fn emoji(self) -> &'static str {
        match self {
            Vibe::Water => "💧",
            Vibe::Air => "🌬️",
            Vibe::CottonCandy => "🩷",
            Vibe::Ether => "✨",
            Vibe::Fire => "🔥",
            Vibe::Earth => "🌿",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Vibe::Water => "WATER",
            Vibe::Air => "AIR",
            Vibe::CottonCandy => "Cotton-candy sky",
            Vibe::Ether => "ETHER",
            Vibe::Fire => "FIRE",
            Vibe::Earth => "EARTH",
        }
    }

    pub fn fortune(self) -> &'static str {
        match self {
            Vibe::Water => "Trust the flow; clarity comes after the soak.",
            Vibe::Air => "Fresh perspectives are heading your way.",
            Vibe::CottonCandy => "The ozone is electric. Expect majestic sky hues.",
            Vibe::Ether => "THE Perfect Match. The sky is cosmically aligned.",
            Vibe::Fire => "Fortune favors the bold. Make that big move today.",
            Vibe::Earth => "Grounded and stable. A day for steady progress.",
        }
    }
}

impl fmt::Display for Vibe {
    /// `"💧 WATER | Trust the flow; clarity comes after the soak."`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} | {}", self.emoji(), self.name(), self.fortune())
    }
}
