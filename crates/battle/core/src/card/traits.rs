//! Card traits as a closed capability set.
//!
//! Card data names traits as strings. They are parsed once into
//! [`TraitFlags`] when a [`Card`](super::Card) is built, so the scheduler and
//! resolver test bits instead of comparing strings at every resolution site.

use bitflags::bitflags;

/// Known card traits.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CardTrait {
    /// Doubles damage against block.
    Crush,
    /// Pins the timeline entry to a caller-chosen position.
    Leisure,
    /// Pulls the timeline entry earlier by a caller-chosen offset.
    Strain,
    /// Resolves after every other card of the same actor.
    Last,
    /// Excluded from combos and the action-cost ether bonus.
    Outcast,
}

impl CardTrait {
    /// Returns the flag bit for this trait.
    pub const fn flag(self) -> TraitFlags {
        match self {
            Self::Crush => TraitFlags::CRUSH,
            Self::Leisure => TraitFlags::LEISURE,
            Self::Strain => TraitFlags::STRAIN,
            Self::Last => TraitFlags::LAST,
            Self::Outcast => TraitFlags::OUTCAST,
        }
    }
}

bitflags! {
    /// Resolved trait set of a card.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TraitFlags: u8 {
        const CRUSH   = 1 << 0;
        const LEISURE = 1 << 1;
        const STRAIN  = 1 << 2;
        const LAST    = 1 << 3;
        const OUTCAST = 1 << 4;
    }
}

impl TraitFlags {
    /// Parses trait names, ignoring names this engine does not know.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .fold(Self::empty(), |flags, name| match name.as_ref().parse::<CardTrait>() {
                Ok(known) => flags | known.flag(),
                Err(_) => {
                    tracing::trace!(name = name.as_ref(), "ignoring unknown card trait");
                    flags
                }
            })
    }

    /// Returns the trait names contained in this set, in declaration order.
    pub fn names(self) -> Vec<String> {
        use strum::IntoEnumIterator;

        CardTrait::iter()
            .filter(|t| self.contains(t.flag()))
            .map(|t| t.as_ref().to_string())
            .collect()
    }

    pub const fn has(self, card_trait: CardTrait) -> bool {
        self.contains(card_trait.flag())
    }
}
