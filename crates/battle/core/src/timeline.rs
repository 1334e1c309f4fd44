//! Speed-ordered timeline.
//!
//! Each actor's cards become a track of cumulative speed (`sp`) values:
//!
//! ```text
//! sp[i] = sp[i-1] + speed_cost(card[i]),  sp[-1] = 0
//! ```
//!
//! Trait overrides, in precedence order:
//!
//! 1. `leisure` pins the entry at a caller-supplied position instead of accumulating
//! 2. `strain` pulls the accumulated value earlier by a caller-supplied offset, floored at 1
//! 3. `last` moves the card behind every non-`last` card of the same actor
//!
//! A track is never allowed to go backwards: pinned and strained values are
//! clamped to the previous entry's `sp`. Ghost copies take the `sp` of the
//! entry before them and do not advance the track. Agility then shifts every
//! player entry earlier. The two tracks are merged by `sp`, the player winning
//! ties.

use std::collections::BTreeMap;

use crate::card::{CardInstance, CardTrait, InstanceId};
use crate::side::Side;

/// One queued action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimelineEntry {
    pub actor: Side,
    pub card: CardInstance,
    /// Cumulative speed value; the merge key.
    pub sp: i32,
    /// Position in the actor's submitted card list.
    pub original_index: usize,
}

/// Caller-supplied positions for `leisure` and `strain` cards, keyed by instance.
///
/// A trait without a supplied value falls back to normal accumulation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimelineAdjustments {
    #[cfg_attr(feature = "serde", serde(default))]
    pub leisure: BTreeMap<InstanceId, i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strain: BTreeMap<InstanceId, i32>,
}

impl TimelineAdjustments {
    pub fn with_leisure(mut self, instance: impl Into<String>, sp: i32) -> Self {
        self.leisure.insert(InstanceId::new(instance), sp);
        self
    }

    pub fn with_strain(mut self, instance: impl Into<String>, offset: i32) -> Self {
        self.strain.insert(InstanceId::new(instance), offset);
        self
    }
}

/// The two per-actor tracks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedOrder {
    pub player: Vec<TimelineEntry>,
    pub enemy: Vec<TimelineEntry>,
}

/// Builds both tracks. `agility` is subtracted from every player `sp`.
pub fn create_fixed_order(
    player: &[CardInstance],
    enemy: &[CardInstance],
    agility: i32,
    adjustments: &TimelineAdjustments,
) -> FixedOrder {
    let mut player_track = build_track(Side::Player, player, adjustments);
    for entry in &mut player_track {
        entry.sp -= agility;
    }
    let enemy_track = build_track(Side::Enemy, enemy, adjustments);

    tracing::debug!(
        player = ?player_track.iter().map(|e| e.sp).collect::<Vec<_>>(),
        enemy = ?enemy_track.iter().map(|e| e.sp).collect::<Vec<_>>(),
        agility,
        "timeline built"
    );

    FixedOrder {
        player: player_track,
        enemy: enemy_track,
    }
}

/// Builds one actor's non-decreasing track.
pub fn build_track(
    actor: Side,
    cards: &[CardInstance],
    adjustments: &TimelineAdjustments,
) -> Vec<TimelineEntry> {
    let (regular, deferred): (Vec<_>, Vec<_>) = cards
        .iter()
        .enumerate()
        .partition(|(_, card)| !card.card.has_trait(CardTrait::Last));

    let mut track = Vec::with_capacity(cards.len());
    let mut cursor: i32 = 0;
    for (original_index, card) in regular.into_iter().chain(deferred) {
        if card.ghost {
            track.push(TimelineEntry {
                actor,
                card: card.clone(),
                sp: cursor,
                original_index,
            });
            continue;
        }

        let cost = i32::try_from(card.card.speed_cost).unwrap_or(i32::MAX);
        let accumulated = cursor.saturating_add(cost);
        let id = &card.instance_id;

        let leisure = card
            .card
            .has_trait(CardTrait::Leisure)
            .then(|| adjustments.leisure.get(id))
            .flatten();
        let strain = card
            .card
            .has_trait(CardTrait::Strain)
            .then(|| adjustments.strain.get(id))
            .flatten();

        let sp = match (leisure, strain) {
            (Some(&pinned), _) => pinned.max(cursor),
            (None, Some(&offset)) => (accumulated - offset).max(1).max(cursor),
            (None, None) => accumulated,
        };
        cursor = sp;

        track.push(TimelineEntry {
            actor,
            card: card.clone(),
            sp,
            original_index,
        });
    }
    track
}

/// Merges both tracks into the execution queue.
///
/// Sorted by `sp` ascending; on an exact tie the player goes first, then the
/// original submission order decides.
pub fn merge_queue(order: &FixedOrder) -> Vec<TimelineEntry> {
    let mut queue: Vec<TimelineEntry> = order
        .player
        .iter()
        .chain(order.enemy.iter())
        .cloned()
        .collect();
    queue.sort_by_key(|entry| (entry.sp, entry.actor, entry.original_index));
    queue
}
