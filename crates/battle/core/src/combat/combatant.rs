//! Combatant and unit state.

use std::fmt;

use arrayvec::ArrayVec;

use super::ResolveError;
use crate::config::BattleConfig;
use crate::token::TokenLedger;

/// Identifier of a unit inside a grouped opponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Independent sub-combatant of a grouped opponent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub block: u32,
}

impl Unit {
    pub fn new(id: u32, name: impl Into<String>, max_hp: u32) -> Self {
        Self {
            id: UnitId(id),
            name: name.into(),
            hp: max_hp,
            max_hp,
            block: 0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

pub type Units = ArrayVec<Unit, { BattleConfig::MAX_UNITS }>;

/// One side of the battle.
///
/// # Invariants
///
/// - When `units` is non-empty, `hp` equals the sum of unit hp.
/// - `block`, `def`, `counter` and `ether_overdrive_active` only live for one
///   round; [`Combatant::reset_round`] clears them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub hp: u32,
    pub max_hp: u32,
    pub block: u32,
    /// Currently defending.
    pub def: bool,
    /// Damage dealt back to an attacker that lands hp damage.
    pub counter: u32,
    /// Flat bonus to damage and block. May be negative.
    pub strength: i32,
    /// Incoming hp damage in percent; 100 is neutral.
    pub vuln_pct: u32,
    /// Rounds until `vuln_pct` returns to neutral.
    pub vuln_turns: u32,
    pub ether_overdrive_active: bool,
    pub tokens: TokenLedger,
    pub units: Units,
}

impl Combatant {
    pub const NEUTRAL_VULNERABILITY: u32 = 100;

    pub fn new(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            block: 0,
            def: false,
            counter: 0,
            strength: 0,
            vuln_pct: Self::NEUTRAL_VULNERABILITY,
            vuln_turns: 0,
            ether_overdrive_active: false,
            tokens: TokenLedger::new(),
            units: Units::new(),
        }
    }

    /// Builds a grouped opponent. hp and max hp become the unit sums.
    pub fn with_units<I>(units: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = Unit>,
    {
        let mut combatant = Self::new(0);
        for unit in units {
            combatant
                .units
                .try_push(unit)
                .map_err(|_| ResolveError::TooManyUnits {
                    max: BattleConfig::MAX_UNITS,
                })?;
        }
        combatant.max_hp = combatant.units.iter().map(|u| u.max_hp).sum();
        combatant.sync_hp_from_units();
        Ok(combatant)
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.max_hp);
        self
    }

    pub fn with_strength(mut self, strength: i32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_vulnerability(mut self, pct: u32, turns: u32) -> Self {
        self.vuln_pct = pct;
        self.vuln_turns = turns;
        self
    }

    pub fn with_tokens(mut self, tokens: TokenLedger) -> Self {
        self.tokens = tokens;
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn has_units(&self) -> bool {
        !self.units.is_empty()
    }

    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_alive())
    }

    pub fn living_unit_count(&self) -> usize {
        self.living_units().count()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Recomputes `hp` as the sum of unit hp. No-op without units.
    pub fn sync_hp_from_units(&mut self) {
        if self.has_units() {
            self.hp = self.units.iter().map(|u| u.hp).sum();
        }
    }

    /// Scales incoming hp damage by the vulnerability percentage, flooring.
    pub fn vulnerable_damage(&self, amount: u32) -> u32 {
        let scaled = u64::from(amount) * u64::from(self.vuln_pct) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }

    /// Loses hp without any block interaction. Returns the hp actually lost.
    ///
    /// With units, the loss lands on `unit` when it is alive. Otherwise it runs
    /// through the living units in order, carrying what one unit cannot take
    /// to the next.
    pub fn lose_hp(&mut self, amount: u32, unit: Option<UnitId>) -> u32 {
        if !self.has_units() {
            let lost = amount.min(self.hp);
            self.hp -= lost;
            return lost;
        }

        let target = unit.filter(|id| self.unit(*id).is_some_and(Unit::is_alive));
        let lost = match target.and_then(|id| self.unit_mut(id)) {
            Some(unit) => {
                let lost = amount.min(unit.hp);
                unit.hp -= lost;
                lost
            }
            None => {
                let mut remaining = amount;
                for unit in self.units.iter_mut().filter(|u| u.is_alive()) {
                    let lost = remaining.min(unit.hp);
                    unit.hp -= lost;
                    remaining -= lost;
                    if remaining == 0 {
                        break;
                    }
                }
                amount - remaining
            }
        };
        self.sync_hp_from_units();
        lost
    }

    /// Restores hp up to `max_hp`. Returns the hp actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.has_units() {
            let mut remaining = amount;
            for unit in self.units.iter_mut().filter(|u| u.is_alive()) {
                let gained = remaining.min(unit.max_hp - unit.hp);
                unit.hp += gained;
                remaining -= gained;
            }
            self.sync_hp_from_units();
            return amount - remaining;
        }
        let gained = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += gained;
        gained
    }

    /// Clears per-round state and decays vulnerability by one round.
    pub fn reset_round(&mut self) {
        self.block = 0;
        self.def = false;
        self.counter = 0;
        self.ether_overdrive_active = false;
        for unit in &mut self.units {
            unit.block = 0;
        }
        if self.vuln_turns > 0 {
            self.vuln_turns -= 1;
            if self.vuln_turns == 0 {
                self.vuln_pct = Self::NEUTRAL_VULNERABILITY;
            }
        }
    }
}
