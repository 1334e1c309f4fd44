//! Ether points, overdrive slots and the opponent overdrive hook.

use crate::combat::Combatant;
use crate::config::BattleConfig;
use crate::side::Side;

/// Accumulated ether points of one actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EtherPool {
    pub points: u32,
}

impl EtherPool {
    pub const fn new(points: u32) -> Self {
        Self { points }
    }

    /// Whole overdrive slots currently available.
    pub fn slots(&self, config: &BattleConfig) -> u32 {
        self.points.checked_div(config.ether_per_slot).unwrap_or(0)
    }

    pub fn credit(self, gain: u32) -> Self {
        Self {
            points: self.points.saturating_add(gain),
        }
    }
}

/// Result of an overdrive request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverdriveOutcome {
    pub pool: EtherPool,
    pub combatant: Combatant,
    pub activated: bool,
    pub logs: Vec<String>,
}

/// Spends one slot to turn on overdrive for the rest of the round.
///
/// Without a full slot, or with overdrive already on, nothing changes.
pub fn activate_overdrive(
    side: Side,
    pool: &EtherPool,
    combatant: &Combatant,
    config: &BattleConfig,
) -> OverdriveOutcome {
    let unchanged = |line: String| OverdriveOutcome {
        pool: *pool,
        combatant: combatant.clone(),
        activated: false,
        logs: vec![line],
    };

    if combatant.ether_overdrive_active {
        return unchanged(format!("{side} overdrive already active"));
    }
    if pool.slots(config) == 0 {
        return unchanged(format!(
            "{side} needs {} ether for overdrive ({} held)",
            config.ether_per_slot, pool.points
        ));
    }

    let spent = EtherPool::new(pool.points - config.ether_per_slot);
    let mut boosted = combatant.clone();
    boosted.ether_overdrive_active = true;
    OverdriveOutcome {
        pool: spent,
        combatant: boosted,
        activated: true,
        logs: vec![format!(
            "{side} overdrive! ether {} → {}",
            pool.points, spent.points
        )],
    }
}

/// Opponent overdrive decision.
///
/// Always false while `enemy_overdrive_enabled` is off; otherwise the opponent
/// overdrives whenever it holds a full slot.
pub fn should_enemy_overdrive(enemy: &Combatant, pool: &EtherPool, config: &BattleConfig) -> bool {
    if !config.enemy_overdrive_enabled {
        return false;
    }
    enemy.is_alive() && !enemy.ether_overdrive_active && pool.slots(config) > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_floor_points() {
        let config = BattleConfig::default();
        assert_eq!(EtherPool::new(99).slots(&config), 0);
        assert_eq!(EtherPool::new(250).slots(&config), 2);
    }

    #[test]
    fn activation_spends_one_slot() {
        let config = BattleConfig::default();
        let out = activate_overdrive(Side::Player, &EtherPool::new(230), &Combatant::new(30), &config);
        assert!(out.activated);
        assert_eq!(out.pool.points, 130);
        assert!(out.combatant.ether_overdrive_active);

        let again = activate_overdrive(Side::Player, &out.pool, &out.combatant, &config);
        assert!(!again.activated);
        assert_eq!(again.pool, out.pool);
    }

    #[test]
    fn activation_without_slot_is_noop() {
        let config = BattleConfig::default();
        let out = activate_overdrive(Side::Player, &EtherPool::new(40), &Combatant::new(30), &config);
        assert!(!out.activated);
        assert_eq!(out.pool.points, 40);
        assert!(!out.combatant.ether_overdrive_active);
    }

    #[test]
    fn enemy_hook_respects_flag() {
        let pool = EtherPool::new(500);
        let enemy = Combatant::new(30);
        assert!(!should_enemy_overdrive(&enemy, &pool, &BattleConfig::default()));

        let enabled = BattleConfig {
            enemy_overdrive_enabled: true,
            ..BattleConfig::default()
        };
        assert!(should_enemy_overdrive(&enemy, &pool, &enabled));
        assert!(!should_enemy_overdrive(&enemy, &EtherPool::new(10), &enabled));
    }
}
