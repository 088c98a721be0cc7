//! Hit points by level.

use dm_core::{Catalog, Character, HpProgression};
use rand::Rng;
use tracing::debug;

use crate::config::RulesConfig;
use crate::dice::HitDie;
use crate::error::{MechError, MechResult};
use crate::modifier::modifier;

/// Hit-die label shown for classes exempt from derived stats.
pub const EXEMPT_HIT_DIE: &str = "N/A";

/// Roll hit points for one level.
///
/// The roll must beat the constitution modifier (a negative modifier
/// counts as 0). If the modifier already reaches the die's highest face,
/// that face is returned without rolling.
pub fn roll_level_hp<R: Rng>(hit_die: &str, con_modifier: i32, rng: &mut R) -> MechResult<u32> {
    let die: HitDie = hit_die.parse()?;
    let hp = die.roll_above(con_modifier, rng);
    debug!(%die, con_modifier, hp, "rolled level hit points");
    Ok(hp)
}

/// Editing state for a character's hit-point progression.
///
/// Only levels up to the character's current level can be set or rolled,
/// and nothing can be edited for classes exempt from derived stats.
#[derive(Debug, Clone)]
pub struct HpProgressionEditor {
    progression: HpProgression,
    level: u32,
    class_id: String,
    hit_die: Option<String>,
    con_modifier: i32,
    locked: bool,
}

impl HpProgressionEditor {
    /// Start editing from explicit parts. `hit_die` is `None` when the class
    /// is unknown.
    pub fn new(
        progression: HpProgression,
        level: u32,
        class_id: impl Into<String>,
        hit_die: Option<String>,
        con_score: i32,
        locked: bool,
    ) -> Self {
        Self {
            progression,
            level,
            class_id: class_id.into(),
            hit_die,
            con_modifier: modifier(con_score),
            locked,
        }
    }

    /// Start editing a stored character.
    pub fn for_character(character: &Character, catalog: &Catalog, config: &RulesConfig) -> Self {
        Self::new(
            character.hp_progression.clone(),
            character.level,
            character.class_id.clone(),
            catalog.class(&character.class_id).map(|c| c.hit_die.clone()),
            character.current_base_stats.constitution,
            config.traits(&character.class_id).disables_derived_stats,
        )
    }

    /// Returns true if hit points for `level` may be changed.
    pub fn is_editable(&self, level: u32) -> bool {
        !self.locked && (1..=self.level).contains(&level)
    }

    fn check_editable(&self, level: u32) -> MechResult<()> {
        if self.is_editable(level) {
            Ok(())
        } else {
            Err(MechError::LevelLocked {
                level,
                current: self.level,
            })
        }
    }

    /// Enter hit points by hand. Negative input is stored as 0.
    pub fn set(&mut self, level: u32, hp: i64) -> MechResult<()> {
        self.check_editable(level)?;
        let hp = u32::try_from(hp.max(0)).unwrap_or(u32::MAX);
        self.progression.set(level, hp);
        Ok(())
    }

    /// Roll hit points for a level and store the result.
    pub fn roll<R: Rng>(&mut self, level: u32, rng: &mut R) -> MechResult<u32> {
        self.check_editable(level)?;
        let hit_die = self
            .hit_die
            .as_deref()
            .ok_or_else(|| MechError::UnknownClass(self.class_id.clone()))?;
        let hp = roll_level_hp(hit_die, self.con_modifier, rng)?;
        self.progression.set(level, hp);
        Ok(hp)
    }

    /// Roll every editable level that is still 0.
    pub fn roll_missing<R: Rng>(&mut self, rng: &mut R) -> MechResult<()> {
        for level in 1..=self.level {
            if self.is_editable(level) && self.progression.get(level) == 0 {
                self.roll(level, rng)?;
            }
        }
        Ok(())
    }

    /// The hit die shown to the player.
    pub fn hit_die_label(&self) -> String {
        if self.locked {
            EXEMPT_HIT_DIE.to_string()
        } else {
            self.hit_die.clone().unwrap_or_else(|| "__".to_string())
        }
    }

    /// Hit points for a level.
    pub fn get(&self, level: u32) -> u32 {
        self.progression.get(level)
    }

    /// Total hit points across every level.
    pub fn total(&self) -> u32 {
        self.progression.total()
    }

    /// The edited progression.
    pub fn progression(&self) -> &HpProgression {
        &self.progression
    }

    /// Finish editing.
    pub fn into_progression(self) -> HpProgression {
        self.progression
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::RngCore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// An RNG that fails the test if it is ever consulted.
    struct NoRolls;

    impl RngCore for NoRolls {
        fn next_u32(&mut self) -> u32 {
            panic!("die was rolled")
        }
        fn next_u64(&mut self) -> u64 {
            panic!("die was rolled")
        }
        fn fill_bytes(&mut self, _dst: &mut [u8]) {
            panic!("die was rolled")
        }
    }

    #[test]
    fn capped_roll_uses_no_dice() {
        assert_eq!(roll_level_hp("1d4", 4, &mut NoRolls).unwrap(), 4);
        assert_eq!(roll_level_hp("1d4", 6, &mut NoRolls).unwrap(), 4);
    }

    #[test]
    fn malformed_hit_die_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            roll_level_hp("d8", 0, &mut rng),
            Err(MechError::InvalidHitDie(_))
        ));
    }

    proptest! {
        #[test]
        fn roll_beats_modifier(seed in any::<u64>(), con in -4i32..6) {
            let hp = roll_level_hp("1d6", con, &mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert!((1..=6).contains(&hp));
            prop_assert!(hp as i32 > con.max(0) || hp == 6);
        }
    }

    fn editor(level: u32, locked: bool) -> HpProgressionEditor {
        HpProgressionEditor::new(HpProgression::default(), level, "warrior", Some("1d8".into()), 12, locked)
    }

    #[test]
    fn levels_above_current_are_locked() {
        let mut hp = editor(2, false);
        assert!(hp.is_editable(1));
        assert!(hp.is_editable(2));
        assert!(!hp.is_editable(3));
        assert!(!hp.is_editable(0));
        hp.set(2, 5).unwrap();
        assert!(matches!(
            hp.set(3, 5),
            Err(MechError::LevelLocked { level: 3, current: 2 })
        ));
        assert_eq!(hp.get(2), 5);
    }

    #[test]
    fn manual_entry_clamps_to_zero() {
        let mut hp = editor(1, false);
        hp.set(1, -3).unwrap();
        assert_eq!(hp.get(1), 0);
    }

    #[test]
    fn huge_manual_entry_saturates_total() {
        let mut hp = editor(2, false);
        hp.set(1, i64::MAX).unwrap();
        hp.set(2, 5).unwrap();
        assert_eq!(hp.get(1), u32::MAX);
        assert_eq!(hp.total(), u32::MAX);
    }

    #[test]
    fn exempt_class_is_fully_locked() {
        let mut hp = editor(5, true);
        assert!(!hp.is_editable(1));
        assert!(hp.roll(1, &mut NoRolls).is_err());
        assert_eq!(hp.hit_die_label(), EXEMPT_HIT_DIE);
    }

    #[test]
    fn roll_missing_fills_reachable_levels() {
        let mut hp = editor(3, false);
        hp.set(2, 7).unwrap();
        hp.roll_missing(&mut StdRng::seed_from_u64(3)).unwrap();
        assert!(hp.get(1) > 1);
        assert_eq!(hp.get(2), 7);
        assert!(hp.get(3) > 1);
        assert_eq!(hp.get(4), 0);
        assert_eq!(hp.total(), hp.get(1) + 7 + hp.get(3));
    }

    #[test]
    fn unknown_class_cannot_roll() {
        let mut hp = HpProgressionEditor::new(HpProgression::default(), 1, "ghost", None, 10, false);
        assert!(matches!(
            hp.roll(1, &mut StdRng::seed_from_u64(0)),
            Err(MechError::UnknownClass(_))
        ));
        assert_eq!(hp.hit_die_label(), "__");
    }
}
