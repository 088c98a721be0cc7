//! Class eligibility from ability-score prerequisites.
//!
//! The resolver only reports; clearing a selection that stopped being
//! eligible is the caller's job (see [`crate::draft::CharacterDraft`]).

use dm_core::{BaseStatBlock, Class, Prerequisite};

/// Returns true if the stats meet every prerequisite of the class.
pub fn meets_prerequisites(stats: &BaseStatBlock, class: &Class) -> bool {
    class.prerequisites.iter().all(|p| p.is_met_by(stats))
}

/// The prerequisites of a class the stats do not meet.
pub fn unmet_prerequisites<'a>(stats: &BaseStatBlock, class: &'a Class) -> Vec<&'a Prerequisite> {
    class
        .prerequisites
        .iter()
        .filter(|p| !p.is_met_by(stats))
        .collect()
}

/// Every class whose prerequisites the stats meet, in catalog order.
pub fn eligible_classes<'a>(stats: &BaseStatBlock, classes: &'a [Class]) -> Vec<&'a Class> {
    classes
        .iter()
        .filter(|class| meets_prerequisites(stats, class))
        .collect()
}

/// Returns true if `class_id` is among the eligible classes.
pub fn is_eligible(stats: &BaseStatBlock, classes: &[Class], class_id: &str) -> bool {
    classes
        .iter()
        .any(|class| class.id == class_id && meets_prerequisites(stats, class))
}
