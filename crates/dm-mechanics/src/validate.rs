//! Load-time validation of a reference catalog.
//!
//! Missing lookups are tolerated at play time (they fall back to
//! placeholders), so a catalog with dangling references still works. This
//! pass finds them up front. Problems that would make a computation fail,
//! such as an unparseable formula or hit die, are errors; the rest are
//! warnings.

use dm_core::derived::BASE_VARIABLE;
use dm_core::{Catalog, DerivedStatKind, StatKey};

use crate::config::RulesConfig;
use crate::derived::variable_stat;
use crate::dice::HitDie;
use crate::formula::{Formula, FormulaError};
use crate::skills::skill_ranks_available;

/// A warning or error found in the catalog.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// The catalog entry where the issue was found.
    pub entity: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            message: message.into(),
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.entity, self.message)
    }
}

/// A formula with errors, kept with its source for rendering.
#[derive(Debug, Clone)]
pub struct FormulaProblem {
    /// Derived stat (and override) the formula belongs to.
    pub entity: String,
    /// Formula text.
    pub source: String,
    /// Every error found.
    pub errors: Vec<FormulaError>,
}

/// Every formula in the catalog with its variable list, labelled by owner.
fn formulas(catalog: &Catalog) -> Vec<(String, &str, &[String])> {
    let mut out = Vec::new();
    for stat in &catalog.derived_stats {
        if stat.kind == DerivedStatKind::Defense || !stat.formula.trim().is_empty() {
            out.push((stat.id.clone(), stat.formula.as_str(), stat.variables.as_slice()));
        }
        for o in stat.overrides() {
            let entity = format!("{} (override for {} / {})", stat.id, o.class_id, o.ability_name);
            let formula = o.new_formula.as_deref().unwrap_or(&stat.formula);
            let variables = o.new_variables.as_deref().unwrap_or(&stat.variables);
            out.push((entity, formula, variables));
        }
    }
    out
}

/// Formulas that fail to parse or use a variable missing from their
/// variable list.
pub fn formula_problems(catalog: &Catalog) -> Vec<FormulaProblem> {
    let mut problems = Vec::new();
    for (entity, source, variables) in formulas(catalog) {
        let errors = match Formula::parse_all(source) {
            Err(errors) => errors,
            Ok(formula) => {
                let mut errors = Vec::new();
                formula.expr().for_each_var(&mut |name, span| {
                    if !variables.iter().any(|v| v == name) {
                        errors.push(FormulaError::UndefinedVariable {
                            name: name.to_string(),
                            span: span.clone(),
                        });
                    }
                });
                errors
            }
        };
        if !errors.is_empty() {
            problems.push(FormulaProblem {
                entity,
                source: source.to_string(),
                errors,
            });
        }
    }
    problems
}

/// Validate a catalog against the rules config.
pub fn validate_catalog(catalog: &Catalog, config: &RulesConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    validate_stats(catalog, &mut issues);
    validate_derived_stats(catalog, &mut issues);
    validate_classes(catalog, config, &mut issues);
    validate_references(catalog, config, &mut issues);
    issues
}

fn validate_stats(catalog: &Catalog, issues: &mut Vec<ValidationIssue>) {
    for key in StatKey::ALL {
        if catalog.stat(key.id()).is_none() {
            issues.push(ValidationIssue::warning(
                format!("stat {key}"),
                "missing from the catalog; it will have no abbreviation",
            ));
        }
    }
    for stat in &catalog.stats {
        if stat.key().is_none() {
            issues.push(ValidationIssue::warning(
                format!("stat {}", stat.id),
                "is not one of the six base stats and can never have a score",
            ));
        }
    }
    if catalog.initiative_chart.is_empty() {
        issues.push(ValidationIssue::warning(
            "initiative chart",
            "has no rows; every initiative will read \"Unknown\"",
        ));
    }
}

fn validate_derived_stats(catalog: &Catalog, issues: &mut Vec<ValidationIssue>) {
    for problem in formula_problems(catalog) {
        for error in &problem.errors {
            issues.push(ValidationIssue::error(
                format!("derived stat {}", problem.entity),
                format!("formula {:?}: {error}", problem.source),
            ));
        }
    }

    for (entity, _, variables) in formulas(catalog) {
        for variable in variables {
            if variable != BASE_VARIABLE && variable_stat(catalog, variable).is_none() {
                issues.push(ValidationIssue::error(
                    format!("derived stat {entity}"),
                    format!("variable '{variable}' is neither 'base' nor '<stat abbreviation>_mod'"),
                ));
            }
        }
    }

    for stat in &catalog.derived_stats {
        for class_id in stat.applicable_class_ids.iter().flatten() {
            if catalog.class(class_id).is_none() {
                issues.push(ValidationIssue::warning(
                    format!("derived stat {}", stat.id),
                    format!("applies to unknown class '{class_id}'"),
                ));
            }
        }
        for o in stat.overrides() {
            match catalog.class(&o.class_id) {
                None => issues.push(ValidationIssue::warning(
                    format!("derived stat {}", stat.id),
                    format!("override for unknown class '{}'", o.class_id),
                )),
                Some(class) if !class.has_ability(&o.ability_name) => {
                    issues.push(ValidationIssue::warning(
                        format!("derived stat {}", stat.id),
                        format!(
                            "override requires ability '{}' which class '{}' does not have",
                            o.ability_name, o.class_id
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
    }
}

fn validate_classes(catalog: &Catalog, config: &RulesConfig, issues: &mut Vec<ValidationIssue>) {
    for class in &catalog.classes {
        let entity = format!("class {}", class.id);
        let exempt = config.traits(&class.id).disables_derived_stats;

        if let Err(e) = class.hit_die.parse::<HitDie>() {
            // Exempt classes never roll hit points.
            if exempt {
                issues.push(ValidationIssue::warning(&entity, e.to_string()));
            } else {
                issues.push(ValidationIssue::error(&entity, e.to_string()));
            }
        }

        for level in 1..=config.max_creation_level {
            if class.level_values(level).is_none() {
                issues.push(ValidationIssue::error(
                    &entity,
                    format!("no base values for level {level}"),
                ));
            } else if skill_ranks_available(class, level) == 0 && !exempt {
                issues.push(ValidationIssue::warning(
                    &entity,
                    format!("no skill ranks at level {level}"),
                ));
            }
        }

        for prereq in &class.prerequisites {
            if StatKey::from_id(&prereq.stat).is_none() {
                issues.push(ValidationIssue::error(
                    &entity,
                    format!("prerequisite on unknown stat '{}' can never be met", prereq.stat),
                ));
            }
        }

        for skill_id in &class.skill_ids {
            if catalog.skill(skill_id).is_none() {
                issues.push(ValidationIssue::warning(
                    &entity,
                    format!("class skill '{skill_id}' does not exist"),
                ));
            }
        }
    }
}

fn validate_references(catalog: &Catalog, config: &RulesConfig, issues: &mut Vec<ValidationIssue>) {
    for county in &catalog.counties {
        if county.associated_stat().is_none() || catalog.stat(&county.associated_stat_id).is_none() {
            issues.push(ValidationIssue::error(
                format!("county {}", county.id),
                format!("associated stat '{}' does not exist", county.associated_stat_id),
            ));
        }
    }

    for skill in &catalog.skills {
        if StatKey::from_id(&skill.associated_stat_id).is_none() {
            issues.push(ValidationIssue::error(
                format!("skill {}", skill.id),
                format!("associated stat '{}' does not exist", skill.associated_stat_id),
            ));
        }
    }

    for rank_id in [&config.skilled_rank_id, &config.untrained_rank_id] {
        if catalog.skill_level(rank_id).is_none() {
            issues.push(ValidationIssue::error(
                format!("skill level {rank_id}"),
                "required by the rules config but missing from the catalog",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn errors(issues: &[ValidationIssue]) -> Vec<String> {
        issues.iter().filter(|i| i.is_error).map(ToString::to_string).collect()
    }

    #[test]
    fn fixture_catalog_is_clean() {
        let issues = validate_catalog(&testing::catalog(), &RulesConfig::default());
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn bad_formulas_and_variables() {
        let mut catalog = testing::catalog();
        catalog.derived_stats[0].formula = "base + luck_mod".into();
        catalog.derived_stats[0].variables = vec!["base".into(), "luck_mod".into()];
        let issues = validate_catalog(&catalog, &RulesConfig::default());
        let errors = errors(&issues);
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].contains("luck_mod"));

        catalog.derived_stats[0].formula = "base + (".into();
        let problems = formula_problems(&catalog);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].entity, "defense");
        assert!(matches!(problems[0].errors[0], FormulaError::Syntax { .. }));
    }

    #[test]
    fn unlisted_formula_variable_reported_with_span() {
        let mut catalog = testing::catalog();
        catalog.derived_stats[0].formula = "base + str_mod".into();
        let problems = formula_problems(&catalog);
        assert_eq!(
            problems[0].errors,
            vec![FormulaError::UndefinedVariable {
                name: "str_mod".into(),
                span: 7..14,
            }]
        );
    }

    #[test]
    fn class_problems() {
        let mut catalog = testing::catalog();
        let warrior = &mut catalog.classes[0];
        warrior.hit_die = "d10".into();
        warrior.base_values.remove(&7);
        warrior.skill_ids.push("juggling".into());
        warrior.prerequisites[0].stat = "luck".into();
        catalog.classes[2].hit_die = String::new();

        let issues = validate_catalog(&catalog, &RulesConfig::default());
        let errors = errors(&issues);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("invalid hit die")));
        assert!(errors.iter().any(|e| e.contains("level 7")));
        assert!(errors.iter().any(|e| e.contains("luck")));
        assert!(issues.iter().any(|i| !i.is_error && i.message.contains("juggling")));
        assert!(issues.iter().any(|i| !i.is_error && i.entity == "class retainer"));
    }

    #[test]
    fn missing_ranks_and_stats() {
        let mut catalog = testing::catalog();
        catalog.skill_levels.retain(|l| l.id != "skilled");
        catalog.counties[0].associated_stat_id = "luck".into();
        catalog.skills[0].associated_stat_id = "agility".into();
        let errors = errors(&validate_catalog(&catalog, &RulesConfig::default()));
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn display_matches_severity() {
        let issue = ValidationIssue::warning("class bard", "no skill ranks at level 2");
        assert_eq!(issue.to_string(), "warning: class bard: no skill ranks at level 2");
    }
}
