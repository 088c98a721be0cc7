use clap::Args;
use colored::Colorize;
use dm_core::repo;
use dm_mechanics::eligibility::unmet_prerequisites;
use dm_mechanics::{CharacterDraft, MechError};
use miette::{IntoDiagnostic, MietteDiagnostic, Report, bail, miette};
use tracing::debug;

use super::{Paths, resolve_class, resolve_county, resolve_rank, resolve_skill, rng, stat_block};

#[derive(Args)]
pub struct CreateArgs {
    /// Player whose house the character joins
    #[arg(long)]
    player: String,

    /// County id or name
    #[arg(long)]
    county: String,

    /// Class id or name
    #[arg(long)]
    class: String,

    /// Starting level
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Character name (default: "Unnamed Mouse")
    #[arg(long, default_value = "")]
    name: String,

    /// Defining trait
    #[arg(long = "trait", default_value = "")]
    trait_: String,

    /// Backstory
    #[arg(long, default_value = "")]
    bio: String,

    /// Six scores STR,CON,DEX,INT,WIS,CHA instead of rolling
    #[arg(long, value_delimiter = ',')]
    stats: Option<Vec<i32>>,

    /// Skill rank as skill=rank; repeatable
    #[arg(long = "skill")]
    skills: Vec<String>,

    /// RNG seed for repeatable rolls
    #[arg(long)]
    seed: Option<u64>,
}

pub fn run(paths: &Paths, args: CreateArgs) -> miette::Result<()> {
    let catalog = paths.catalog()?;
    let config = paths.config()?;
    let mut store = paths.store()?;

    let Some(house) = repo::house_by_player(&store, &args.player).into_diagnostic()? else {
        let diagnostic = MietteDiagnostic::new("No House Found. Please Create a House First")
            .with_help("create one with `dm house create`");
        return Err(Report::new(diagnostic));
    };

    let mut rng = rng(args.seed);
    let mut draft = CharacterDraft::new(&catalog, &config);
    draft.set_name(args.name);
    draft.set_trait(args.trait_);
    draft.set_bio(args.bio);

    let county = resolve_county(&catalog, &args.county)?;
    draft.select_county(&county.id).into_diagnostic()?;
    match &args.stats {
        Some(scores) => draft.set_stats(stat_block(scores)?),
        None => draft.roll_all(&mut rng),
    }
    debug!(stats = ?draft.stats(), "stats set");

    let class = resolve_class(&catalog, &args.class)?;
    match draft.select_class(&class.id) {
        Err(MechError::IneligibleClass(_)) => {
            let unmet: Vec<String> = unmet_prerequisites(draft.stats(), class)
                .into_iter()
                .map(|p| format!("{} {}", catalog.stat_abbreviation(&p.stat), p.min))
                .collect();
            let diagnostic = MietteDiagnostic::new(format!("stats do not qualify for {}", class.name))
                .with_help(format!("requires {}", unmet.join(", ")));
            return Err(Report::new(diagnostic));
        }
        other => other.into_diagnostic()?,
    }
    draft.select_level(args.level).into_diagnostic()?;
    draft.edit_hp(|hp| hp.roll_missing(&mut rng)).into_diagnostic()?;

    let mut skills = draft.skill_editor().into_diagnostic()?;
    skills.grant_class_competency();
    for entry in &args.skills {
        let (skill, rank) = entry
            .split_once('=')
            .ok_or_else(|| miette!("expected skill=rank, got '{entry}'"))?;
        let skill = resolve_skill(&catalog, skill.trim())?;
        let rank = resolve_rank(&catalog, rank.trim())?;
        if !skills.select(&skill.id, &rank.id) {
            bail!(
                "cannot take {} at {} ({} of {} points left)",
                skill.name,
                rank.name,
                skills.available_points(),
                skills.ranks_available()
            );
        }
    }
    draft.apply_skills(skills);

    let character = draft
        .finalize(&house.id)
        .map_err(|errors| miette!("{}", errors.join("; ")))?;
    let character = repo::create_character(&mut store, &character).into_diagnostic()?;

    println!(
        "Created {} ({}) in {}",
        character.name.bold(),
        character.id,
        house.name
    );
    println!(
        "  {}",
        format!(
            "Level {} {} from {}, {} HP",
            character.level,
            catalog.class_name(&character.class_id),
            catalog.county_name(&character.county_id),
            character.total_hp()
        )
        .dimmed()
    );
    Ok(())
}
