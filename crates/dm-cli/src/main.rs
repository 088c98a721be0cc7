//! CLI frontend for the Dice Mice character builder.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Paths;

#[derive(Parser)]
#[command(
    name = "dm",
    about = "Dice Mice character builder and sheet calculator",
    version,
    propagate_version = true
)]
struct Cli {
    /// Reference catalog (JSON)
    #[arg(long, global = true, default_value = "catalog.json")]
    catalog: PathBuf,

    /// Directory holding house and character records
    #[arg(long, global = true, default_value = "store")]
    store: PathBuf,

    /// Rules config (default: rules.json next to the catalog, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log rules decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter catalog and rules config, and create the store
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Validate the catalog and its formulas
    Check,

    /// Roll ability scores or hit points
    #[command(subcommand)]
    Roll(RollCommand),

    /// List the classes a stat block qualifies for
    Classes {
        /// Six scores in order: STR,CON,DEX,INT,WIS,CHA
        #[arg(long, value_delimiter = ',', required = true)]
        stats: Vec<i32>,
    },

    /// Build and save a new character
    Create(commands::create::CreateArgs),

    /// Show a character sheet
    Sheet {
        /// Character id
        id: String,

        /// Print the sheet as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage player houses
    #[command(subcommand)]
    House(HouseCommand),

    /// Change a character's level
    Level {
        /// Character id
        id: String,

        /// New level
        level: u32,
    },

    /// Show or change a character's skill ranks
    Skill(commands::skill::SkillArgs),

    /// Show, roll or enter a character's hit points by level
    Hp(commands::hp::HpArgs),

    /// Rename a character or change its class, county or stats
    Edit(commands::edit::EditArgs),
}

#[derive(Subcommand)]
enum RollCommand {
    /// Roll all six ability scores (4d6 drop lowest for the county stat)
    Abilities {
        /// County whose associated stat gets the preferred roll
        #[arg(long)]
        county: Option<String>,

        /// RNG seed for repeatable rolls
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Roll hit points for one level
    Hp {
        /// Hit die, e.g. 1d8
        hit_die: String,

        /// Constitution modifier; results at or below it are rerolled
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        con_mod: i32,

        /// RNG seed for repeatable rolls
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum HouseCommand {
    /// Found a house for a player
    Create {
        /// Owning player id
        #[arg(long)]
        player: String,

        /// House name
        #[arg(long)]
        name: String,

        /// Home county id or name
        #[arg(long)]
        county: String,

        /// House motto
        #[arg(long, default_value = "")]
        motto: String,

        /// House history
        #[arg(long, default_value = "")]
        bio: String,
    },

    /// Change a house's name, motto, history or treasury
    Edit {
        /// Owning player id
        #[arg(long)]
        player: String,

        /// New house name
        #[arg(long)]
        name: Option<String>,

        /// New motto
        #[arg(long)]
        motto: Option<String>,

        /// New history
        #[arg(long)]
        bio: Option<String>,

        /// New treasury
        #[arg(long, allow_hyphen_values = true)]
        gold: Option<i64>,
    },

    /// Show a player's house and its characters
    Show {
        /// Owning player id
        #[arg(long)]
        player: String,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = Paths {
        catalog: cli.catalog,
        store: cli.store,
        config: cli.config,
    };

    match cli.command {
        Commands::Init { dir } => commands::init::run(&dir),
        Commands::Check => commands::check::run(&paths),
        Commands::Roll(RollCommand::Abilities { county, seed }) => {
            commands::roll::abilities(&paths, county.as_deref(), seed)
        }
        Commands::Roll(RollCommand::Hp {
            hit_die,
            con_mod,
            seed,
        }) => commands::roll::hp(&hit_die, con_mod, seed),
        Commands::Classes { stats } => commands::classes::run(&paths, &stats),
        Commands::Create(args) => commands::create::run(&paths, args),
        Commands::Sheet { id, json } => commands::sheet::run(&paths, &id, json),
        Commands::House(HouseCommand::Create {
            player,
            name,
            county,
            motto,
            bio,
        }) => commands::house::create(&paths, &player, &name, &county, &motto, &bio),
        Commands::House(HouseCommand::Edit {
            player,
            name,
            motto,
            bio,
            gold,
        }) => {
            let changes = commands::house::HouseEdit {
                name,
                motto,
                bio,
                gold,
            };
            commands::house::edit(&paths, &player, changes)
        }
        Commands::House(HouseCommand::Show { player }) => commands::house::show(&paths, &player),
        Commands::Level { id, level } => commands::level::run(&paths, &id, level),
        Commands::Skill(args) => commands::skill::run(&paths, args),
        Commands::Hp(args) => commands::hp::run(&paths, args),
        Commands::Edit(args) => commands::edit::run(&paths, args),
    }
}
