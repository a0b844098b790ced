use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use team_medals::config::{AppSettings, ProfileConfig};
use team_medals::features::{
    read_player_gameweeks, team_attributes, Bootstrap, GameweekPicks, TeamEntry, TeamHistory,
    TeamPayloads,
};
use team_medals::models::{AttributeRecord, LeagueEntry};
use team_medals::profiling::build_lookup_tables;
use team_medals::rules::MedalSettings;
use team_medals::scoring::{score_league, MedalEngine};
use team_medals::tables::{LookupTables, TrainingMeta};
use team_medals::{db, report, sample, telemetry};

#[derive(Parser)]
#[command(name = "team-medals")]
#[command(about = "Percentile-based medals for fantasy football teams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Draw the team ids that make up a training sample
    SampleIds {
        /// Number of teams in the whole game
        #[arg(long)]
        total: u64,
        #[arg(long, default_value = "conf/profile.yaml")]
        profile: PathBuf,
        /// Override the sample size from the profile
        #[arg(long)]
        size: Option<usize>,
        /// Override the seed from the profile
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Build lookup tables from a sample population
    Train {
        #[arg(long)]
        sample: PathBuf,
        #[arg(long, default_value = "conf/profile.yaml")]
        profile: PathBuf,
        #[arg(long, default_value = "tables")]
        out: PathBuf,
        /// Also record the run in Postgres
        #[arg(long)]
        store_db: bool,
    },
    /// Derive one team's attributes from game payloads
    Features {
        /// Manager entry JSON
        #[arg(long)]
        entry: PathBuf,
        /// Entry history JSON with current, past and chips
        #[arg(long)]
        history: PathBuf,
        /// Bootstrap JSON listing the clubs
        #[arg(long)]
        bootstrap: PathBuf,
        /// JSON array of per-gameweek picks
        #[arg(long)]
        picks: PathBuf,
        /// Merged per-gameweek player returns CSV
        #[arg(long)]
        players: PathBuf,
        /// Latest finished gameweek; omit before the season starts
        #[arg(long)]
        gameweek: Option<u32>,
        #[arg(long, default_value = "conf/medals.yaml")]
        medals: PathBuf,
        /// Write the attribute record here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score one team
    Score {
        /// JSON object of team attributes
        #[arg(long)]
        team: PathBuf,
        #[arg(long, default_value = "Your team")]
        name: String,
        #[command(flatten)]
        scoring: ScoringArgs,
    },
    /// Score every team in a league
    League {
        /// JSON array of {manager, team, attributes}
        #[arg(long)]
        teams: PathBuf,
        #[command(flatten)]
        scoring: ScoringArgs,
    },
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .args(["tables", "from_db"])
        .multiple(false)
))]
struct ScoringArgs {
    /// Directory holding trained lookup tables
    #[arg(long, default_value = "tables")]
    tables: PathBuf,
    /// Read the latest training run from Postgres instead
    #[arg(long)]
    from_db: bool,
    #[arg(long, default_value = "conf/medals.yaml")]
    medals: PathBuf,
    /// Profile whose null imputation is applied before scoring
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Write a markdown report here
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print awards as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = AppSettings::from_env();
    telemetry::init(&settings.telemetry)?;

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&settings).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::SampleIds {
            total,
            profile,
            size,
            seed,
        } => {
            let config = ProfileConfig::from_path(&profile)?;
            let size = size.unwrap_or(config.training_sample_size);
            let seed = seed.unwrap_or(config.random_seed);
            let ids = sample::draw_sample_ids(total, size, seed)?;
            info!(total, size, seed, "sample ids drawn");
            for id in ids {
                println!("{id}");
            }
        }
        Commands::Train {
            sample,
            profile,
            out,
            store_db,
        } => {
            let config = ProfileConfig::from_path(&profile)?;
            let population = sample::read_population_file(&sample)
                .with_context(|| format!("failed to load sample {}", sample.display()))?;
            if population.len() != config.training_sample_size {
                warn!(
                    expected = config.training_sample_size,
                    actual = population.len(),
                    "sample size differs from profile"
                );
            }

            let outcome = build_lookup_tables(&population, &config);
            let meta = TrainingMeta::new(population.len(), Some(config.random_seed), &outcome.tables);

            std::fs::create_dir_all(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            outcome.tables.write_dir(&out)?;
            meta.write(&out)?;

            if store_db {
                let pool = connect(&settings).await?;
                db::store_lookup_tables(&pool, &meta, &outcome.tables).await?;
            }

            println!(
                "Trained run {} on {} teams: {} numeric rows, {} categorical rows.",
                meta.training_run_id,
                meta.sample_size,
                meta.numeric_rows,
                meta.categorical_rows
            );
            if !outcome.failures.is_empty() {
                println!("{} attributes could not be profiled:", outcome.failures.len());
                for failure in &outcome.failures {
                    println!("- {failure}");
                }
            }
            println!("Tables written to {}.", out.display());
        }
        Commands::Features {
            entry,
            history,
            bootstrap,
            picks,
            players,
            gameweek,
            medals,
            out,
        } => {
            let entry: TeamEntry = read_json(&entry)?;
            let history: TeamHistory = read_json(&history)?;
            let bootstrap: Bootstrap = read_json(&bootstrap)?;
            let picks: Vec<GameweekPicks> = read_json(&picks)?;
            let players = std::fs::File::open(&players)
                .with_context(|| format!("failed to open {}", players.display()))?;
            let players = read_player_gameweeks(players)?;
            let medal_settings = load_medals(&medals)?;

            let payloads = TeamPayloads {
                entry: &entry,
                history: &history,
                clubs: &bootstrap.teams,
                picks: &picks,
                players: &players,
                current_gameweek: gameweek,
            };
            let record = team_attributes(&payloads, &medal_settings.rival_teams)
                .with_context(|| format!("failed to derive attributes for team {}", entry.id))?;
            info!(team = entry.id, gameweek = ?gameweek, "attributes derived");

            let body = serde_json::to_string_pretty(&record)?;
            match out {
                Some(out) => {
                    std::fs::write(&out, body)?;
                    println!("Attributes written to {}.", out.display());
                }
                None => println!("{body}"),
            }
        }
        Commands::Score {
            team,
            name,
            scoring,
        } => {
            let record: AttributeRecord = read_json(&team)?;
            let (meta, tables) = load_tables(&scoring, &settings).await?;
            let medal_settings = load_medals(&scoring.medals)?;
            let profile = scoring.profile.as_deref().map(ProfileConfig::from_path).transpose()?;

            let mut engine = MedalEngine::new(&tables, &medal_settings);
            if let Some(profile) = &profile {
                engine = engine.with_imputation(&profile.impute_nulls);
            }
            let medals = engine.award(&record);

            if scoring.json {
                println!("{}", serde_json::to_string_pretty(&medals)?);
            } else {
                for award in &medals {
                    println!("- {} ({}): {}", award.medal_name, award.medal, award.overview);
                }
            }
            if let Some(out) = &scoring.out {
                std::fs::write(out, report::build_team_report(&name, meta.as_ref(), &medals))?;
                println!("Report written to {}.", out.display());
            }
        }
        Commands::League { teams, scoring } => {
            let entries: Vec<LeagueEntry> = read_json(&teams)?;
            let (meta, tables) = load_tables(&scoring, &settings).await?;
            let medal_settings = load_medals(&scoring.medals)?;
            let profile = scoring.profile.as_deref().map(ProfileConfig::from_path).transpose()?;

            let mut engine = MedalEngine::new(&tables, &medal_settings);
            if let Some(profile) = &profile {
                engine = engine.with_imputation(&profile.impute_nulls);
            }
            let rows = score_league(&engine, &entries);

            if scoring.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in &rows {
                    println!("- {} ({}) {}: {}", row.manager, row.team, row.medal, row.medal_name);
                }
            }
            if let Some(out) = &scoring.out {
                std::fs::write(out, report::build_league_report(meta.as_ref(), &rows))?;
                println!("Report written to {}.", out.display());
            }
        }
    }

    Ok(())
}

async fn connect(settings: &AppSettings) -> anyhow::Result<PgPool> {
    let database_url = settings.require_database_url()?;
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn load_tables(
    scoring: &ScoringArgs,
    settings: &AppSettings,
) -> anyhow::Result<(Option<TrainingMeta>, LookupTables)> {
    if scoring.from_db {
        let pool = connect(settings).await?;
        let (meta, tables) = db::fetch_latest_lookup_tables(&pool)
            .await?
            .context("no training run stored; run `train --store-db` first")?;
        return Ok((Some(meta), tables));
    }

    let tables = LookupTables::read_dir(&scoring.tables)
        .with_context(|| format!("failed to load tables from {}", scoring.tables.display()))?;
    let meta = match TrainingMeta::read(&scoring.tables) {
        Ok(meta) => Some(meta),
        Err(error) => {
            warn!(error = %error, "training metadata unavailable");
            None
        }
    };
    Ok((meta, tables))
}

fn load_medals(path: &Path) -> anyhow::Result<MedalSettings> {
    let settings = MedalSettings::from_path(path)
        .with_context(|| format!("failed to load medals from {}", path.display()))?;
    if !settings.rejected.is_empty() {
        warn!(rejected = ?settings.rejected, "some medal rules were skipped");
    }
    Ok(settings)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&body).with_context(|| format!("invalid JSON in {}", path.display()))
}
