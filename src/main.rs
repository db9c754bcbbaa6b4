use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

mod config;

use config::{Command, Config};
use gridiron_bayes::model::rates::{LEAGUE_FG_PER_GAME_2014, LEAGUE_TD_PER_GAME_2014};
use gridiron_bayes::model::{decompositions, Matchup, ModelConfig, ScoreTypeRates, TeamModel};
use gridiron_bayes::observations::{GameSource, JsonGameSource};

fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    match &config.command {
        Command::Predict {
            home,
            away,
            remaining,
            home_score,
            away_score,
            credible,
        } => run_predict(
            &config,
            home,
            away,
            *remaining,
            (*home_score, *away_score),
            *credible,
        ),
        Command::Decompose { points } => run_decompose(&config, *points),
        Command::LeagueRates {
            remaining,
            points_scored,
            credible,
        } => run_league_rates(&config, *remaining, *points_scored, *credible),
    }
}

/// Model settings from `--model-config` when given, else `fallback`.
fn load_model_config(config: &Config, fallback: Option<&ModelConfig>) -> Result<ModelConfig> {
    let model: ModelConfig = match &config.model_config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read model config {path}"))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse model config {path}"))?
        }
        None => fallback.cloned().unwrap_or_default(),
    };
    model.validate().context("Invalid model config")?;
    Ok(model)
}

fn load_team(source: &dyn GameSource, name: &str, model: &ModelConfig) -> Result<TeamModel> {
    let games = source.fetch_games(name)?;
    if games.is_empty() {
        warn!("No games for {} in {}; using the prior", name, source.name());
    }
    let mut team = TeamModel::new(name, model)?;
    team.ingest_games(&games)
        .with_context(|| format!("Failed to update {name} from {}", source.name()))?;
    Ok(team)
}

fn run_predict(
    config: &Config,
    home: &str,
    away: &str,
    remaining: f64,
    (home_score, away_score): (u32, u32),
    credible: f64,
) -> Result<()> {
    let source = JsonGameSource::open(&config.league_file)?;
    let model = load_model_config(config, Some(source.model_config()))?;
    info!(
        "Predicting {} vs {} from {} with {:.1} minutes left",
        home,
        away,
        source.name(),
        remaining
    );

    let matchup = Matchup::new(
        load_team(&source, home, &model)?,
        load_team(&source, away, &model)?,
    );
    let summary = matchup
        .predict(remaining, home_score, away_score)?
        .summary(credible)?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    for side in [&summary.home, &summary.away] {
        println!(
            "{:<20} mean {:>5.1}   {:.0}% credible [{}, {}]",
            side.team, side.mean, side.credible, side.low, side.high
        );
    }
    println!(
        "P({} wins) = {:.3}   P({} wins) = {:.3}   P(tie) = {:.3}",
        summary.home.team, summary.home_win, summary.away.team, summary.away_win, summary.tie
    );
    Ok(())
}

fn run_decompose(config: &Config, points: u32) -> Result<()> {
    let found = decompositions(points);
    if found.is_empty() {
        anyhow::bail!("{points} cannot be made from touchdowns (7) and field goals (3)");
    }
    if config.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }
    for d in &found {
        println!("{:>3} TD + {:>3} FG", d.touchdowns, d.field_goals);
    }
    Ok(())
}

fn run_league_rates(config: &Config, remaining: f64, points_scored: u32, credible: f64) -> Result<()> {
    let model = load_model_config(config, None)?;
    let mut rates = ScoreTypeRates::new("league", &model)?;
    rates.seed_with_league(&LEAGUE_TD_PER_GAME_2014, &LEAGUE_FG_PER_GAME_2014)?;

    let points = rates.predict_remaining(remaining, points_scored)?;
    let mean = points.mean()?;
    let (low, high) = points.credible_interval(credible)?;

    if config.json {
        let out = serde_json::json!({
            "mean": mean,
            "credible": credible,
            "low": low,
            "high": high,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    println!(
        "league average: mean {:.1}   {:.0}% credible [{}, {}]",
        mean, credible, low, high
    );
    Ok(())
}
