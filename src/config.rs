use clap::{Parser, Subcommand};

/// Bayesian final-score predictions from historical scoring events
#[derive(Parser, Debug, Clone)]
#[command(name = "gridiron-bayes", version, about)]
pub struct Config {
    /// League JSON file with per-team box scores
    #[arg(long, env = "LEAGUE_FILE", default_value = "league.json")]
    pub league_file: String,

    /// Model settings JSON (hypothesis grids, event cutoff); overrides the league file's `model` section
    #[arg(long, env = "MODEL_CONFIG")]
    pub model_config: Option<String>,

    /// Print results as JSON instead of text
    #[arg(long, env = "JSON_OUTPUT", default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Predict both teams' final points for the rest of a game
    Predict {
        /// Home team name as it appears in the league file
        #[arg(long)]
        home: String,

        /// Away team name as it appears in the league file
        #[arg(long)]
        away: String,

        /// Minutes left in regulation
        #[arg(long, default_value = "60.0")]
        remaining: f64,

        #[arg(long, default_value = "0")]
        home_score: u32,

        #[arg(long, default_value = "0")]
        away_score: u32,

        /// Credible interval width in percent
        #[arg(long, default_value = "80.0")]
        credible: f64,
    },

    /// List the touchdown / field-goal combinations that make a point total
    Decompose { points: u32 },

    /// Predict points from league-average touchdown and field-goal rates
    LeagueRates {
        /// Minutes left in regulation
        #[arg(long, default_value = "60.0")]
        remaining: f64,

        #[arg(long, default_value = "0")]
        points_scored: u32,

        /// Credible interval width in percent
        #[arg(long, default_value = "80.0")]
        credible: f64,
    },
}

/// Largest total `decompose` will list every combination for.
pub const MAX_DECOMPOSE_POINTS: u32 = 1000;

fn check_clock(remaining: f64, credible: f64) -> anyhow::Result<()> {
    if !(0.0..=60.0).contains(&remaining) {
        anyhow::bail!("remaining must be between 0 and 60 minutes");
    }
    if !(0.0..=100.0).contains(&credible) {
        anyhow::bail!("credible must be a percentage between 0 and 100");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        match &self.command {
            Command::Predict {
                home,
                away,
                remaining,
                credible,
                ..
            } => {
                if home == away {
                    anyhow::bail!("home and away must be different teams");
                }
                check_clock(*remaining, *credible)
            }
            Command::LeagueRates {
                remaining,
                credible,
                ..
            } => check_clock(*remaining, *credible),
            Command::Decompose { points } => {
                if *points > MAX_DECOMPOSE_POINTS {
                    anyhow::bail!("points must be at most {}", MAX_DECOMPOSE_POINTS);
                }
                Ok(())
            }
        }
    }
}
