//! Cricket CLI
//!
//! Runs a single match, a player auction or a whole tournament from a league
//! file (or a generated demo league) and prints the outcome.

mod league;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use cricket_core::auction::{AuctionEvent, AuctionSession};
use cricket_core::engine::{MatchEngine, MatchEvent};
use cricket_core::tournament::{Tournament, TournamentEvent, TournamentFormat};

use league::League;

#[derive(Parser, Debug)]
#[command(name = "cricket")]
#[command(about = "Simulate cricket matches, auctions and tournaments", long_about = None)]
struct Cli {
    /// League file (JSON). A demo league is generated when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the simulation and the demo league
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one match between two league teams
    Match {
        /// Team batting first (defaults to the first team)
        #[arg(long)]
        home: Option<String>,

        /// Opponent (defaults to the second team)
        #[arg(long)]
        away: Option<String>,

        /// Print every delivery
        #[arg(long)]
        ball_by_ball: bool,
    },

    /// Auction the league's player pool among its teams
    Auction,

    /// Run the league's tournament to a champion
    Tournament {
        /// Override the configured format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    RoundRobin,
    Groups,
    Knockout,
    Hybrid,
}

impl From<FormatArg> for TournamentFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::RoundRobin => TournamentFormat::RoundRobin,
            FormatArg::Groups => TournamentFormat::GroupStage,
            FormatArg::Knockout => TournamentFormat::Knockout,
            FormatArg::Hybrid => TournamentFormat::Hybrid,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let league = match &cli.config {
        Some(path) => League::load(path)?,
        None => {
            info!(seed = cli.seed, "generating demo league");
            League::demo(cli.seed)
        }
    };

    match cli.command {
        Commands::Match {
            home,
            away,
            ball_by_ball,
        } => run_match(league, home, away, ball_by_ball, cli.seed),
        Commands::Auction => run_auction(league, cli.seed),
        Commands::Tournament { format } => run_tournament(league, format, cli.seed),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let default = if verbose {
        "cricket=debug,cricket_core=debug,warn"
    } else {
        "cricket=info,cricket_core=info,warn"
    };
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

fn run_match(
    league: League,
    home: Option<String>,
    away: Option<String>,
    ball_by_ball: bool,
    seed: u64,
) -> Result<()> {
    let pick = |name: Option<String>, fallback: usize| {
        let team = match name {
            Some(name) => league.teams.iter().find(|t| t.name == name),
            None => league.teams.get(fallback),
        };
        team.cloned().context("team not found in league")
    };
    let mut home = pick(home, 0)?;
    let mut away = pick(away, 1)?;
    home.ensure_lineup()?;
    away.ensure_lineup()?;
    let venue = league.venues.first().context("league has no venues")?;

    println!("🏏 {} v {} at {} ({})", home.name, away.name, venue.name, league.match_config.format);
    let mut engine =
        MatchEngine::initialise_with_seed(&home, &away, venue, league.match_config.clone(), seed)?;
    let result = engine.simulate_match_with(|event| match event {
        MatchEvent::Ball(ball) if ball_by_ball => {
            println!(
                "   {}.{} {} to {}: {}",
                ball.over, ball.ball, ball.bowler, ball.striker, ball.result
            );
        }
        MatchEvent::Over(over) if ball_by_ball => {
            println!("   -- end of over {}: {}/{}", over.over + 1, over.score, over.total_wickets);
        }
        MatchEvent::InningsEnd(summary) => println!("\n   {summary}"),
        _ => {}
    })?;

    println!("\n✅ {result}");
    println!("   History digest: {}", engine.history_digest());
    Ok(())
}

fn run_auction(league: League, seed: u64) -> Result<()> {
    let strategies = league.strategies();
    let mut teams = league.teams;
    let mut session =
        AuctionSession::with_seed(league.pool, &teams, &strategies, league.auction, seed)?;

    println!("🔨 Auction: {} players, {} teams", session.lots().len(), teams.len());
    let summary = session.run_to_completion_with(|event| match event {
        AuctionEvent::LotSold {
            player,
            team,
            price,
            ..
        } => println!("   SOLD   {player:<16} {team:<12} {price:>6.2}"),
        AuctionEvent::LotUnsold { player, .. } => println!("   UNSOLD {player}"),
        _ => {}
    })?;
    session.settle(&mut teams)?;

    println!("\n✅ {} sold, {} unsold", summary.sold, summary.unsold);
    if let Some(top) = &summary.highest_sale {
        println!("   Top buy: {} to {} for {:.2}", top.player, top.team, top.price);
    }
    for (team, spent) in &summary.spend_by_team {
        let squad = teams.iter().find(|t| &t.name == team).map_or(0, |t| t.squad.len());
        println!("   {team:<12} spent {spent:>6.2}, squad {squad}");
    }
    Ok(())
}

fn run_tournament(league: League, format: Option<FormatArg>, seed: u64) -> Result<()> {
    let mut config = league.tournament;
    config.match_config = league.match_config;
    if let Some(format) = format {
        config.format = format.into();
    }

    println!("🏆 {} ({})", config.name, config.format);
    let mut tournament = Tournament::new(config, league.teams, league.venues, seed)?;
    let champion = tournament.run_to_completion_with(|event| match event {
        TournamentEvent::MatchCompleted {
            fixture,
            team1,
            team2,
            winner,
        } => println!(
            "   #{fixture:<3} {team1} v {team2}: {}",
            winner.as_deref().unwrap_or("tied")
        ),
        TournamentEvent::StageAdvanced(stage) => println!("\n   == {stage} =="),
        _ => {}
    })?;

    for (g, table) in tournament.standings().iter().enumerate() {
        println!("\n   Table {}", g + 1);
        for (pos, row) in table.iter().enumerate() {
            println!(
                "   {:>2}. {:<12} P{:<2} W{:<2} L{:<2} T{:<2} {:>3} pts  NRR {:+.3}",
                pos + 1,
                row.team,
                row.played,
                row.won,
                row.lost,
                row.tied,
                row.points,
                row.net_run_rate()
            );
        }
    }
    println!("\n✅ Champion: {champion}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_match_subcommand_with_globals() {
        let cli = Cli::try_parse_from([
            "cricket", "--seed", "7", "match", "--home", "Chennai", "--ball-by-ball",
        ])
        .unwrap();
        assert_eq!(cli.seed, 7);
        match cli.command {
            Commands::Match {
                home,
                away,
                ball_by_ball,
            } => {
                assert_eq!(home.as_deref(), Some("Chennai"));
                assert_eq!(away, None);
                assert!(ball_by_ball);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_tournament_format() {
        let cli = Cli::try_parse_from(["cricket", "tournament", "--format", "round-robin", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Tournament {
                format: Some(FormatArg::RoundRobin)
            }
        ));
        assert_eq!(TournamentFormat::from(FormatArg::Groups), TournamentFormat::GroupStage);
    }

    #[test]
    fn rejects_unknown_format_and_missing_command() {
        assert!(Cli::try_parse_from(["cricket", "tournament", "--format", "swiss"]).is_err());
        assert!(Cli::try_parse_from(["cricket"]).is_err());
        let cli = Cli::try_parse_from(["cricket", "auction", "--config", "league.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("league.json")));
    }

    #[test]
    fn demo_commands_run_end_to_end() {
        let mut league = League::demo(5);
        league.match_config = cricket_core::MatchConfig::new(cricket_core::MatchFormat::Custom { overs: 2 });
        run_match(league.clone(), None, None, false, 5).unwrap();
        run_auction(league.clone(), 5).unwrap();
        run_tournament(league, Some(FormatArg::Knockout), 5).unwrap();
    }
}
