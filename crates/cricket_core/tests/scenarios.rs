//! End-to-end scenarios across the match engine, auction and tournament.

mod common;

use common::*;
use cricket_core::auction::{
    AuctionEvent, AuctionRules, AuctionSession, BasePriceRule, BidStrategy, LotState,
};
use cricket_core::engine::{MatchPhase, ResultMargin};
use cricket_core::error::{AuctionError, BidRejection};
use cricket_core::models::{MatchFormat, Nationality, Player, Role, Team};
use cricket_core::tournament::{Tournament, TournamentConfig, TournamentFormat};

// ============================================================================
// Match engine
// ============================================================================

#[test]
fn t20_between_even_sides_completes() {
    let a = uniform_team("Rajasthan", 50);
    let b = uniform_team("Punjab", 50);
    let engine = play(&a, &b, config(MatchFormat::T20), 1);

    assert_eq!(engine.phase(), MatchPhase::Complete);
    let first = &engine.innings()[0];
    let second = &engine.innings()[1];
    assert!(first.complete && second.complete);
    assert!(first.legal_balls == 120 || first.wickets == 10);
    assert!(second.legal_balls <= 120);

    let regulation: Vec<_> = engine
        .ball_history()
        .iter()
        .filter(|b| b.innings <= 2)
        .collect();
    let legal = regulation.iter().filter(|b| b.is_legal()).count();
    let illegal = regulation.len() - legal;
    assert!((120..=240).contains(&legal), "{legal} legal deliveries");
    assert_eq!(regulation.len(), legal + illegal);
    assert_eq!(legal, (first.legal_balls + second.legal_balls) as usize);
    assert!(regulation.len() >= 120);

    let result = engine.result().unwrap();
    match result.margin {
        ResultMargin::Runs(r) => assert!(r > 0),
        ResultMargin::Wickets(w) => assert!((1..=10).contains(&w)),
        ResultMargin::SuperOver | ResultMargin::Tie => assert!(result.tied_in_regulation),
    }
}

#[test]
fn all_out_innings_stops_at_the_tenth_wicket() {
    let batting = hopeless_batting("Minnows");
    let bowling = elite_bowling("Quicks");

    let engine = (0..200)
        .map(|seed| play(&batting, &bowling, config(MatchFormat::T20), seed))
        .find(|e| e.innings()[0].wickets == 10)
        .expect("some seed bowls the minnows out");

    let first = &engine.innings()[0];
    assert!(first.complete);
    assert!(first.legal_balls < 120);
    let wickets = engine
        .ball_history()
        .iter()
        .filter(|b| b.innings == 1 && b.wicket.is_some())
        .count();
    assert_eq!(wickets, 10);

    let last = engine
        .ball_history()
        .iter()
        .filter(|b| b.innings == 1)
        .last()
        .unwrap();
    let dismissal = last.wicket.as_ref().expect("innings ends on a wicket");
    assert_eq!(first.striker, dismissal.batter);

    let not_out = first
        .batting_card
        .iter()
        .find(|c| c.name == first.non_striker)
        .unwrap();
    assert!(not_out.dismissal.is_none());
    assert_eq!(first.batting_card.iter().filter(|c| c.dismissal.is_some()).count(), 10);
}

#[test]
fn regulation_tie_goes_to_a_super_over() {
    let a = uniform_team("Gujarat", 50);
    let b = uniform_team("Lucknow", 50);

    let engine = (0..20_000)
        .map(|seed| play(&a, &b, config(MatchFormat::Custom { overs: 2 }), seed))
        .find(|e| e.result().is_some_and(|r| r.tied_in_regulation))
        .expect("a two-over match ties within the seed range");

    let result = engine.result().unwrap();
    assert!(!result.super_overs.is_empty());
    assert_eq!(result.innings.len(), 2);
    assert_eq!(result.innings[0].runs, result.innings[1].runs);

    let opening = &result.super_overs[0];
    assert_eq!(opening.first.batting_team, result.innings[1].batting_team);
    let last = result.super_overs.last().unwrap();
    assert!(last.first.legal_balls <= 6 && last.second.legal_balls <= 6);
    match &result.winner {
        Some(winner) => {
            assert_eq!(result.margin, ResultMargin::SuperOver);
            let expected = if last.second.runs > last.first.runs {
                &last.second.batting_team
            } else {
                &last.first.batting_team
            };
            assert_eq!(winner, expected);
            assert_ne!(last.first.runs, last.second.runs);
        }
        None => {
            assert_eq!(result.margin, ResultMargin::Tie);
            assert_eq!(result.super_overs.len() as u32, engine.config().max_super_overs);
        }
    }
}

#[test]
fn super_overs_are_bounded() {
    let a = uniform_team("Kochi", 40);
    let b = uniform_team("Pune", 40);
    let cfg = cricket_core::engine::MatchConfig {
        max_super_overs: 2,
        ..config(MatchFormat::Custom { overs: 1 })
    };

    let mut tied = 0;
    for seed in 0..3_000 {
        let engine = play(&a, &b, cfg.clone(), seed);
        let result = engine.result().unwrap();
        assert!(result.super_overs.len() <= 2);
        if result.tied_in_regulation {
            tied += 1;
            assert!(!result.super_overs.is_empty());
        } else {
            assert!(result.super_overs.is_empty());
        }
        if result.winner.is_none() {
            assert_eq!(result.super_overs.len(), 2);
        }
    }
    assert!(tied > 0);
}

// ============================================================================
// Auction
// ============================================================================

fn star() -> Player {
    Player::new("Superstar", Role::AllRounder, Nationality::Local).with_skills(100, 100, 100)
}

#[test]
fn aggressive_bidder_takes_the_star_at_the_cap() {
    let teams = vec![
        Team::new("Conservative A", 100.0),
        Team::new("Aggressive", 100.0),
        Team::new("Conservative B", 100.0),
    ];
    let rules = AuctionRules {
        base_price: BasePriceRule::Fixed(50.0),
        min_increment: 0.5,
        max_bid: 30.0,
        ..AuctionRules::default()
    };
    let strategies = [
        BidStrategy::Conservative,
        BidStrategy::Aggressive,
        BidStrategy::Conservative,
    ];
    let mut session = AuctionSession::with_seed(vec![star()], &teams, &strategies, rules, 1).unwrap();

    let mut sold = None;
    session
        .run_to_completion_with(|e| {
            if let AuctionEvent::LotSold { team, price, .. } = e {
                sold = Some((team.clone(), *price));
            }
        })
        .unwrap();

    assert_eq!(sold, Some(("Aggressive".to_string(), 30.0)));
    let budget = session.budget("Aggressive").unwrap();
    assert_eq!(budget.spent, 30.0);
    assert_eq!(budget.remaining, 70.0);
    for other in ["Conservative A", "Conservative B"] {
        assert_eq!(session.budget(other).unwrap().remaining, 100.0);
    }
}

#[test]
fn aggressive_bidder_outbids_a_balanced_rival_one_increment_at_a_time() {
    let teams = vec![Team::new("Aggressive", 100.0), Team::new("Balanced", 100.0)];
    let rules = AuctionRules {
        base_price: BasePriceRule::Fixed(1.0),
        ..AuctionRules::default()
    };
    let player = Player::new("Opener", Role::Batsman, Nationality::Local).with_skills(90, 90, 90);
    let mut session = AuctionSession::with_seed(
        vec![player],
        &teams,
        &[BidStrategy::Aggressive, BidStrategy::Balanced],
        rules.clone(),
        5,
    )
    .unwrap();
    session.run_to_completion().unwrap();

    // Balanced tops out at 22.5 * 1.2 = 27.0, so the cap is never reached.
    let lot = &session.lots()[0];
    assert_eq!(lot.state, LotState::Sold);
    assert_eq!(lot.current_bidder.as_deref(), Some("Aggressive"));
    let price = lot.current_bid.unwrap();
    assert!((27.0..=27.5).contains(&price), "sold at {price}");
    assert_eq!(session.budget("Aggressive").unwrap().spent, price);

    let history = &lot.bid_history;
    assert!(history.len() > 2);
    assert_eq!(history[0].amount, 1.0);
    for pair in history.windows(2) {
        assert_ne!(pair[0].team, pair[1].team);
        assert!((pair[1].amount - pair[0].amount - rules.min_increment).abs() < 1e-9);
    }
    assert!(history.iter().any(|b| b.team == "Balanced"));
}

#[test]
fn overseas_cap_blocks_the_bid_and_the_lot_carries_on() {
    let mut full = Team::new("Full House", 100.0);
    for i in 0..8 {
        full.squad.push(overseas_player(&format!("Import {i}")));
    }
    let teams = vec![full, Team::new("Locals", 100.0)];
    let pool = vec![overseas_player("New Import")];
    let mut session = AuctionSession::with_seed(
        pool,
        &teams,
        &[BidStrategy::Human, BidStrategy::Human],
        AuctionRules::default(),
        3,
    )
    .unwrap();
    session.start().unwrap();

    let rules = session.rules().clone();
    let base = session
        .current_lot()
        .unwrap()
        .minimum_bid(rules.min_increment, rules.max_bid);
    let err = session.place_bid("Full House", base).unwrap_err();
    assert_eq!(
        err,
        AuctionError::IneligibleBid {
            team: "Full House".into(),
            reason: BidRejection::OverseasCapReached,
        }
    );
    assert_eq!(session.current_lot().unwrap().state, LotState::Active);

    session.place_bid("Locals", base).unwrap();
    session.tick(rules.bid_time_secs).unwrap();
    assert_eq!(session.lots()[0].state, LotState::Sold);
    assert_eq!(session.lots()[0].current_bidder.as_deref(), Some("Locals"));
}

#[test]
fn ai_team_at_the_overseas_cap_sits_the_lot_out() {
    let mut full = Team::new("Full House", 100.0);
    for i in 0..8 {
        full.squad.push(overseas_player(&format!("Import {i}")));
    }
    let teams = vec![full, Team::new("Locals", 100.0)];
    let mut session = AuctionSession::with_seed(
        vec![overseas_player("New Import").with_skills(90, 90, 90)],
        &teams,
        &[BidStrategy::Aggressive, BidStrategy::Balanced],
        AuctionRules::default(),
        3,
    )
    .unwrap();

    let summary = session.run_to_completion().unwrap();
    assert_eq!(summary.sold, 1);
    assert_eq!(session.budget("Full House").unwrap().spent, 0.0);
    assert_eq!(session.lots()[0].current_bidder.as_deref(), Some("Locals"));
}

// ============================================================================
// Tournament
// ============================================================================

#[test]
fn round_robin_plays_every_pair_and_orders_the_table() {
    let teams: Vec<Team> = (0..6)
        .map(|i| uniform_team(&format!("Side {i}"), 40 + i * 8))
        .collect();
    let config = TournamentConfig {
        match_config: config(MatchFormat::Custom { overs: 3 }),
        ..TournamentConfig::new(TournamentFormat::RoundRobin)
    };
    let mut tournament = Tournament::new(config, teams, vec![venue()], 17).unwrap();
    assert_eq!(tournament.fixtures().len(), 6 * 5 / 2);

    let champion = tournament.run_to_completion().unwrap();
    assert!(tournament.fixtures().iter().all(|f| f.is_completed()));

    let table = &tournament.standings()[0];
    assert_eq!(table.len(), 6);
    assert_eq!(table[0].team, champion);
    assert_eq!(table.iter().map(|s| s.played).sum::<u32>(), 30);
    assert_eq!(table.iter().map(|s| s.points).sum::<u32>(), 30);
    for pair in table.windows(2) {
        assert!(
            pair[0].points > pair[1].points
                || (pair[0].points == pair[1].points
                    && pair[0].net_run_rate() >= pair[1].net_run_rate())
        );
    }
}
