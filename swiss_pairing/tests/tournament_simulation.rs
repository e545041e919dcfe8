//! Whole tournaments played round by round through the engine.

use std::collections::{BTreeMap, BTreeSet};

use swiss_pairing::{
    ByeKind, CalculatePairingRequest, Pairing, PairingConfig, PairingEngine, Tournament,
    Withdrawal,
};

/// Lower starting number wins, except every third board which is drawn
fn play(white: u32, black: u32, round_no: u32) -> (f64, f64) {
    if (white + black + round_no) % 3 == 0 {
        (0.5, 0.5)
    } else if white < black {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    }
}

fn record_results(tournament: &mut Tournament) {
    let round_no = tournament.rounds_played();
    let round = tournament.rounds.last_mut().unwrap();
    for game in &mut round.games {
        let (w, b) = play(game.table.white, game.table.black, round_no);
        game.record(w, b);
    }
}

fn run(engine: &PairingEngine, tournament: &mut Tournament) -> Vec<Pairing> {
    let mut pairings = Vec::new();
    while !tournament.is_complete() {
        let before = tournament.rounds_played();
        let pairing = engine
            .calculate_pairing(&CalculatePairingRequest {
                tournament: tournament.clone(),
            })
            .unwrap()
            .pairing;
        tournament.append_pairing(pairing.clone());
        assert_eq!(tournament.rounds_played(), before + 1);
        record_results(tournament);
        pairings.push(pairing);
    }
    pairings
}

fn tournament(players: u32, rounds: u32) -> Tournament {
    let mut tournament = Tournament::new(rounds);
    for n in 1..=players {
        tournament.add_player(format!("Player {n}"));
    }
    tournament
}

fn assert_no_rematches(pairings: &[Pairing]) {
    let mut met = BTreeSet::new();
    for pairing in pairings {
        for table in &pairing.tables {
            let key = (table.white.min(table.black), table.white.max(table.black));
            assert!(met.insert(key), "rematch {key:?}");
        }
    }
}

fn assert_everyone_placed_once(pairing: &Pairing, players: u32) {
    let mut seen = BTreeMap::new();
    for table in &pairing.tables {
        *seen.entry(table.white).or_insert(0) += 1;
        *seen.entry(table.black).or_insert(0) += 1;
    }
    for empty in &pairing.empty_tables {
        *seen.entry(empty.start_no).or_insert(0) += 1;
    }
    assert_eq!(seen.len() as u32, players);
    assert!(seen.values().all(|count| *count == 1));
}

#[test]
fn test_even_field_full_tournament() {
    let engine = PairingEngine::default();
    let mut tournament = tournament(10, 5);

    let pairings = run(&engine, &mut tournament);

    assert_eq!(pairings.len(), 5);
    assert_no_rematches(&pairings);
    for pairing in &pairings {
        assert_everyone_placed_once(pairing, 10);
        assert_eq!(pairing.tables.len(), 5);
        assert!(pairing.empty_tables.is_empty());
    }
}

#[test]
fn test_odd_field_rotates_the_bye() {
    let engine = PairingEngine::default();
    let mut tournament = tournament(9, 4);

    let pairings = run(&engine, &mut tournament);

    assert_no_rematches(&pairings);
    let mut bye_recipients = BTreeSet::new();
    for pairing in &pairings {
        assert_everyone_placed_once(pairing, 9);
        let byes: Vec<_> = pairing
            .empty_tables
            .iter()
            .filter(|e| e.bye.kind == ByeKind::Pairing)
            .collect();
        assert_eq!(byes.len(), 1);
        assert!(bye_recipients.insert(byes[0].start_no));
    }
}

#[test]
fn test_points_are_conserved() {
    let engine = PairingEngine::default();
    let mut tournament = tournament(7, 3);

    let pairings = run(&engine, &mut tournament);

    let total: f64 = tournament
        .rounds
        .iter()
        .flat_map(|round| {
            round.games.iter().map(|game| {
                game.white_result.map_or(0.0, |r| r.points)
                    + game.black_result.map_or(0.0, |r| r.points)
            })
        })
        .sum::<f64>()
        + tournament
            .rounds
            .iter()
            .flat_map(|round| round.byes.iter().map(|e| e.bye.points))
            .sum::<f64>();

    let games: usize = pairings.iter().map(|p| p.tables.len()).sum();
    let byes: usize = pairings.iter().map(|p| p.empty_tables.len()).sum();
    assert_eq!(total, games as f64 + byes as f64);
}

#[test]
fn test_withdrawal_only_affects_its_round() {
    let engine = PairingEngine::default();
    let mut tournament = tournament(6, 3);
    tournament.players[5].withdrawals.push(Withdrawal {
        round_no: 2,
        bye: Some(0.5),
    });

    let pairings = run(&engine, &mut tournament);

    let placed_at_board =
        |pairing: &Pairing| pairing.tables.iter().any(|t| t.white == 6 || t.black == 6);
    assert!(placed_at_board(&pairings[0]));
    assert!(!placed_at_board(&pairings[1]));
    assert!(placed_at_board(&pairings[2]));

    let withdrawal = pairings[1]
        .empty_tables
        .iter()
        .find(|e| e.start_no == 6)
        .unwrap();
    assert_eq!(withdrawal.bye.kind, ByeKind::Withdrawal);
    assert_eq!(withdrawal.bye.points, 0.5);
}

#[test]
fn test_configured_bye_points() {
    let config = PairingConfig {
        pairing_bye_points: swiss_pairing::Score::HALF,
        ..PairingConfig::default()
    };
    let engine = PairingEngine::new(config);
    let mut tournament = tournament(5, 2);

    let pairings = run(&engine, &mut tournament);
    for pairing in &pairings {
        let bye = pairing.empty_tables.last().unwrap();
        assert_eq!(bye.bye.kind, ByeKind::Pairing);
        assert_eq!(bye.bye.points, 0.5);
    }
}
