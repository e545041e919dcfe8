use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use swiss_pairing::{CalculatePairingRequest, PairingEngine, Tournament};

/// Build a tournament of `players` with `rounds_played` rounds already paired and
/// played. Lower starting numbers win; every fourth board is drawn.
fn setup_tournament(players: u32, rounds_played: u32) -> Tournament {
    let engine = PairingEngine::default();
    let mut tournament = Tournament::new(rounds_played + 2);
    for n in 1..=players {
        tournament.add_player(format!("player{n}"));
    }

    for round_no in 1..=rounds_played {
        let pairing = engine
            .calculate_pairing(&CalculatePairingRequest {
                tournament: tournament.clone(),
            })
            .unwrap()
            .pairing;
        tournament.append_pairing(pairing);
        let round = tournament.rounds.last_mut().unwrap();
        for game in &mut round.games {
            let (white, black) = (game.table.white, game.table.black);
            if (white + black + round_no) % 4 == 0 {
                game.record(0.5, 0.5);
            } else if white < black {
                game.record(1.0, 0.0);
            } else {
                game.record(0.0, 1.0);
            }
        }
    }
    tournament
}

/// Benchmark the first round of a 64-player field
fn bench_first_round_64(c: &mut Criterion) {
    let engine = PairingEngine::default();
    let request = CalculatePairingRequest {
        tournament: setup_tournament(64, 0),
    };

    c.bench_function("first_round_64_players", |b| {
        b.iter(|| engine.calculate_pairing(&request).unwrap());
    });
}

/// Benchmark mid-tournament rounds with growing history
fn bench_later_rounds(c: &mut Criterion) {
    let engine = PairingEngine::default();
    let mut group = c.benchmark_group("later_rounds_64_players");

    for rounds_played in [2u32, 4, 6] {
        let request = CalculatePairingRequest {
            tournament: setup_tournament(64, rounds_played),
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(rounds_played),
            &request,
            |b, request| {
                b.iter(|| engine.calculate_pairing(request).unwrap());
            },
        );
    }
    group.finish();
}

/// Benchmark an odd field, where every bye candidate may be tried
fn bench_odd_field(c: &mut Criterion) {
    let engine = PairingEngine::default();
    let request = CalculatePairingRequest {
        tournament: setup_tournament(63, 3),
    };

    c.bench_function("odd_field_63_players", |b| {
        b.iter(|| engine.calculate_pairing(&request).unwrap());
    });
}

criterion_group!(
    pairing,
    bench_first_round_64,
    bench_later_rounds,
    bench_odd_field,
);

criterion_main!(pairing);
