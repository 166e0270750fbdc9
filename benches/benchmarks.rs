use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chess_rules::fen::{from_fen, to_fen};
use chess_rules::perft::perft;
use chess_rules::san::to_san;
use chess_rules::GameState;

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

pub fn bench_legal_moves_from_start(c: &mut Criterion) {
    let state = GameState::new();
    c.bench_function("legal moves from start", |b| {
        b.iter(|| black_box(&state).all_legal_moves())
    });
}

pub fn bench_legal_moves_from_kiwipete(c: &mut Criterion) {
    let state = from_fen(KIWIPETE_FEN).unwrap();
    c.bench_function("legal moves from kiwipete", |b| {
        b.iter(|| black_box(&state).all_legal_moves())
    });
}

pub fn bench_game_over_from_kiwipete(c: &mut Criterion) {
    let state = from_fen(KIWIPETE_FEN).unwrap();
    c.bench_function("game over check from kiwipete", |b| {
        b.iter(|| black_box(&state).game_over_type())
    });
}

pub fn bench_fen_round_trip(c: &mut Criterion) {
    c.bench_function("fen parse and write kiwipete", |b| {
        b.iter(|| to_fen(&from_fen(black_box(KIWIPETE_FEN)).unwrap()))
    });
}

pub fn bench_san_all_moves(c: &mut Criterion) {
    let state = from_fen(KIWIPETE_FEN).unwrap();
    let moves = state.all_legal_moves();
    c.bench_function("san for every kiwipete move", |b| {
        b.iter(|| {
            moves
                .iter()
                .filter(|m| !m.is_pending_promotion())
                .map(|m| to_san(black_box(&state), m).unwrap())
                .count()
        })
    });
}

pub fn bench_perft_3_start(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sample_size(10);

    let state = GameState::new();
    group.bench_function("perft from start 3 ply", |b| {
        b.iter(|| perft(black_box(&state), black_box(3)))
    });
    group.bench_function("perft from kiwipete 2 ply", |b| {
        let kiwipete = from_fen(KIWIPETE_FEN).unwrap();
        b.iter(|| perft(black_box(&kiwipete), black_box(2)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_legal_moves_from_start,
    bench_legal_moves_from_kiwipete,
    bench_game_over_from_kiwipete,
    bench_fen_round_trip,
    bench_san_all_moves,
    bench_perft_3_start,
);
criterion_main!(benches);
