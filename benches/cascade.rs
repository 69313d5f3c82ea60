use criterion::{black_box, criterion_group, criterion_main, Criterion};
use puyo_sim::core::{gravity, vanish, GridStore, Sequencer, Simulation};
use puyo_sim::types::{Command, PieceColor, Pos, SETTLE_DELAY_MS, SimState};

/// A full field with no matchable cluster: worst case for the scan
fn checkerboard() -> GridStore {
    let mut grid = GridStore::new();
    for col in 0..6 {
        for row in 0..13 {
            let color = if (col + row) % 2 == 0 {
                PieceColor::Red
            } else {
                PieceColor::Blue
            };
            let id = grid.spawn(color, Pos::new(col, row));
            grid.register(id);
        }
    }
    grid
}

/// Every piece floating high in its column
fn suspended_field() -> GridStore {
    let mut grid = GridStore::new();
    for col in 0..6 {
        for layer in 0..6 {
            let id = grid.spawn(PieceColor::Green, Pos::new(col, 6 + layer));
            grid.register(id);
        }
    }
    grid
}

fn bench_cluster_scan(c: &mut Criterion) {
    c.bench_function("cluster_scan_full_field", |b| {
        b.iter(|| {
            let mut grid = checkerboard();
            vanish::find_and_flag(black_box(&mut grid))
        })
    });
}

fn bench_settle(c: &mut Criterion) {
    c.bench_function("settle_suspended_field", |b| {
        b.iter(|| {
            let mut grid = suspended_field();
            gravity::settle(black_box(&mut grid));
            grid
        })
    });
}

fn bench_release_cascade(c: &mut Criterion) {
    c.bench_function("release_cascade_to_stop", |b| {
        b.iter(|| {
            let mut sim = Simulation::with_sequence_len(12345, 64);
            for (col, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                sim.register_piece(PieceColor::Red, Pos::new(col, row));
            }
            sim.apply(Command::Play);
            while sim.state() != SimState::Stop {
                sim.tick(black_box(SETTLE_DELAY_MS));
            }
            sim.chain()
        })
    });
}

fn bench_play_tick(c: &mut Criterion) {
    let mut sim = Simulation::with_sequence_len(12345, 4096);
    sim.apply(Command::ChangeMode);

    c.bench_function("play_tick_16ms", |b| {
        b.iter(|| {
            sim.tick(black_box(16));
        })
    });
}

fn bench_sequence_build(c: &mut Criterion) {
    c.bench_function("sequence_build_4096", |b| {
        b.iter(|| Sequencer::with_len(black_box(12345), 4096))
    });
}

criterion_group!(
    benches,
    bench_cluster_scan,
    bench_settle,
    bench_release_cascade,
    bench_play_tick,
    bench_sequence_build
);
criterion_main!(benches);
