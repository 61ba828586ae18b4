criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        building_random_game,
        solving_sure_win,
        solving_almost_sure_win,
        solving_sure_deception,
        solving_almost_sure_deception,
        allocating_greedy_traps,
}

use hypergame::*;
use std::collections::BTreeSet;
use std::sync::Arc;

fn random() -> Arc<Game<String, String>> {
    Arc::new(RandomGame::default().build().expect("random game"))
}

fn decoys(game: &Game<String, String>) -> (BTreeSet<String>, BTreeSet<String>, BTreeSet<String>) {
    let finals = game.labelled(GOAL);
    let mut others = game.states().filter(|s| !finals.contains(*s)).cloned();
    let fakes = others.by_ref().take(3).collect();
    let traps = others.take(3).collect();
    (finals, fakes, traps)
}

fn building_random_game(c: &mut criterion::Criterion) {
    c.bench_function("build a random turn-based Game", |b| {
        b.iter(|| RandomGame::default().build())
    });
}

fn solving_sure_win(c: &mut criterion::Criterion) {
    let game = random();
    let finals = game.labelled(GOAL);
    c.bench_function("solve SureWin for P2", |b| {
        b.iter(|| {
            let mut solver = SureWin::new(game.clone(), &finals, Player::P2).expect("solver");
            solver.solve(false);
            solver.region(Player::P2).count_ones(..)
        })
    });
}

fn solving_almost_sure_win(c: &mut criterion::Criterion) {
    let game = random();
    let (finals, fakes, traps) = decoys(&game);
    let setup = Setup::new(game, finals, fakes, traps).expect("setup");
    let base = setup.solve_base().expect("base");
    let perceived = setup.solve_perceived().expect("perceived");
    let rational = RationalActions::almost_sure(setup.game(), &perceived.region(Player::P2), setup.finals());
    let mut diagnostics = Diagnostics::default();
    let hypergame = Arc::new(HypergameBuilder::new(&setup, &base, &rational).almost_sure(&mut diagnostics));
    let target = BTreeSet::from([Proxy::Lured]);
    c.bench_function("solve AlmostSureWin on a Hypergame", |b| {
        b.iter(|| {
            let mut solver = AlmostSureWin::new(hypergame.clone(), &target).expect("solver");
            solver.solve(false);
            solver.region().count_ones(..)
        })
    });
}

fn solving_sure_deception(c: &mut criterion::Criterion) {
    let game = random();
    let (finals, fakes, traps) = decoys(&game);
    let setup = Setup::new(game, finals, fakes, traps).expect("setup");
    c.bench_function("solve DSWinReach", |b| {
        b.iter(|| Concept::Sure.evaluate(setup.clone()).expect("deception").vod)
    });
}

fn solving_almost_sure_deception(c: &mut criterion::Criterion) {
    let game = random();
    let (finals, fakes, traps) = decoys(&game);
    let setup = Setup::new(game, finals, fakes, traps).expect("setup");
    c.bench_function("solve DASWinReach", |b| {
        b.iter(|| Concept::AlmostSure.evaluate(setup.clone()).expect("deception").vod)
    });
}

fn allocating_greedy_traps(c: &mut criterion::Criterion) {
    let game = Arc::new(RandomGame::new(60, 4, 5, 0).build().expect("random game"));
    let finals = game.labelled(GOAL);
    let candidates = Candidates::singletons(game.states().filter(|s| !finals.contains(*s)).cloned());
    c.bench_function("allocate 1 fake and 2 traps greedily", |b| {
        b.iter(|| {
            let mut allocator =
                DecoyAllocator::new(game.clone(), finals.clone(), candidates.clone(), 1, 2, Concept::Sure)
                    .expect("allocator");
            allocator.solve(false).expect("allocation");
            allocator.vod()
        })
    });
}
