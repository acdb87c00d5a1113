//! Micro-benchmarks for the two hot paths the legality engine calls on every
//! `WaitAct`/`WaitResponse`: shanten distance and full hand decomposition.
//! Both run on every seat's every turn, so their cost dominates `step`'s
//! wall-clock budget far more than the state-machine bookkeeping around them.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use riichi::algo::{decomp, shanten};
use riichi::hand::hand;

fn bench_shanten(c: &mut Criterion) {
    let tehai = hand("123456789m123p1s").unwrap();
    c.bench_function("calc_all/13_tiles_1_shanten", |b| {
        b.iter(|| shanten::calc_all(black_box(&tehai), black_box(0)));
    });

    let iishanten = hand("1345678m123p123s").unwrap();
    c.bench_function("waits/tenpai_hand", |b| {
        b.iter(|| shanten::waits(black_box(&iishanten), black_box(0)));
    });
}

fn bench_decompose(c: &mut Criterion) {
    let agari = hand("123456789m123p11s").unwrap();
    c.bench_function("decompose/standard_agari", |b| {
        b.iter(|| decomp::decompose(black_box(&agari)));
    });

    let ambiguous = hand("112233m456p789s11z").unwrap();
    c.bench_function("decompose/multiple_divisions", |b| {
        b.iter(|| decomp::decompose(black_box(&ambiguous)));
    });
}

criterion_group!(benches, bench_shanten, bench_decompose);
criterion_main!(benches);
