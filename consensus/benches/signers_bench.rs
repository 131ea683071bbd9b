use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tandem_consensus::{contribution, AggregatedPower, Signers};
use tandem_types::{Address, Committee, MAX_COMMITTEE_SIZE};

const COMMITTEE_SIZE: usize = 100;

fn address(i: usize) -> Address {
    let mut bytes = [0u8; 20];
    bytes[..8].copy_from_slice(&(i as u64).to_be_bytes());
    Address::new(bytes)
}

fn committee() -> Committee {
    committee_of(COMMITTEE_SIZE)
}

fn committee_of(size: usize) -> Committee {
    Committee::new((0..size).map(|i| (address(i), 10, Vec::new()))).unwrap()
}

fn record(c: &Committee, indices: impl Iterator<Item = usize>) -> Signers {
    let mut s = Signers::new(c.len());
    for i in indices {
        s.increment(c.member_by_index(i).unwrap());
    }
    s
}

fn increment_bench(c: &mut Criterion) {
    let committee = committee();

    c.bench_function("signers_increment_full_committee", |b| {
        b.iter(|| record(&committee, black_box(0..COMMITTEE_SIZE)))
    });
}

fn merge_bench(c: &mut Criterion) {
    let committee = committee();
    let evens = record(&committee, (0..COMMITTEE_SIZE).step_by(2));
    let thirds = record(&committee, (0..COMMITTEE_SIZE).step_by(3).flat_map(|i| [i, i, i]));

    c.bench_function("signers_merge_overlapping_100", |b| {
        b.iter(|| {
            let mut merged = evens.clone();
            merged.merge(black_box(&thirds)).unwrap();
            merged
        })
    });
}

fn merge_largest_committee_bench(c: &mut Criterion) {
    let committee = committee_of(MAX_COMMITTEE_SIZE);
    let evens = record(&committee, (0..MAX_COMMITTEE_SIZE).step_by(2));
    let odds = record(&committee, (1..MAX_COMMITTEE_SIZE).step_by(2));

    c.bench_function("signers_merge_disjoint_65535", |b| {
        b.iter(|| {
            let mut merged = evens.clone();
            merged.merge(black_box(&odds)).unwrap();
            merged
        })
    });
}

fn flatten_bench(c: &mut Criterion) {
    let committee = committee();
    let s = record(&committee, (0..COMMITTEE_SIZE).flat_map(|i| [i, i, i]));

    c.bench_function("signers_flatten_100x3", |b| b.iter(|| black_box(&s).flatten()));
}

fn validate_bench(c: &mut Criterion) {
    let committee = committee();
    let s = record(&committee, (0..COMMITTEE_SIZE).flat_map(|i| [i, i, i]));
    let bytes = bincode::serialize(&s).unwrap();

    c.bench_function("signers_decode_prepare_100", |b| {
        b.iter(|| {
            let mut decoded: Signers = bincode::deserialize(black_box(&bytes)).unwrap();
            decoded.prepare(&committee).unwrap()
        })
    });
}

fn contribution_bench(c: &mut Criterion) {
    let mut core = AggregatedPower::new();
    let mut candidate = AggregatedPower::new();
    for i in 0..COMMITTEE_SIZE {
        if i % 2 == 0 {
            core.set(i, 10);
        }
        candidate.set(i, 10);
    }

    c.bench_function("contribution_100", |b| {
        b.iter(|| contribution(black_box(candidate.signers()), core.signers()))
    });
}

criterion_group!(
    benches,
    increment_bench,
    merge_bench,
    merge_largest_committee_bench,
    flatten_bench,
    validate_bench,
    contribution_bench
);
criterion_main!(benches);
