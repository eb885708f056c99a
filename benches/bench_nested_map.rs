use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nested_collections::meldable_heap::MeldableHeap;
use nested_collections::nested_map::{Lookup, NestedMap};
use nested_collections::red_black_tree::RedBlackTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NUM_OF_OPERATIONS: usize = 100;
const NUM_OF_SECTIONS: u32 = 10;

fn records() -> Vec<(u32, u32, u32)> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..NUM_OF_OPERATIONS)
        .map(|_| (rng.gen_range(0..NUM_OF_SECTIONS), rng.gen::<u32>(), rng.gen::<u32>()))
        .collect()
}

fn build(records: &[(u32, u32, u32)]) -> NestedMap<u32, u32> {
    let mut map = NestedMap::with_name("bench");
    for (i, &(section, key, value)) in records.iter().enumerate() {
        map.add(key, value, vec![section as usize, i], vec![u32::max_value() - section]);
    }
    map
}

fn bench_red_black_tree_add(c: &mut Criterion) {
    let records = records();
    c.bench_function("bench red black tree add", move |b| {
        b.iter(|| {
            let mut tree = RedBlackTree::new();
            for &(_, key, _) in &records {
                tree.add(key);
            }
            black_box(tree.len())
        })
    });
}

fn bench_meldable_heap_drain(c: &mut Criterion) {
    let records = records();
    c.bench_function("bench meldable heap drain", move |b| {
        b.iter(|| {
            let mut heap = MeldableHeap::with_seed(1);
            heap.extend(records.iter().map(|&(_, key, _)| key));
            black_box(heap.into_sorted_iter().count())
        })
    });
}

fn bench_nested_map_add(c: &mut Criterion) {
    let records = records();
    c.bench_function("bench nested map add", move |b| {
        b.iter(|| black_box(build(&records).len()))
    });
}

fn bench_nested_map_find(c: &mut Criterion) {
    let records = records();
    let map = build(&records);
    c.bench_function("bench nested map find", move |b| {
        b.iter(|| {
            for &(section, key, _) in &records {
                let parent = u32::max_value() - section;
                black_box(map.find(&key, Lookup::Immediate(&parent)).ok());
            }
        })
    });
}

fn bench_nested_map_iter(c: &mut Criterion) {
    let map = build(&records());
    c.bench_function("bench nested map iter", move |b| {
        b.iter(|| black_box(map.iter().count()))
    });
}

fn bench_nested_map_dump(c: &mut Criterion) {
    let records = records();
    c.bench_function("bench nested map dump", move |b| {
        b.iter(|| {
            let map = build(&records);
            black_box(map.dump().len())
        })
    });
}

criterion_group!(
    benches,
    bench_red_black_tree_add,
    bench_meldable_heap_drain,
    bench_nested_map_add,
    bench_nested_map_find,
    bench_nested_map_iter,
    bench_nested_map_dump,
);
criterion_main!(benches);
