use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use fieldsearch::{Document, Index, IndexConfig, Schema};

fn documents(n: u32) -> Vec<Document> {
    (0..n)
        .map(|i| {
            Document::new(i)
                .field("name", format!("City{i}"))
                .field(
                    "description",
                    format!("city number {i} on the {} bank of the river", i % 7),
                )
        })
        .collect()
}

fn bench_add_or_update(c: &mut Criterion) {
    let docs = documents(1_000);
    c.bench_function("index_1k_documents", |b| {
        b.iter_batched(
            || {
                (
                    Index::open(Schema::sample_data(), IndexConfig::Memory).unwrap(),
                    docs.clone(),
                )
            },
            |(index, docs)| index.writer().add_or_update(docs).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

fn bench_search(c: &mut Criterion) {
    let index = Index::open(Schema::sample_data(), IndexConfig::Memory).unwrap();
    index.writer().add_or_update(documents(10_000)).unwrap();
    let query = vec![("description".to_string(), "city".to_string())];
    c.bench_function("search_10k_documents", |b| {
        b.iter(|| index.query().search(&query, 10))
    });
}

criterion_group!(benches, bench_add_or_update, bench_search);
criterion_main!(benches);
