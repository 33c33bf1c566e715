use criterion::{criterion_group, criterion_main, Criterion};
use fieldsearch::tokenizer::tokenize;

fn bench_tokenize(c: &mut Criterion) {
    let text = "Belgrad, the capital of Serbia, lies at the confluence of the \
                Sava and the Danube. Moscow sits on the Moskva river; Chicago \
                on Lake Michigan. Mumbai (formerly Bombay) is the most populous \
                city in India, and Hong-Kong a special administrative region."
        .repeat(64);
    c.bench_function("tokenize_city_text", |b| b.iter(|| tokenize(&text)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
