#[macro_use]
extern crate criterion;

mod arena;

criterion_group!(benches, crate::arena::benchmark);
criterion_main!(benches);
