//! This bench measures adding dependency edges against a long chain of
//! requirements, which forces the cycle check to walk the whole chain.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use openreqs::{Draft, Engine, InMemoryStore, Priority, RequirementType, StakeholderProfile};
use uuid::Uuid;

const REQUIREMENT_COUNT: u16 = 200;

/// Builds a store with a chain REQ-001 → REQ-002 → … → REQ-199 and one
/// standalone requirement REQ-200.
fn preseed() -> (Engine<InMemoryStore>, Vec<Uuid>) {
    let mut engine = Engine::new(InMemoryStore::new());
    let stakeholder = engine
        .register_stakeholder(StakeholderProfile::new(
            "Ana",
            "Product Owner",
            "ana@example.com",
        ))
        .unwrap();

    let mut ids = Vec::with_capacity(usize::from(REQUIREMENT_COUNT));
    for index in 1..=REQUIREMENT_COUNT {
        let requirement = engine
            .create(Draft {
                key: format!("REQ-{index:03}"),
                description: "O sistema deve permitir login com email e senha".to_string(),
                rationale: "Necessário para controlar o acesso ao sistema".to_string(),
                fit_criterion: None,
                kind: RequirementType::Functional,
                priority: Priority::Medium,
                source: stakeholder.id(),
            })
            .unwrap();
        ids.push(requirement.id());
    }

    let chain = &ids[..ids.len() - 1];
    for pair in chain.windows(2) {
        engine.add_dependency(pair[0], pair[1]).unwrap();
    }

    (engine, ids)
}

fn accept_after_walking_the_chain(c: &mut Criterion) {
    c.bench_function("accept after walking the chain", |b| {
        b.iter_batched(
            preseed,
            |(mut engine, ids)| {
                // The standalone record comes to depend on the chain head.
                // The cycle check searches the entire chain from the head and
                // never finds the standalone record, so the edge is legal.
                engine
                    .add_dependency(*ids.last().unwrap(), ids[0])
                    .unwrap();
            },
            BatchSize::SmallInput,
        );
    });
}

fn reject_a_cycle_closing_edge(c: &mut Criterion) {
    c.bench_function("reject a cycle-closing edge", |b| {
        b.iter_batched(
            preseed,
            |(mut engine, ids)| {
                // The chain tail closing back onto the head must be rejected.
                let tail = ids[ids.len() - 2];
                engine.add_dependency(tail, ids[0]).unwrap_err();
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    accept_after_walking_the_chain,
    reject_a_cycle_closing_edge
);
criterion_main!(benches);
