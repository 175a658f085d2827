//! Filters and sorts a large board the way the home page does after every
//! keystroke in the search box.

#![allow(missing_docs)]

use chrono::{Duration, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use qaboard::{
    domain::Author, query, FilterSpec, FilterType, Fixtures, QuestionDraft, QuestionStore,
    SortKey, Tag,
};

const TAGS: [&str; 8] = [
    "react", "hooks", "javascript", "typescript", "css", "node.js", "python", "git",
];

/// Builds a board with the seed questions plus a few thousand more.
fn preseed_store() -> QuestionStore {
    let mut store = QuestionStore::from_fixtures(Fixtures::builtin().unwrap());
    let author = Author::new("Bench", 1);
    let now = Utc::now();

    for i in 0..5_000_u32 {
        let mut draft = QuestionDraft::new(
            format!("Question {i} about {}", TAGS[i as usize % TAGS.len()]),
            format!("Some details for question {i}."),
        );
        draft.add_tag(TAGS[i as usize % TAGS.len()]).unwrap();
        draft.add_tag(TAGS[(i as usize + 3) % TAGS.len()]).unwrap();
        let question = draft.validate().unwrap();
        store
            .insert(question, author.clone(), now - Duration::minutes(i64::from(i)))
            .unwrap();
    }
    store
}

fn filter_and_sort(c: &mut Criterion) {
    let store = preseed_store();
    let spec = FilterSpec::of_type(FilterType::Trending)
        .with_tags([Tag::new("react").unwrap(), Tag::new("css").unwrap()])
        .with_search("question");

    c.bench_function("filter trending by tag and search", |b| {
        b.iter(|| query::filter(store.questions(), &spec).len());
    });

    let all = query::filter(store.questions(), &FilterSpec::default());
    c.bench_function("sort by newest", |b| {
        b.iter(|| query::sort(&all, SortKey::Newest).len());
    });
}

criterion_group!(benches, filter_and_sort);
criterion_main!(benches);
