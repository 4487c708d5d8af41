use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizrush_core::parser::{parse_quiz_str, validate_quiz};
use quizrush_core::sample::{sample_quiz, SAMPLE_QUIZ_TOML};

fn large_quiz_toml(questions: usize) -> String {
    let mut toml = String::from("[quiz]\nname = \"Large\"\n");
    for i in 1..=questions {
        toml.push_str(&format!(
            "\n[[questions]]\nid = {i}\nprompt = \"Question {i}?\"\n\
             options = [\"a\", \"b\", \"c\", \"d\"]\ncorrect_option = {}\nmultiplier = 2\n",
            i % 4
        ));
    }
    toml
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_quiz");
    let large = large_quiz_toml(500);

    group.bench_function("sample", |b| {
        b.iter(|| parse_quiz_str(black_box(SAMPLE_QUIZ_TOML), Path::new("sample.toml")))
    });

    group.bench_function("500_questions", |b| {
        b.iter(|| parse_quiz_str(black_box(&large), Path::new("large.toml")))
    });

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let quiz = sample_quiz();
    c.bench_function("validate_sample", |b| b.iter(|| validate_quiz(black_box(&quiz))));
}

criterion_group!(benches, bench_parse, bench_validate);
criterion_main!(benches);
