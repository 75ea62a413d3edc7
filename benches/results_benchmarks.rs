use chrono::Utc;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use clozer::quiz::question::{Question, QuestionSet};
use clozer::quiz::results::ResultsSummary;
use clozer::quiz::sentence::{BLANK_MARKER, parse_sentence};
use clozer::session::state::{SessionState, UserAnswer};

const BLANKS: usize = 4;

fn make_questions(count: usize) -> QuestionSet {
    let words: Vec<String> = (0..BLANKS + 2).map(|i| format!("word{i}")).collect();
    QuestionSet::new(
        (0..count)
            .map(|i| {
                let mut template = String::from("The sentence");
                for _ in 0..BLANKS {
                    template.push_str(&format!(" keeps {BLANK_MARKER} going"));
                }
                Question {
                    question_id: format!("q{i}"),
                    template,
                    options: words.clone(),
                    correct_answer: words[..BLANKS].to_vec(),
                }
            })
            .collect(),
    )
    .unwrap_or_else(|e| panic!("synthetic set is invalid: {e}"))
}

fn make_state(questions: &QuestionSet) -> SessionState {
    let mut state = SessionState::default();
    for (i, question) in questions.iter().enumerate() {
        // every third answer has its first two blanks swapped
        let mut selected: Vec<Option<String>> =
            question.correct_answer.iter().cloned().map(Some).collect();
        if i % 3 == 0 {
            selected.swap(0, 1);
        }
        let mut answer = UserAnswer::evaluate(question, selected);
        answer.answered_at = Utc::now();
        state.record(answer, i + 1);
    }
    state
}

fn bench_parse(c: &mut Criterion) {
    let questions = make_questions(1000);

    c.bench_function("parse_sentence (1000 templates)", |b| {
        b.iter(|| {
            questions
                .iter()
                .map(|q| parse_sentence(black_box(&q.template)).len())
                .sum::<usize>()
        })
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let questions = make_questions(1000);
    let state = make_state(&questions);

    c.bench_function("ResultsSummary::compute (1000 answers)", |b| {
        b.iter(|| ResultsSummary::compute(black_box(&questions), black_box(&state)))
    });
}

criterion_group!(benches, bench_parse, bench_aggregate);
criterion_main!(benches);
