use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::quiz::evaluator;
use crate::quiz::question::QuestionSet;
use crate::session::state::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerformanceGrade {
    Excellent,
    VeryGood,
    Good,
    Fair,
    NeedsImprovement,
}

impl PerformanceGrade {
    pub fn from_percentage(pct: u32) -> Self {
        match pct {
            90.. => PerformanceGrade::Excellent,
            80..=89 => PerformanceGrade::VeryGood,
            70..=79 => PerformanceGrade::Good,
            60..=69 => PerformanceGrade::Fair,
            _ => PerformanceGrade::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceGrade::Excellent => "Excellent",
            PerformanceGrade::VeryGood => "Very Good",
            PerformanceGrade::Good => "Good",
            PerformanceGrade::Fair => "Fair",
            PerformanceGrade::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// One recorded answer laid out for the review list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerReview {
    /// Position of the question in the set.
    pub index: usize,
    pub fragments: Vec<String>,
    pub selected: Vec<Option<String>>,
    pub correct: Vec<String>,
    pub blank_matches: Vec<bool>,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultsSummary {
    pub total_questions: usize,
    pub attempted_count: usize,
    pub correct_count: usize,
    pub score_percentage: u32,
    pub total_coins: u32,
    pub grade: PerformanceGrade,
    pub total_blanks: usize,
    pub correct_blanks: usize,
    pub blank_accuracy: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub reviews: Vec<AnswerReview>,
}

impl ResultsSummary {
    /// Answers whose question is not in `questions` are skipped.
    pub fn compute(questions: &QuestionSet, state: &SessionState) -> Self {
        let mut reviews: Vec<AnswerReview> = state
            .answers()
            .values()
            .filter_map(|answer| {
                let index = questions.position(&answer.question_id)?;
                let question = questions.get(index)?;
                Some(AnswerReview {
                    index,
                    fragments: question.fragments().into_iter().map(str::to_string).collect(),
                    selected: answer.selected_answers.clone(),
                    correct: question.correct_answer.clone(),
                    blank_matches: evaluator::blank_matches(
                        &answer.selected_answers,
                        &question.correct_answer,
                    ),
                    is_correct: answer.is_correct,
                })
            })
            .collect();
        reviews.sort_by_key(|r| r.index);

        let attempted_count = reviews.len();
        let correct_count = reviews.iter().filter(|r| r.is_correct).count();
        let score_percentage = if attempted_count == 0 {
            0
        } else {
            (100.0 * correct_count as f64 / attempted_count as f64).round() as u32
        };

        let total_blanks: usize = reviews.iter().map(|r| r.fragments.len() - 1).sum();
        let correct_blanks: usize = reviews
            .iter()
            .map(|r| r.blank_matches.iter().filter(|&&m| m).count())
            .sum();
        let blank_accuracy = if total_blanks == 0 {
            0.0
        } else {
            correct_blanks as f64 / total_blanks as f64 * 100.0
        };

        Self {
            total_questions: questions.len(),
            attempted_count,
            correct_count,
            score_percentage,
            total_coins: correct_count as u32,
            grade: PerformanceGrade::from_percentage(score_percentage),
            total_blanks,
            correct_blanks,
            blank_accuracy,
            started_at: state.started_at(),
            finished_at: state.finished_at(),
            reviews,
        }
    }

    pub fn elapsed_secs(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_seconds().max(0)),
            _ => None,
        }
    }

    /// Plain-text body for the email stub.
    pub fn to_plain_text(&self, user_name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Results for {user_name}");
        let _ = writeln!(
            out,
            "Score: {}/{} ({}%) - {}",
            self.correct_count,
            self.attempted_count,
            self.score_percentage,
            self.grade.label()
        );
        let _ = writeln!(out, "Coins earned: {}", self.total_coins);
        let _ = writeln!(
            out,
            "Blank accuracy: {}/{} ({:.1}%)",
            self.correct_blanks, self.total_blanks, self.blank_accuracy
        );
        if let Some(secs) = self.elapsed_secs() {
            let _ = writeln!(out, "Time: {}m {:02}s", secs / 60, secs % 60);
        }
        for review in &self.reviews {
            let mark = if review.is_correct { "correct" } else { "incorrect" };
            let slots: Vec<Option<&str>> = review.selected.iter().map(|s| s.as_deref()).collect();
            let fragments: Vec<&str> = review.fragments.iter().map(String::as_str).collect();
            let _ = writeln!(
                out,
                "Q{} [{mark}]: {}",
                review.index + 1,
                crate::quiz::sentence::fill_sentence(&fragments, &slots, "____")
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::quiz::question::Question;
    use crate::quiz::sentence::BLANK_MARKER;
    use crate::session::state::UserAnswer;

    fn questions(count: usize) -> QuestionSet {
        QuestionSet::new(
            (0..count)
                .map(|i| Question {
                    question_id: format!("q{i}"),
                    template: format!("A {BLANK_MARKER} B {BLANK_MARKER} C"),
                    options: vec!["x".to_string(), "y".to_string()],
                    correct_answer: vec!["x".to_string(), "y".to_string()],
                })
                .collect(),
        )
        .unwrap()
    }

    fn answer(id: &str, words: [Option<&str>; 2]) -> UserAnswer {
        let selected: Vec<Option<String>> = words.iter().map(|w| w.map(str::to_string)).collect();
        let is_correct = selected == vec![Some("x".to_string()), Some("y".to_string())];
        UserAnswer {
            question_id: id.to_string(),
            selected_answers: selected,
            is_correct,
            answered_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_session_scores_zero() {
        let summary = ResultsSummary::compute(&questions(10), &SessionState::default());
        assert_eq!(summary.attempted_count, 0);
        assert_eq!(summary.score_percentage, 0);
        assert_eq!(summary.total_coins, 0);
        assert_eq!(summary.blank_accuracy, 0.0);
        assert_eq!(summary.grade, PerformanceGrade::NeedsImprovement);
    }

    #[test]
    fn test_percentage_over_attempted_only() {
        let mut state = SessionState::default();
        state.record(answer("q0", [Some("x"), Some("y")]), 1);
        state.record(answer("q1", [Some("x"), Some("y")]), 2);
        state.record(answer("q2", [Some("y"), None]), 3);
        let summary = ResultsSummary::compute(&questions(10), &state);
        assert_eq!(summary.total_questions, 10);
        assert_eq!(summary.attempted_count, 3);
        assert_eq!(summary.correct_count, 2);
        assert_eq!(summary.score_percentage, 67);
        assert_eq!(summary.total_coins, 2);
        assert_eq!(summary.grade, PerformanceGrade::Fair);
        assert_eq!(summary.total_blanks, 6);
        assert_eq!(summary.correct_blanks, 4);
    }

    #[test]
    fn test_unknown_question_is_skipped() {
        let mut state = SessionState::default();
        state.record(answer("q0", [Some("x"), Some("y")]), 1);
        state.record(answer("gone", [Some("x"), Some("y")]), 2);
        let summary = ResultsSummary::compute(&questions(2), &state);
        assert_eq!(summary.attempted_count, 1);
        assert_eq!(summary.reviews.len(), 1);
        assert_eq!(summary.score_percentage, 100);
    }

    #[test]
    fn test_reviews_follow_question_order() {
        let mut state = SessionState::default();
        state.record(answer("q2", [Some("x"), Some("y")]), 3);
        state.record(answer("q0", [Some("y"), Some("y")]), 3);
        let summary = ResultsSummary::compute(&questions(3), &state);
        let order: Vec<usize> = summary.reviews.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 2]);
        assert_eq!(summary.reviews[0].blank_matches, vec![false, true]);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(PerformanceGrade::from_percentage(100), PerformanceGrade::Excellent);
        assert_eq!(PerformanceGrade::from_percentage(90), PerformanceGrade::Excellent);
        assert_eq!(PerformanceGrade::from_percentage(89), PerformanceGrade::VeryGood);
        assert_eq!(PerformanceGrade::from_percentage(80), PerformanceGrade::VeryGood);
        assert_eq!(PerformanceGrade::from_percentage(70), PerformanceGrade::Good);
        assert_eq!(PerformanceGrade::from_percentage(60), PerformanceGrade::Fair);
        assert_eq!(PerformanceGrade::from_percentage(59), PerformanceGrade::NeedsImprovement);
        assert_eq!(PerformanceGrade::from_percentage(0).label(), "Needs Improvement");
    }

    #[test]
    fn test_plain_text_mentions_score_and_name() {
        let mut state = SessionState::default();
        state.record(answer("q0", [Some("x"), None]), 1);
        let text = ResultsSummary::compute(&questions(1), &state).to_plain_text("Ada");
        assert!(text.contains("Results for Ada"));
        assert!(text.contains("Score: 0/1 (0%)"));
        assert!(text.contains("Q1 [incorrect]: A x B ____ C"));
    }
}
