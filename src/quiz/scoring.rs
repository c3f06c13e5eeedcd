//! Final scoring and answer review

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::Quiz;

/// Committed answers: question index -> option index
pub type AnswerMap = BTreeMap<usize, usize>;

/// Review entry for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    /// Zero-based question index
    pub index: usize,
    /// The question text
    pub question: String,
    /// Option the user committed, if any
    pub chosen_index: Option<usize>,
    /// Text of the committed option, if any
    pub chosen_text: Option<String>,
    /// Index of the correct option
    pub correct_index: usize,
    /// Text of the correct option
    pub correct_text: String,
    /// Whether the committed option is the correct one
    pub is_correct: bool,
    /// Explanation from the content source
    pub explanation: Option<String>,
}

impl QuestionReview {
    /// Whether the question was left unanswered
    pub fn is_answered(&self) -> bool {
        self.chosen_index.is_some()
    }

    /// The user's answer for display
    pub fn chosen_display(&self) -> &str {
        match (&self.chosen_index, &self.chosen_text) {
            (Some(_), Some(text)) => text.as_str(),
            (Some(_), None) => "(invalid option)",
            (None, _) => "Not answered",
        }
    }
}

/// Outcome of a finished quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Topic of the quiz
    pub topic: String,
    /// Number of correct answers
    pub correct_count: usize,
    /// Number of questions
    pub total: usize,
    /// Rounded percentage, half rounds up
    pub percentage: u32,
    /// One entry per question, in quiz order
    pub per_question: Vec<QuestionReview>,
}

impl ScoreSummary {
    /// Number of questions with a committed answer
    pub fn answered_count(&self) -> usize {
        self.per_question.iter().filter(|q| q.is_answered()).count()
    }

    /// Whether the percentage meets `threshold`
    pub fn passed(&self, threshold: u32) -> bool {
        self.percentage >= threshold
    }
}

/// `round(correct / total * 100)` with halves rounding up
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct * 200 + total) / (total * 2)) as u32
}

/// Score a quiz against the committed answers
pub fn score(quiz: &Quiz, answers: &AnswerMap) -> ScoreSummary {
    let per_question: Vec<QuestionReview> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let chosen_index = answers.get(&index).copied();
            QuestionReview {
                index,
                question: question.question.clone(),
                chosen_index,
                chosen_text: chosen_index.and_then(|i| question.options.get(i).cloned()),
                correct_index: question.correct_index,
                correct_text: question.correct_option().unwrap_or_default().to_string(),
                is_correct: chosen_index == Some(question.correct_index),
                explanation: question.explanation.clone(),
            }
        })
        .collect();

    let correct_count = per_question.iter().filter(|q| q.is_correct).count();
    let total = quiz.questions.len();

    ScoreSummary {
        topic: quiz.topic.clone(),
        correct_count,
        total,
        percentage: percentage(correct_count, total),
        per_question,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::model::Question;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn three_questions() -> Quiz {
        Quiz::new(
            "Chemistry",
            vec![
                Question::new("H2O is?", ["Water", "Salt", "Sugar"], 0)
                    .with_explanation("Two hydrogens, one oxygen."),
                Question::new("Na is?", ["Neon", "Sodium"], 1),
                Question::new("Noble gas?", ["Argon", "Iron", "Zinc", "Lead"], 0),
            ],
        )
    }

    #[test]
    fn counts_only_exact_matches() {
        let quiz = three_questions();
        let answers = AnswerMap::from([(0, 0), (1, 0)]);

        let summary = score(&quiz, &answers);
        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.percentage, 33);
        assert_eq!(summary.answered_count(), 2);
    }

    #[test]
    fn unanswered_questions_are_marked() {
        let quiz = three_questions();
        let summary = score(&quiz, &AnswerMap::new());

        assert_eq!(summary.correct_count, 0);
        assert_eq!(summary.percentage, 0);
        for review in &summary.per_question {
            assert!(!review.is_answered());
            assert!(!review.is_correct);
            assert_eq!(review.chosen_display(), "Not answered");
        }
    }

    #[test]
    fn review_carries_texts_and_explanation() {
        let quiz = three_questions();
        let summary = score(&quiz, &AnswerMap::from([(0, 1)]));

        assert_eq!(
            summary.per_question[0],
            QuestionReview {
                index: 0,
                question: "H2O is?".into(),
                chosen_index: Some(1),
                chosen_text: Some("Salt".into()),
                correct_index: 0,
                correct_text: "Water".into(),
                is_correct: false,
                explanation: Some("Two hydrogens, one oxygen.".into()),
            }
        );
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 200), 1); // 0.5
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn out_of_range_answer_never_counts() {
        let quiz = three_questions();
        let summary = score(&quiz, &AnswerMap::from([(1, 9)]));
        assert_eq!(summary.correct_count, 0);
        assert_eq!(summary.per_question[1].chosen_display(), "(invalid option)");
    }

    fn arb_quiz_and_answers() -> impl Strategy<Value = (Quiz, AnswerMap)> {
        prop::collection::vec((2usize..6, any::<prop::sample::Index>()), 1..12)
            .prop_flat_map(|shapes| {
                let quiz = Quiz::new(
                    "Generated",
                    shapes
                        .iter()
                        .enumerate()
                        .map(|(i, (count, correct))| {
                            let options: Vec<String> =
                                (0..*count).map(|o| format!("q{i} option {o}")).collect();
                            Question::new(format!("Question {i}"), options, correct.index(*count))
                        })
                        .collect(),
                );
                let answer_strategies: Vec<_> = shapes
                    .iter()
                    .map(|(count, _)| prop::option::of(0..*count))
                    .collect();
                (Just(quiz), answer_strategies)
            })
            .prop_map(|(quiz, picks)| {
                let answers = picks
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, pick)| pick.map(|p| (i, p)))
                    .collect();
                (quiz, answers)
            })
    }

    proptest! {
        #[test]
        fn scoring_is_deterministic((quiz, answers) in arb_quiz_and_answers()) {
            prop_assert_eq!(score(&quiz, &answers), score(&quiz, &answers));
        }

        #[test]
        fn correct_count_matches_review((quiz, answers) in arb_quiz_and_answers()) {
            let summary = score(&quiz, &answers);
            let expected = answers
                .iter()
                .filter(|&(&i, &pick)| quiz.questions[i].correct_index == pick)
                .count();
            prop_assert_eq!(summary.correct_count, expected);
            prop_assert_eq!(summary.per_question.len(), quiz.len());
            prop_assert!(summary.percentage <= 100);
            prop_assert_eq!(summary.answered_count(), answers.len());
        }

        #[test]
        fn percentage_is_nearest_integer(correct in 0usize..500, extra in 0usize..500) {
            let total = correct + extra;
            prop_assume!(total > 0);
            let exact = correct as f64 * 100.0 / total as f64;
            let got = percentage(correct, total) as f64;
            prop_assert!((got - exact).abs() <= 0.5);
        }
    }
}
