//! Questionnaire runner - steps through a fixed, ordered question list.

use std::collections::HashSet;

use super::answers::AnswerSet;
use super::question::Question;

/// Errors raised by the questionnaire runner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("Question list contains duplicate id {0}")]
    DuplicateQuestion(u32),

    #[error("No question at position {index} (questionnaire has {total})")]
    QuestionNotFound { index: usize, total: usize },

    #[error("'{option}' is not an option for question {question}")]
    InvalidOption { question: u32, option: String },

    #[error("Questionnaire already submitted")]
    AlreadySubmitted,
}

/// What the presentation layer should show right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionView<'a> {
    /// A question is ready to be answered. `position` is 1-based.
    Active {
        question: &'a Question,
        position: usize,
        total: usize,
    },
    /// The cursor does not point at a question (empty list or bad index).
    NotFound { index: usize, total: usize },
    /// All questions have been answered and submitted.
    Completed,
}

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The next question is now current. `position` is 1-based.
    Advanced { position: usize },
    /// The last question was answered; the full answer set is handed out once.
    Completed(AnswerSet),
}

/// Presents one question at a time and accumulates answers.
///
/// # Invariants
///
/// - Each question id maps to exactly one answer
/// - `Completed` is produced exactly once, on the final question
/// - A rejected answer leaves the runner unchanged
#[derive(Debug, Clone)]
pub struct QuestionnaireRunner {
    questions: Vec<Question>,
    index: usize,
    answers: AnswerSet,
    submitted: bool,
}

impl QuestionnaireRunner {
    /// Creates a runner positioned at the first question.
    ///
    /// An empty list is accepted and yields a `NotFound` view.
    ///
    /// # Errors
    ///
    /// - `DuplicateQuestion` if two questions share an id
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionnaireError> {
        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(q.id) {
                return Err(QuestionnaireError::DuplicateQuestion(q.id.value()));
            }
        }
        Ok(Self {
            questions,
            index: 0,
            answers: AnswerSet::new(),
            submitted: false,
        })
    }

    /// Moves the cursor. Out-of-range positions are allowed and show `NotFound`.
    pub fn seek(&mut self, index: usize) {
        if !self.submitted {
            self.index = index;
        }
    }

    /// Current view.
    pub fn current(&self) -> QuestionView<'_> {
        if self.submitted {
            return QuestionView::Completed;
        }
        match self.questions.get(self.index) {
            Some(question) => QuestionView::Active {
                question,
                position: self.index + 1,
                total: self.questions.len(),
            },
            None => QuestionView::NotFound {
                index: self.index,
                total: self.questions.len(),
            },
        }
    }

    /// Answers collected so far.
    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Total number of questions.
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true once the answer set has been handed out.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Records `option` for the current question and advances.
    ///
    /// # Errors
    ///
    /// - `AlreadySubmitted` after completion
    /// - `QuestionNotFound` if the cursor is out of range
    /// - `InvalidOption` if `option` is not offered by the current question
    pub fn answer(&mut self, option: &str) -> Result<AnswerOutcome, QuestionnaireError> {
        if self.submitted {
            return Err(QuestionnaireError::AlreadySubmitted);
        }
        let question = self.questions.get(self.index).ok_or(QuestionnaireError::QuestionNotFound {
            index: self.index,
            total: self.questions.len(),
        })?;
        if !question.offers(option) {
            return Err(QuestionnaireError::InvalidOption {
                question: question.id.value(),
                option: option.to_string(),
            });
        }

        self.answers.record(question.id, option);

        if self.index + 1 < self.questions.len() {
            self.index += 1;
            Ok(AnswerOutcome::Advanced {
                position: self.index + 1,
            })
        } else {
            self.submitted = true;
            Ok(AnswerOutcome::Completed(self.answers.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questionnaire::{default_questions, QuestionCategory};
    use proptest::prelude::*;

    fn two_questions() -> Vec<Question> {
        vec![
            Question::new(1, "First?", ["a", "b"], QuestionCategory::Lifestyle),
            Question::new(2, "Second?", ["c", "d"], QuestionCategory::Lifestyle),
        ]
    }

    #[test]
    fn starts_at_first_question() {
        let runner = QuestionnaireRunner::new(two_questions()).unwrap();
        match runner.current() {
            QuestionView::Active { question, position, total } => {
                assert_eq!(question.prompt, "First?");
                assert_eq!(position, 1);
                assert_eq!(total, 2);
            }
            other => panic!("expected active view, got {:?}", other),
        }
    }

    #[test]
    fn empty_list_degrades_to_not_found() {
        let mut runner = QuestionnaireRunner::new(Vec::new()).unwrap();
        assert_eq!(runner.current(), QuestionView::NotFound { index: 0, total: 0 });
        assert_eq!(
            runner.answer("a"),
            Err(QuestionnaireError::QuestionNotFound { index: 0, total: 0 })
        );
        assert!(runner.answers().is_empty());
    }

    #[test]
    fn out_of_range_index_does_not_corrupt_state() {
        let mut runner = QuestionnaireRunner::new(two_questions()).unwrap();
        runner.answer("a").unwrap();
        runner.seek(9);

        assert_eq!(runner.current(), QuestionView::NotFound { index: 9, total: 2 });
        assert!(runner.answer("c").is_err());
        assert_eq!(runner.answers().len(), 1);
        assert!(!runner.is_submitted());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut questions = two_questions();
        questions[1].id = questions[0].id;
        assert_eq!(
            QuestionnaireRunner::new(questions).unwrap_err(),
            QuestionnaireError::DuplicateQuestion(1)
        );
    }

    #[test]
    fn rejects_option_not_offered() {
        let mut runner = QuestionnaireRunner::new(two_questions()).unwrap();
        let err = runner.answer("z").unwrap_err();
        assert!(matches!(err, QuestionnaireError::InvalidOption { question: 1, .. }));
        assert!(runner.answers().is_empty());
    }

    #[test]
    fn completes_on_final_question_with_all_answers() {
        let mut runner = QuestionnaireRunner::new(two_questions()).unwrap();
        assert_eq!(runner.answer("b"), Ok(AnswerOutcome::Advanced { position: 2 }));

        match runner.answer("c").unwrap() {
            AnswerOutcome::Completed(answers) => {
                assert_eq!(answers.len(), 2);
                assert_eq!(answers.iter().collect::<Vec<_>>(), vec![("question1", "b"), ("question2", "c")]);
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert_eq!(runner.current(), QuestionView::Completed);
        assert_eq!(runner.answer("c"), Err(QuestionnaireError::AlreadySubmitted));
    }

    #[test]
    fn default_catalog_runs_to_completion() {
        let mut runner = QuestionnaireRunner::new(default_questions()).unwrap();
        let mut completed = None;
        while let QuestionView::Active { question, .. } = runner.current() {
            let option = question.options[0].clone();
            if let AnswerOutcome::Completed(answers) = runner.answer(&option).unwrap() {
                completed = Some(answers);
            }
        }
        assert_eq!(completed.map(|a| a.len()), Some(10));
    }

    proptest! {
        #[test]
        fn every_question_answered_once_and_submitted_once(
            choices in prop::collection::vec(0usize..4, 1..15)
        ) {
            let questions: Vec<Question> = (0..choices.len())
                .map(|i| Question::new(
                    i as u32 + 1,
                    format!("Q{}", i + 1),
                    ["w", "x", "y", "z"],
                    QuestionCategory::Lifestyle,
                ))
                .collect();
            let options = ["w", "x", "y", "z"];
            let mut runner = QuestionnaireRunner::new(questions).unwrap();
            let mut submissions = Vec::new();

            for (step, choice) in choices.iter().enumerate() {
                if let AnswerOutcome::Completed(answers) = runner.answer(options[*choice]).unwrap() {
                    submissions.push((step, answers));
                }
            }

            prop_assert_eq!(submissions.len(), 1);
            let (step, answers) = &submissions[0];
            prop_assert_eq!(*step, choices.len() - 1);
            prop_assert_eq!(answers.len(), choices.len());
        }
    }
}
