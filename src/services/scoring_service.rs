use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::models::answer::SubmittedAnswer;
use crate::models::question::Question;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub score: i32,
    pub max_score: i32,
    pub percentage: f64,
    pub passed: bool,
}

pub struct ScoringService;

impl ScoringService {
    /// Grades a submission against a test's questions.
    ///
    /// A question counts as correct when the submitted option set equals the
    /// key set exactly. For single-choice questions the key is one index and
    /// this degenerates to an exact match; for multiple-choice the key is a
    /// comma-joined index set and order does not matter. Unanswered questions
    /// earn nothing.
    ///
    /// A test whose questions carry zero total points is never passed and its
    /// percentage reports as 0.
    pub fn score(
        questions: &[Question],
        answers: &HashMap<Uuid, SubmittedAnswer>,
        passing_score: f64,
    ) -> ScoreOutcome {
        let mut score: i32 = 0;
        let mut max_score: i32 = 0;

        for question in questions {
            max_score += question.points;
            let Some(answer) = answers.get(&question.id) else {
                continue;
            };
            if answer.as_key_set() == Self::key_set(&question.correct_key) {
                score += question.points;
            }
        }

        let percentage = if max_score > 0 {
            score as f64 / max_score as f64 * 100.0
        } else {
            0.0
        };
        let passed = max_score > 0 && percentage >= passing_score;

        ScoreOutcome {
            score,
            max_score,
            percentage,
            passed,
        }
    }

    fn key_set(correct_key: &str) -> BTreeSet<&str> {
        correct_key
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect()
    }
}
