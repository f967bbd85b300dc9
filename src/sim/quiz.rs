//! Quiz interrupts
//!
//! Distance milestones open a timed multiple-choice question. The question bank
//! is read-only reference data supplied by the host; this module only picks
//! from it and works out what an answer is worth.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scheduler::TimerId;
use crate::consts::MAX_WRONG_ANSWERS;
use crate::error::BankError;
use crate::settings::Settings;

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub topic: String,
}

impl Question {
    /// `None` (timeout) and out-of-range indices are simply wrong
    pub fn is_correct(&self, selected: Option<usize>) -> bool {
        selected == Some(self.correct_index)
    }

    fn check(&self, index: usize) -> Result<(), BankError> {
        let count = self.options.len();
        if count < 2 {
            return Err(BankError::TooFewOptions { index, count });
        }
        if self.correct_index >= count {
            return Err(BankError::CorrectIndexOutOfRange {
                index,
                correct: self.correct_index,
                count,
            });
        }
        Ok(())
    }
}

/// Validated, immutable set of questions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        for (index, question) in questions.iter().enumerate() {
            question.check(index)?;
        }
        Ok(Self { questions })
    }

    /// Parse a JSON array of questions
    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Uniformly random question index (repeats are allowed)
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.questions.is_empty() {
            None
        } else {
            Some(rng.random_range(0..self.questions.len()))
        }
    }
}

/// The question currently on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenQuestion {
    /// Index into the bank
    pub index: usize,
    pub seconds_left: u32,
    /// Countdown timer this question was opened with
    #[serde(skip)]
    pub timer: Option<TimerId>,
}

/// Tracks the next distance at which a question opens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Milestones {
    every: f32,
    next_at: f32,
}

impl Milestones {
    pub fn new(every: f32) -> Self {
        Self {
            every,
            next_at: every,
        }
    }

    pub fn next_at(&self) -> f32 {
        self.next_at
    }

    /// Whether `distance` crossed a milestone since the last call.
    ///
    /// Several boundaries crossed at once still count as one crossing.
    pub fn crossed(&mut self, distance: f32) -> bool {
        if distance < self.next_at {
            return false;
        }
        let every = f64::from(self.every);
        let boundaries = (f64::from(distance) / every).floor() + 1.0;
        let mut next_at = (boundaries * every) as f32;
        if next_at <= distance {
            // Step too small to register at this distance in f32
            next_at = distance + self.every.max(distance * f32::EPSILON);
        }
        self.next_at = next_at;
        true
    }
}

/// What answering a question does to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub correct: bool,
    /// New base speed, already clamped
    pub speed: f32,
    pub points: u64,
    pub wrong_streak: u8,
    /// Streak reached the limit; the session ends
    pub finishes: bool,
}

/// Work out the effect of answering `question` with `selected`
pub fn resolve(
    question: &Question,
    selected: Option<usize>,
    speed: f32,
    wrong_streak: u8,
    settings: &Settings,
) -> Resolution {
    let correct = question.is_correct(selected);
    let clamp = |s: f32| s.clamp(settings.min_speed, settings.max_speed);

    if correct {
        Resolution {
            correct,
            speed: clamp(speed + settings.answer_speed_delta),
            points: settings.correct_answer_points,
            wrong_streak: 0,
            finishes: false,
        }
    } else {
        let wrong_streak = wrong_streak.saturating_add(1);
        Resolution {
            correct,
            speed: clamp(speed - settings.answer_speed_delta),
            points: 0,
            wrong_streak,
            finishes: wrong_streak >= MAX_WRONG_ANSWERS,
        }
    }
}
