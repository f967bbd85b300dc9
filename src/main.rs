//! Quiz Racer headless runner
//!
//! Drives one session at a fixed step with the autopilot steering and a
//! seeded "player" answering questions, then prints the result.
//!
//! Usage: `quiz-racer [seed] [easy|normal|hard]`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use quiz_racer::consts::SIM_DT_MS;
use quiz_racer::sim::{GameEvent, GamePhase, QuestionBank, TickInput};
use quiz_racer::{Difficulty, GameError, GameHost, RaceGame, Settings};

const QUESTIONS_JSON: &str = include_str!("../assets/questions.json");
const DEFAULT_SEED: u64 = 20_240_601;

/// Chance the simulated player picks the right option
const ANSWER_ACCURACY: f64 = 0.75;
/// Chance the simulated player lets the question time out
const TIMEOUT_CHANCE: f64 = 0.05;
/// Upper bound on ticks, in case the session never finishes
const MAX_TICKS: u32 = 100_000;

#[derive(Default)]
struct ConsoleHost {
    result: Option<(u64, u64)>,
    closed: bool,
}

impl GameHost for ConsoleHost {
    fn on_game_end(&mut self, score: u64, coins: u64) {
        println!("Game over: score {score}, coins {coins}");
        self.result = Some((score, coins));
    }

    fn on_close(&mut self) {
        self.closed = true;
    }
}

/// A pending answer: option to pick (`None` = let it time out) and ms left to think
struct PendingAnswer {
    selected: Option<usize>,
    delay_ms: u32,
}

fn main() -> Result<(), GameError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();

    log::info!(
        "Quiz Racer (headless) starting: seed {}, difficulty {}",
        seed,
        difficulty.as_str()
    );

    let settings = Settings::from_preset(difficulty);
    let bank = QuestionBank::from_json(QUESTIONS_JSON)?;
    let mut game = RaceGame::new(settings, bank, seed, ConsoleHost::default())?;
    let mut player = Pcg32::seed_from_u64(seed.rotate_left(17) ^ 0x5eed);

    game.start();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut pending: Option<PendingAnswer> = None;
    for _ in 0..MAX_TICKS {
        let snapshot = game.tick(&input, SIM_DT_MS);
        for event in &snapshot.events {
            match event {
                GameEvent::QuestionOpened { index } => {
                    pending = Some(choose_answer(&game, *index, &mut player));
                }
                GameEvent::QuestionAnswered {
                    correct,
                    wrong_streak,
                    ..
                } => println!(
                    "  answered {} (wrong streak {wrong_streak})",
                    if *correct { "correctly" } else { "wrongly" }
                ),
                GameEvent::TimeTick { seconds_left } if seconds_left % 10 == 0 => println!(
                    "  {seconds_left:>2}s left: distance {:.0}, score {}, speed {:.1}",
                    snapshot.distance, snapshot.score, snapshot.effective_speed
                ),
                _ => {}
            }
        }

        if snapshot.phase == GamePhase::Finished {
            break;
        }

        if snapshot.phase == GamePhase::QuestionOpen {
            if let Some(question) = &snapshot.question {
                if let Some(answer) = pending.as_mut() {
                    if answer.selected.is_some() && answer.delay_ms <= SIM_DT_MS {
                        println!("  Q: {} [{}]", question.prompt, question.topic);
                        game.answer_question(answer.selected);
                        pending = None;
                    } else {
                        answer.delay_ms = answer.delay_ms.saturating_sub(SIM_DT_MS);
                    }
                }
            }
        }
    }

    let session = game.session();
    println!(
        "Finished: {:?}, distance {:.0}, {} of {} questions correct",
        session.finish_reason, session.distance, session.correct_answers, session.questions_asked
    );

    game.close();
    if game.host().result.is_none() {
        log::warn!("Session closed before it finished");
    }
    log::debug!("Host closed: {}", game.host().closed);
    Ok(())
}

fn choose_answer(game: &RaceGame<ConsoleHost>, index: usize, rng: &mut Pcg32) -> PendingAnswer {
    let delay_ms = rng.random_range(300..4000);
    let Some(question) = game.simulation().bank().get(index) else {
        return PendingAnswer {
            selected: None,
            delay_ms,
        };
    };

    let selected = if rng.random_bool(TIMEOUT_CHANCE) {
        None
    } else if rng.random_bool(ANSWER_ACCURACY) {
        Some(question.correct_index)
    } else {
        let offset = rng.random_range(1..question.options.len());
        Some((question.correct_index + offset) % question.options.len())
    };
    PendingAnswer { selected, delay_ms }
}
