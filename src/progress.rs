/*!
 * Learner progress tracking.
 *
 * Each answer updates one (user, verb, skill, pronoun) record: correct
 * answers extend the streak, a wrong answer resets it. A record counts as
 * mastered once the streak reaches [`STREAK_TO_MASTER`].
 */

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::database::{ProgressKey, ProgressRecord, Repository, SkillSummary};
use crate::errors::ProgressError;
use crate::grammar::{Pronoun, SkillType};

/// Consecutive correct answers required for mastery
pub const STREAK_TO_MASTER: u32 = 5;

/// Source of answer timestamps
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn apply_correct(record: &mut ProgressRecord, now: DateTime<Utc>) {
    record.correct_count += 1;
    record.streak += 1;
    if record.streak >= STREAK_TO_MASTER {
        record.mastered = true;
    }
    record.last_answer_at = Some(now);
    record.updated_at = now;
}

fn apply_wrong(record: &mut ProgressRecord, now: DateTime<Utc>) {
    record.wrong_count += 1;
    record.streak = 0;
    record.mastered = false;
    record.last_answer_at = Some(now);
    record.updated_at = now;
}

/// Updates progress records after each answer
pub struct ProgressTracker<C = SystemClock> {
    repo: Repository,
    clock: C,
}

impl ProgressTracker<SystemClock> {
    pub fn new(repo: Repository) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<C: Clock> ProgressTracker<C> {
    pub fn with_clock(repo: Repository, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Get the record for the key, creating a zeroed one on first practice
    pub fn get_or_create(
        &self,
        user_id: &str,
        verb_id: i64,
        skill_type: SkillType,
        pronoun: Option<Pronoun>,
    ) -> Result<ProgressRecord, ProgressError> {
        match (skill_type.is_pronoun_specific(), pronoun) {
            (true, None) => {
                return Err(ProgressError::InvalidKey(format!(
                    "skill '{}' requires a pronoun",
                    skill_type
                )));
            }
            (false, Some(p)) => {
                return Err(ProgressError::InvalidKey(format!(
                    "skill '{}' is not pronoun-specific (got '{}')",
                    skill_type, p
                )));
            }
            _ => {}
        }

        let key = ProgressKey {
            user_id: user_id.to_string(),
            verb_id,
            skill_type,
            pronoun,
        };

        let (record, created) = self.repo.get_or_create_progress(&key, self.clock.now())?;
        if created {
            debug!(
                "Created progress record {} for {} / verb {} / {} / {}",
                record.id,
                user_id,
                verb_id,
                skill_type,
                pronoun.map_or("-", |p| p.as_str())
            );
        }
        Ok(record)
    }

    /// Register a correct answer and persist the changed fields
    pub fn register_correct(&self, record: &mut ProgressRecord) -> Result<(), ProgressError> {
        let was_mastered = record.mastered;
        apply_correct(record, self.clock.now());

        if self.repo.save_correct_answer(record)? == 0 {
            return Err(ProgressError::MissingRecord(record.id));
        }

        if record.mastered && !was_mastered {
            info!(
                "{} mastered verb {} ({}) after a streak of {}",
                record.user_id, record.verb_id, record.skill_type, record.streak
            );
        }
        Ok(())
    }

    /// Register a wrong answer and persist the changed fields
    pub fn register_wrong(&self, record: &mut ProgressRecord) -> Result<(), ProgressError> {
        apply_wrong(record, self.clock.now());

        if self.repo.save_wrong_answer(record)? == 0 {
            return Err(ProgressError::MissingRecord(record.id));
        }
        Ok(())
    }

    /// Look up (or create) the record for the key and register one answer
    pub fn record_answer(
        &self,
        user_id: &str,
        verb_id: i64,
        skill_type: SkillType,
        pronoun: Option<Pronoun>,
        correct: bool,
    ) -> Result<ProgressRecord, ProgressError> {
        let mut record = self.get_or_create(user_id, verb_id, skill_type, pronoun)?;
        if correct {
            self.register_correct(&mut record)?;
        } else {
            self.register_wrong(&mut record)?;
        }
        Ok(record)
    }

    /// Tracked and mastered record counts per skill
    pub fn summary(&self, user_id: &str) -> Result<Vec<SkillSummary>, ProgressError> {
        Ok(self.repo.progress_summary(user_id)?)
    }
}
