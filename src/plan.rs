use serde::{Deserialize, Serialize};

/// The shape of a workout: how long each phase lasts and how many
/// times the work/rest cycle repeats. Immutable once handed to a
/// running timer; replacing it resets the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub work_secs: u32,
    pub rest_secs: u32,
    pub round_rest_secs: u32,
    pub exercises_per_round: u32,
    pub rounds: u32,
}

impl Default for WorkoutPlan {
    fn default() -> Self {
        Self {
            work_secs: 10,
            rest_secs: 5,
            round_rest_secs: 30,
            exercises_per_round: 3,
            rounds: 2,
        }
    }
}

impl WorkoutPlan {
    /// Clamp every field up to 1 so a plan built from arbitrary input
    /// always satisfies the positive-duration invariant.
    pub fn normalized(self) -> Self {
        Self {
            work_secs: self.work_secs.max(1),
            rest_secs: self.rest_secs.max(1),
            round_rest_secs: self.round_rest_secs.max(1),
            exercises_per_round: self.exercises_per_round.max(1),
            rounds: self.rounds.max(1),
        }
    }

    /// Total scheduled duration of the whole workout in seconds.
    /// Computed in u64 with saturation; the fields carry no upper
    /// bound, so u32 products can overflow.
    pub fn total_secs(&self) -> u64 {
        let per_round = (u64::from(self.work_secs) + u64::from(self.rest_secs))
            .saturating_mul(u64::from(self.exercises_per_round));
        per_round
            .saturating_mul(u64::from(self.rounds))
            .saturating_add(
                u64::from(self.round_rest_secs).saturating_mul(u64::from(self.rounds - 1)),
            )
    }
}
