use crate::plan::WorkoutPlan;

/// One timed segment of the workout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Work,
    Rest,
    #[strum(serialize = "Round Rest")]
    RoundRest,
    Finished,
}

/// Emitted by [`Timer::tick`] when a countdown reaches zero and the
/// machine moves to the next phase. Consumed by the session layer for
/// announcement dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    pub to_phase: Phase,
    pub announcement: String,
    pub exercise_index: u32,
    pub round_index: u32,
}

/// The countdown state machine. Holds the one live session state for
/// the active plan; mutated only through `tick`, `reset`, `apply_plan`
/// and the `start`/`pause` switches.
#[derive(Debug)]
pub struct Timer {
    plan: WorkoutPlan,
    pub phase: Phase,
    pub exercise_index: u32,
    pub round_index: u32,
    pub remaining_secs: u32,
    pub running: bool,
    pub finished: bool,
}

impl Timer {
    pub fn new(plan: WorkoutPlan) -> Self {
        let plan = plan.normalized();
        Self {
            plan,
            phase: Phase::Work,
            exercise_index: 1,
            round_index: 1,
            remaining_secs: plan.work_secs,
            running: false,
            finished: false,
        }
    }

    pub fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    /// Full length of the phase currently counting down.
    pub fn phase_secs(&self) -> u32 {
        match self.phase {
            Phase::Work => self.plan.work_secs,
            Phase::Rest => self.plan.rest_secs,
            Phase::RoundRest => self.plan.round_rest_secs,
            Phase::Finished => 0,
        }
    }

    /// True until the first tick or transition happens under the
    /// current plan.
    pub fn is_fresh(&self) -> bool {
        self.phase == Phase::Work
            && self.exercise_index == 1
            && self.round_index == 1
            && self.remaining_secs == self.plan.work_secs
            && !self.finished
    }

    pub fn start(&mut self) {
        if !self.finished {
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Consume one second of running time. A no-op while paused or
    /// after the workout finished. Fires at most one transition per
    /// call, on the tick where the countdown would cross zero.
    pub fn tick(&mut self) -> Option<TransitionEvent> {
        if !self.running || self.finished {
            return None;
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }
        self.advance()
    }

    /// Return to the initial state for the active plan. Always
    /// succeeds; the caller owns stopping any external tick source.
    pub fn reset(&mut self) {
        self.phase = Phase::Work;
        self.exercise_index = 1;
        self.round_index = 1;
        self.remaining_secs = self.plan.work_secs;
        self.running = false;
        self.finished = false;
    }

    /// Swap in a new plan and restart from its initial state. The
    /// session state is never consistent with more than one plan.
    pub fn apply_plan(&mut self, plan: WorkoutPlan) {
        self.plan = plan.normalized();
        self.reset();
    }

    fn advance(&mut self) -> Option<TransitionEvent> {
        match self.phase {
            Phase::Work => {
                self.phase = Phase::Rest;
                self.remaining_secs = self.plan.rest_secs;
                Some(self.transition("Rest".to_string()))
            }
            Phase::Rest => {
                if self.exercise_index < self.plan.exercises_per_round {
                    self.exercise_index += 1;
                    self.phase = Phase::Work;
                    self.remaining_secs = self.plan.work_secs;
                    Some(self.transition(format!("Exercise {}. Work", self.exercise_index)))
                } else if self.round_index < self.plan.rounds {
                    self.phase = Phase::RoundRest;
                    self.remaining_secs = self.plan.round_rest_secs;
                    Some(self.transition(format!(
                        "Round {} completed. Round rest",
                        self.round_index
                    )))
                } else {
                    self.phase = Phase::Finished;
                    self.remaining_secs = 0;
                    self.finished = true;
                    self.running = false;
                    Some(self.transition("Workout completed. Great job!".to_string()))
                }
            }
            Phase::RoundRest => {
                self.round_index += 1;
                self.exercise_index = 1;
                self.phase = Phase::Work;
                self.remaining_secs = self.plan.work_secs;
                Some(self.transition(format!("Round {}. Exercise 1. Work", self.round_index)))
            }
            // Guarded by the `finished` check in tick()
            Phase::Finished => None,
        }
    }

    fn transition(&self, announcement: String) -> TransitionEvent {
        TransitionEvent {
            to_phase: self.phase,
            announcement,
            exercise_index: self.exercise_index,
            round_index: self.round_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn plan(work: u32, rest: u32, round_rest: u32, exercises: u32, rounds: u32) -> WorkoutPlan {
        WorkoutPlan {
            work_secs: work,
            rest_secs: rest,
            round_rest_secs: round_rest,
            exercises_per_round: exercises,
            rounds,
        }
    }

    fn running_timer(p: WorkoutPlan) -> Timer {
        let mut t = Timer::new(p);
        t.start();
        t
    }

    /// Tick until a transition fires, returning it and the number of
    /// ticks it took.
    fn tick_to_transition(t: &mut Timer) -> (TransitionEvent, u32) {
        for n in 1..=10_000 {
            if let Some(ev) = t.tick() {
                return (ev, n);
            }
        }
        panic!("no transition within 10000 ticks");
    }

    #[test]
    fn new_timer_initial_state() {
        let t = Timer::new(plan(10, 5, 30, 3, 2));

        assert_eq!(t.phase, Phase::Work);
        assert_eq!(t.exercise_index, 1);
        assert_eq!(t.round_index, 1);
        assert_eq!(t.remaining_secs, 10);
        assert!(!t.running);
        assert!(!t.finished);
        assert!(t.is_fresh());
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let mut t = Timer::new(plan(10, 5, 30, 3, 2));

        assert_eq!(t.tick(), None);
        assert_eq!(t.remaining_secs, 10);
        assert_eq!(t.phase, Phase::Work);
    }

    #[test]
    fn tick_is_noop_once_finished() {
        let mut t = running_timer(plan(1, 1, 1, 1, 1));

        // Work(1) then Rest(1) then done
        tick_to_transition(&mut t);
        tick_to_transition(&mut t);
        assert!(t.finished);

        t.running = true; // even if forced, finished wins
        assert_eq!(t.tick(), None);
        assert_eq!(t.phase, Phase::Finished);
    }

    #[test]
    fn work_phase_takes_exactly_work_secs_ticks() {
        let mut t = running_timer(plan(10, 5, 30, 3, 2));

        for _ in 0..9 {
            assert_eq!(t.tick(), None);
        }
        assert_eq!(t.remaining_secs, 1);

        let ev = t.tick().expect("10th tick should transition");
        assert_eq!(ev.to_phase, Phase::Rest);
        assert_eq!(ev.announcement, "Rest");
        assert_eq!(t.remaining_secs, 5);
    }

    #[test]
    fn rest_advances_to_next_exercise() {
        let mut t = running_timer(plan(2, 2, 5, 3, 2));

        tick_to_transition(&mut t); // Work -> Rest
        let (ev, ticks) = tick_to_transition(&mut t);

        assert_eq!(ticks, 2);
        assert_eq!(ev.to_phase, Phase::Work);
        assert_eq!(ev.announcement, "Exercise 2. Work");
        assert_eq!(t.exercise_index, 2);
        assert_eq!(t.round_index, 1);
        assert_eq!(t.remaining_secs, 2);
    }

    #[test]
    fn last_rest_of_round_enters_round_rest() {
        let mut t = running_timer(plan(1, 1, 7, 2, 2));

        // Exercise 1: Work, Rest; Exercise 2: Work, then its Rest ends the round
        for _ in 0..3 {
            tick_to_transition(&mut t);
        }
        let (ev, _) = tick_to_transition(&mut t);

        assert_eq!(ev.to_phase, Phase::RoundRest);
        assert_eq!(ev.announcement, "Round 1 completed. Round rest");
        assert_eq!(t.remaining_secs, 7);
        assert_eq!(t.round_index, 1);
    }

    #[test]
    fn round_rest_enters_next_round_at_exercise_one() {
        let mut t = running_timer(plan(1, 1, 2, 2, 2));

        for _ in 0..4 {
            tick_to_transition(&mut t); // through round 1 into RoundRest
        }
        assert_eq!(t.phase, Phase::RoundRest);

        let (ev, ticks) = tick_to_transition(&mut t);
        assert_eq!(ticks, 2);
        assert_matches!(ev, TransitionEvent { to_phase: Phase::Work, .. });
        assert_eq!(ev.announcement, "Round 2. Exercise 1. Work");
        assert_eq!(t.round_index, 2);
        assert_eq!(t.exercise_index, 1);
    }

    #[test]
    fn final_rest_finishes_and_stops() {
        let mut t = running_timer(plan(1, 1, 1, 1, 1));

        tick_to_transition(&mut t); // Work -> Rest
        let (ev, _) = tick_to_transition(&mut t);

        assert_eq!(ev.to_phase, Phase::Finished);
        assert_eq!(ev.announcement, "Workout completed. Great job!");
        assert!(t.finished);
        assert!(!t.running);
        assert_eq!(t.remaining_secs, 0);
    }

    #[test]
    fn no_round_rest_after_final_round() {
        let mut t = running_timer(plan(1, 1, 9, 1, 2));

        let mut phases = vec![];
        while !t.finished {
            let (ev, _) = tick_to_transition(&mut t);
            phases.push(ev.to_phase);
        }

        assert_eq!(
            phases,
            vec![
                Phase::Rest,
                Phase::RoundRest,
                Phase::Work,
                Phase::Rest,
                Phase::Finished,
            ]
        );
    }

    #[test]
    fn at_most_one_transition_per_tick() {
        // Even a degenerate zero countdown must not cascade through
        // several phases inside a single tick.
        let mut t = running_timer(plan(5, 5, 5, 2, 2));
        t.remaining_secs = 0;

        let ev = t.tick().expect("zero countdown transitions immediately");
        assert_eq!(ev.to_phase, Phase::Rest);
        assert_eq!(t.remaining_secs, 5);
        assert_eq!(t.tick(), None);
    }

    #[test]
    fn transition_count_matches_phase_schedule() {
        // Active phases = rounds * exercises * 2 + (rounds - 1) round
        // rests; every transition enters one phase (Finished included),
        // the initial Work is entered for free.
        for (e, r) in [(1, 1), (2, 2), (3, 2), (1, 4)] {
            let mut t = running_timer(plan(1, 1, 1, e, r));
            let mut transitions = 0;
            while !t.finished {
                tick_to_transition(&mut t);
                transitions += 1;
            }
            assert_eq!(transitions, r * e * 2 + (r - 1), "e={e} r={r}");
        }
    }

    #[test]
    fn reset_restores_initial_state_from_any_phase() {
        let mut t = running_timer(plan(2, 2, 2, 2, 3));
        for _ in 0..5 {
            tick_to_transition(&mut t);
        }
        assert_ne!(t.phase, Phase::Work);

        t.reset();

        assert_eq!(t.phase, Phase::Work);
        assert_eq!(t.exercise_index, 1);
        assert_eq!(t.round_index, 1);
        assert_eq!(t.remaining_secs, 2);
        assert!(!t.running);
        assert!(!t.finished);
    }

    #[test]
    fn reset_clears_finished() {
        let mut t = running_timer(plan(1, 1, 1, 1, 1));
        tick_to_transition(&mut t);
        tick_to_transition(&mut t);
        assert!(t.finished);

        t.reset();
        assert!(!t.finished);
        t.start();
        assert!(t.running);
    }

    #[test]
    fn apply_plan_mid_rest_restarts_under_new_plan() {
        let mut t = running_timer(plan(4, 4, 4, 3, 3));
        tick_to_transition(&mut t);
        assert_eq!(t.phase, Phase::Rest);

        t.apply_plan(plan(20, 10, 60, 5, 4));

        assert_eq!(t.phase, Phase::Work);
        assert_eq!(t.exercise_index, 1);
        assert_eq!(t.round_index, 1);
        assert_eq!(t.remaining_secs, 20);
        assert!(!t.running);
        assert_eq!(t.plan().rounds, 4);
    }

    #[test]
    fn start_refused_once_finished() {
        let mut t = running_timer(plan(1, 1, 1, 1, 1));
        tick_to_transition(&mut t);
        tick_to_transition(&mut t);

        t.start();
        assert!(!t.running);
    }

    #[test]
    fn phase_display_names() {
        assert_eq!(Phase::Work.to_string(), "Work");
        assert_eq!(Phase::RoundRest.to_string(), "Round Rest");
    }
}
