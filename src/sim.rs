//! The pet simulation engine: a wall-clock tick that ages the pet and
//! decays its needs, plus the guarded action mutations and the pure
//! derivations (mood, achievements, evolution progress) they share.
//!
//! Every entry point returns the notices it produced; the caller decides
//! what (if anything) to show.

use crate::model::{
    Achievement, Action, Character, Mood, Notice, PetState, EVOLUTION_TIMES,
};
use chrono::{DateTime, Utc};

// Per-minute decay applied on every tick while alive.
const HUNGER_DECAY: f64 = 2.0;
const HAPPINESS_DECAY: f64 = 1.0;
const ENERGY_DECAY: f64 = 1.5;
// Health drain per minute while hunger or happiness sits at/below 20.
const NEGLECT_HEALTH_DECAY: f64 = 2.0;
const NEGLECT_THRESHOLD: f64 = 20.0;

pub(crate) struct Engine {
    state: PetState,
    last_tick: DateTime<Utc>,
}

impl Engine {
    pub(crate) fn new(character: Character, now: DateTime<Utc>) -> Self {
        Self {
            state: PetState::new(character),
            last_tick: now,
        }
    }

    pub(crate) fn state(&self) -> &PetState {
        &self.state
    }

    /// Replaces the pet with a fresh one and rebases the tick clock so the
    /// first tick after a reset sees no accumulated elapsed time.
    pub(crate) fn reset(&mut self, character: Character, now: DateTime<Utc>) {
        self.state = PetState::new(character);
        self.last_tick = now;
    }

    /// Advances simulated time by the real time elapsed since the previous
    /// tick. The clock is rebased even when the pet is dead, so a later
    /// revival never sees one giant backlog delta.
    pub(crate) fn tick(&mut self, now: DateTime<Utc>) -> Vec<Notice> {
        let delta_min =
            ((now - self.last_tick).num_milliseconds().max(0) as f64) / 60_000.0;
        self.last_tick = now;

        let mut notices = Vec::new();
        let st = &mut self.state;
        if !st.is_alive {
            return notices;
        }

        st.age += delta_min;
        st.hunger = (st.hunger - HUNGER_DECAY * delta_min).clamp(0.0, 100.0);
        st.happiness = (st.happiness - HAPPINESS_DECAY * delta_min).clamp(0.0, 100.0);
        st.energy = (st.energy - ENERGY_DECAY * delta_min).clamp(0.0, 100.0);

        if st.hunger <= NEGLECT_THRESHOLD || st.happiness <= NEGLECT_THRESHOLD {
            st.health = (st.health - NEGLECT_HEALTH_DECAY * delta_min).clamp(0.0, 100.0);
        }

        // At most one stage per tick; a lagging pet catches up on later
        // ticks rather than skipping stages.
        if st.age >= EVOLUTION_TIMES[st.evolution_stage]
            && st.evolution_stage < EVOLUTION_TIMES.len() - 1
        {
            st.evolution_stage += 1;
            notices.push(Notice::Evolved(st.evolution_stage));
        }

        if st.health <= 0.0 {
            st.is_alive = false;
            notices.push(Notice::Died);
        }

        st.mood = derive_mood(st);
        self.unlock_achievements(&mut notices);
        notices
    }

    /// Applies one user action. Dead pets and unmet energy guards leave the
    /// state untouched; the guard case still reports why.
    pub(crate) fn act(&mut self, action: Action) -> Vec<Notice> {
        let mut notices = Vec::new();
        if !self.state.is_alive {
            return notices;
        }
        let spec = action.spec();
        if self.state.energy < spec.min_energy {
            if let Some(reason) = spec.blocked {
                notices.push(Notice::Blocked(reason));
            }
            return notices;
        }

        let st = &mut self.state;
        st.hunger = (st.hunger + spec.hunger).clamp(0.0, 100.0);
        st.happiness = (st.happiness + spec.happiness).clamp(0.0, 100.0);
        st.energy = (st.energy + spec.energy).clamp(0.0, 100.0);
        st.health = (st.health + spec.health).clamp(0.0, 100.0);
        st.loneliness = (st.loneliness + spec.loneliness).clamp(0.0, 100.0);
        st.total_clicks += 1;

        self.add_xp(spec.xp, &mut notices);
        self.state.mood = derive_mood(&self.state);
        self.unlock_achievements(&mut notices);
        notices
    }

    /// Laser mini-game hit feedback: pre-computed deltas, applied like an
    /// action but without the click counter.
    pub(crate) fn apply_laser_result(
        &mut self,
        happiness: f64,
        energy: f64,
        xp: f64,
    ) -> Vec<Notice> {
        let mut notices = Vec::new();
        if !self.state.is_alive {
            return notices;
        }
        let st = &mut self.state;
        st.happiness = (st.happiness + happiness).clamp(0.0, 100.0);
        st.energy = (st.energy + energy).clamp(0.0, 100.0);
        self.add_xp(xp, &mut notices);
        self.state.mood = derive_mood(&self.state);
        notices
    }

    /// Burger-catch mini-game feedback.
    pub(crate) fn apply_catch_result(
        &mut self,
        hunger: f64,
        happiness: f64,
        xp: f64,
    ) -> Vec<Notice> {
        let mut notices = Vec::new();
        if !self.state.is_alive {
            return notices;
        }
        let st = &mut self.state;
        st.hunger = (st.hunger + hunger).clamp(0.0, 100.0);
        st.happiness = (st.happiness + happiness).clamp(0.0, 100.0);
        self.add_xp(xp, &mut notices);
        self.state.mood = derive_mood(&self.state);
        notices
    }

    /// Records a finished laser run. Only an improvement moves the high
    /// score, and the first improvement also unlocks Laser Master.
    pub(crate) fn record_laser_score(&mut self, score: u32) -> Vec<Notice> {
        let mut notices = Vec::new();
        if score > self.state.laser_high_score {
            self.state.laser_high_score = score;
            notices.push(Notice::HighScore(score));
            if !self.state.has_achievement(Achievement::LaserMaster) {
                self.state.achievements.push(Achievement::LaserMaster);
                notices.push(Notice::Unlocked(Achievement::LaserMaster));
            }
        }
        notices
    }

    /// Percent of the current evolution stage already lived through.
    pub(crate) fn evolution_progress(&self) -> f64 {
        let stage = self.state.evolution_stage;
        let end = EVOLUTION_TIMES[stage];
        if end.is_infinite() {
            return 100.0;
        }
        let start = if stage > 0 { EVOLUTION_TIMES[stage - 1] } else { 0.0 };
        (((self.state.age - start) / (end - start)) * 100.0).min(100.0)
    }

    // One large grant can cross several thresholds; each crossing is its
    // own level-up notice.
    fn add_xp(&mut self, amount: f64, notices: &mut Vec<Notice>) {
        let st = &mut self.state;
        st.xp += amount;
        while st.xp >= st.xp_to_next {
            st.xp -= st.xp_to_next;
            st.level += 1;
            st.xp_to_next = (st.level as f64) * 100.0;
            notices.push(Notice::LevelUp(st.level));
        }
    }

    fn unlock_achievements(&mut self, notices: &mut Vec<Notice>) {
        let candidates = [
            (self.state.total_clicks >= 10, Achievement::FirstClick),
            (self.state.total_clicks >= 100, Achievement::DedicatedClicker),
            (self.state.level >= 5, Achievement::Evolving),
            (self.state.evolution_stage >= 3, Achievement::Adult),
            (self.state.age >= 60.0, Achievement::OneHourOfLife),
        ];
        for (earned, achievement) in candidates {
            if earned && !self.state.has_achievement(achievement) {
                self.state.achievements.push(achievement);
                notices.push(Notice::Unlocked(achievement));
            }
        }
    }
}

fn derive_mood(st: &PetState) -> Mood {
    // Order matters: ailments outrank contentment. A sick pet at full
    // happiness still reads as sick.
    if st.health <= 30.0 {
        Mood::Sick
    } else if st.energy <= 20.0 {
        Mood::Sleeping
    } else if st.hunger <= 30.0 {
        Mood::Hungry
    } else if st.happiness >= 80.0 {
        Mood::Happy
    } else if st.happiness <= 30.0 {
        Mood::Sad
    } else {
        Mood::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn engine() -> Engine {
        Engine::new(Character::Merc, t0())
    }

    fn tick_minutes(e: &mut Engine, minutes: i64) -> Vec<Notice> {
        let now = e.last_tick + Duration::minutes(minutes);
        e.tick(now)
    }

    #[test]
    fn five_minute_tick_decays_needs() {
        let mut e = engine();
        tick_minutes(&mut e, 5);
        let st = e.state();
        assert_eq!(st.age, 5.0);
        assert_eq!(st.hunger, 70.0);
        assert_eq!(st.happiness, 85.0);
        assert_eq!(st.energy, 92.5);
        assert_eq!(st.health, 100.0);
        // 85 still clears the happy bar
        assert_eq!(st.mood, Mood::Happy);

        // ten more minutes drops happiness to 75, into the normal band
        tick_minutes(&mut e, 10);
        let st = e.state();
        assert_eq!(st.age, 15.0);
        assert_eq!(st.happiness, 75.0);
        assert_eq!(st.mood, Mood::Normal);
    }

    #[test]
    fn negative_delta_clamps_to_zero() {
        let mut e = engine();
        e.tick(t0() - Duration::minutes(10));
        let st = e.state();
        assert_eq!(st.age, 0.0);
        assert_eq!(st.hunger, 80.0);
    }

    #[test]
    fn neglect_drains_health() {
        let mut e = engine();
        // 29 simulated minutes leaves hunger at 22, just above the
        // neglect threshold; health is untouched until it is crossed.
        tick_minutes(&mut e, 29);
        assert_eq!(e.state().hunger, 22.0);
        assert_eq!(e.state().health, 100.0);
        tick_minutes(&mut e, 5);
        assert_eq!(e.state().hunger, 12.0);
        assert_eq!(e.state().health, 90.0);
    }

    #[test]
    fn feed_clamps_at_hundred() {
        let mut e = engine();
        let notices = e.act(Action::Feed);
        let st = e.state();
        assert_eq!(st.hunger, 100.0);
        assert_eq!(st.happiness, 100.0);
        assert_eq!(st.total_clicks, 1);
        assert_eq!(st.xp, 6.0);
        assert!(notices.is_empty());
    }

    #[test]
    fn needs_never_leave_range() {
        let mut e = engine();
        for _ in 0..50 {
            e.act(Action::Train);
            e.act(Action::Sleep);
            e.act(Action::Feed);
            tick_minutes(&mut e, 17);
        }
        let st = e.state();
        for v in [st.hunger, st.happiness, st.energy, st.health, st.loneliness] {
            assert!((0.0..=100.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn play_guard_is_a_full_noop() {
        let mut e = engine();
        // Drain energy with repeated training, then fall under the play
        // guard via decay.
        e.state.energy = 10.0;
        let before_clicks = e.state().total_clicks;
        let before_xp = e.state().xp;
        let notices = e.act(Action::Play);
        assert_eq!(
            notices,
            vec![Notice::Blocked(crate::model::BlockReason::TooTiredToPlay)]
        );
        assert_eq!(e.state().total_clicks, before_clicks);
        assert_eq!(e.state().xp, before_xp);
        assert_eq!(e.state().happiness, 90.0);
    }

    #[test]
    fn sick_outranks_happy() {
        let mut e = engine();
        e.state.health = 25.0;
        e.state.happiness = 90.0;
        tick_minutes(&mut e, 0);
        assert_eq!(e.state().mood, Mood::Sick);
    }

    #[test]
    fn mood_precedence_chain() {
        let mut e = engine();
        e.state.energy = 10.0;
        tick_minutes(&mut e, 0);
        assert_eq!(e.state().mood, Mood::Sleeping);
        e.state.energy = 50.0;
        e.state.hunger = 25.0;
        tick_minutes(&mut e, 0);
        assert_eq!(e.state().mood, Mood::Hungry);
        e.state.hunger = 50.0;
        e.state.happiness = 20.0;
        tick_minutes(&mut e, 0);
        assert_eq!(e.state().mood, Mood::Sad);
    }

    #[test]
    fn xp_loop_uses_the_new_threshold_each_pass() {
        let mut e = engine();
        // 250 clears the 100 threshold once; the leftover 150 sits under
        // the new 200 threshold.
        let notices = e.apply_laser_result(0.0, 0.0, 250.0);
        let st = e.state();
        assert_eq!(st.level, 2);
        assert_eq!(st.xp, 150.0);
        assert_eq!(st.xp_to_next, 200.0);
        assert_eq!(notices, vec![Notice::LevelUp(2)]);
    }

    #[test]
    fn one_grant_can_level_twice() {
        let mut e = engine();
        let notices = e.apply_laser_result(0.0, 0.0, 350.0);
        let st = e.state();
        assert_eq!(st.level, 3);
        assert_eq!(st.xp, 50.0);
        assert_eq!(st.xp_to_next, 300.0);
        assert_eq!(notices, vec![Notice::LevelUp(2), Notice::LevelUp(3)]);
    }

    #[test]
    fn evolves_one_stage_per_tick() {
        let mut e = engine();
        e.state.age = 9.0; // past both the 2 and 8 minute thresholds
        let notices = tick_minutes(&mut e, 0);
        assert!(notices.contains(&Notice::Evolved(1)));
        assert_eq!(e.state().evolution_stage, 1);
        let notices = tick_minutes(&mut e, 0);
        assert!(notices.contains(&Notice::Evolved(2)));
        assert_eq!(e.state().evolution_stage, 2);
        // Caught up now; no further advance.
        assert!(tick_minutes(&mut e, 0).is_empty());
    }

    #[test]
    fn death_is_terminal() {
        let mut e = engine();
        e.state.health = 1.0;
        e.state.hunger = 10.0;
        let notices = tick_minutes(&mut e, 5);
        assert!(notices.contains(&Notice::Died));
        assert!(!e.state().is_alive);

        let frozen = e.state().clone();
        assert!(e.act(Action::Feed).is_empty());
        assert!(tick_minutes(&mut e, 60).is_empty());
        assert!(e.apply_catch_result(6.0, 4.0, 2.0).is_empty());
        let st = e.state();
        assert_eq!(st.age, frozen.age);
        assert_eq!(st.hunger, frozen.hunger);
        assert_eq!(st.xp, frozen.xp);
        assert_eq!(st.total_clicks, frozen.total_clicks);
    }

    #[test]
    fn reset_revives_with_initial_state() {
        let mut e = engine();
        e.state.health = 0.0;
        tick_minutes(&mut e, 1);
        assert!(!e.state().is_alive);
        e.reset(Character::Wolf, e.last_tick + Duration::hours(2));
        let st = e.state();
        assert!(st.is_alive);
        assert_eq!(st.hunger, 80.0);
        assert_eq!(st.happiness, 90.0);
        assert_eq!(st.level, 1);
        // The rebased clock means the next tick sees no backlog.
        tick_minutes(&mut e, 0);
        assert_eq!(e.state().age, 0.0);
    }

    #[test]
    fn achievements_fire_once() {
        let mut e = engine();
        for _ in 0..12 {
            e.act(Action::Click);
        }
        assert!(e.state().has_achievement(Achievement::FirstClick));
        let count = e.state().achievements.len();
        tick_minutes(&mut e, 1);
        tick_minutes(&mut e, 1);
        assert_eq!(e.state().achievements.len(), count);
    }

    #[test]
    fn hour_of_life_unlocks_on_tick() {
        let mut e = engine();
        e.state.age = 59.9;
        e.state.hunger = 100.0;
        e.state.happiness = 100.0;
        let notices = tick_minutes(&mut e, 1);
        assert!(notices.contains(&Notice::Unlocked(Achievement::OneHourOfLife)));
    }

    #[test]
    fn laser_high_score_only_improves() {
        let mut e = engine();
        let notices = e.record_laser_score(12);
        assert_eq!(
            notices,
            vec![
                Notice::HighScore(12),
                Notice::Unlocked(Achievement::LaserMaster)
            ]
        );
        assert!(e.record_laser_score(12).is_empty());
        assert!(e.record_laser_score(5).is_empty());
        assert_eq!(e.state().laser_high_score, 12);
        // Second improvement moves the score but not the achievement.
        assert_eq!(e.record_laser_score(20), vec![Notice::HighScore(20)]);
    }

    #[test]
    fn evolution_progress_is_stage_relative() {
        let mut e = engine();
        e.state.age = 1.0;
        assert_eq!(e.evolution_progress(), 50.0);
        e.state.age = 5.0;
        e.state.evolution_stage = 1; // stage spans 2..8
        assert_eq!(e.evolution_progress(), 50.0);
        e.state.evolution_stage = 7;
        assert_eq!(e.evolution_progress(), 100.0);
    }

    #[test]
    fn catch_result_routes_through_leveling() {
        let mut e = engine();
        e.state.xp = 99.0;
        let notices = e.apply_catch_result(6.0, 4.0, 2.0);
        assert_eq!(notices, vec![Notice::LevelUp(2)]);
        assert_eq!(e.state().hunger, 86.0);
        assert_eq!(e.state().happiness, 94.0);
    }
}
