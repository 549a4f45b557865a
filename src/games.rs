//! Mini-game state machines. Each owns its own deadlines and scoring and
//! talks to the simulation only through the app loop, which forwards hits
//! and catches to the engine's two integration calls.

use rand::{rngs::StdRng, Rng};
use std::time::{Duration, Instant};

pub(crate) const LASER_DURATION: Duration = Duration::from_secs(30);
pub(crate) const CATCH_DURATION: Duration = Duration::from_secs(15);

// Pet deltas per laser hit / burger catch: (happiness, energy, xp) and
// (hunger, happiness, xp).
pub(crate) const LASER_HIT_REWARD: (f64, f64, f64) = (4.0, -2.0, 3.0);
pub(crate) const CATCH_REWARD: (f64, f64, f64) = (6.0, 4.0, 2.0);

#[derive(Clone, Copy, Debug)]
pub(crate) struct PlayArea {
    pub(crate) w: i32,
    pub(crate) h: i32,
}

/* -----------------------------
   Laser chase
------------------------------ */

#[derive(Clone, Copy, Debug)]
pub(crate) struct Dot {
    pub(crate) x: i32,
    pub(crate) y: i32,
    expires_at: Instant,
}

pub(crate) struct LaserGame {
    pub(crate) score: u32,
    pub(crate) cursor: (i32, i32),
    area: PlayArea,
    ends_at: Instant,
    dot: Option<Dot>,
    next_spawn_at: Option<Instant>,
}

impl LaserGame {
    pub(crate) fn new(area: PlayArea, now: Instant) -> Self {
        Self {
            score: 0,
            cursor: (area.w / 2, area.h / 2),
            area,
            ends_at: now + LASER_DURATION,
            dot: None,
            next_spawn_at: Some(now),
        }
    }

    pub(crate) fn finished(&self, now: Instant) -> bool {
        now >= self.ends_at
    }

    pub(crate) fn secs_left(&self, now: Instant) -> u64 {
        self.ends_at.saturating_duration_since(now).as_secs()
    }

    pub(crate) fn difficulty(&self) -> u32 {
        (self.score / 5 + 1).min(5)
    }

    /// How long a freshly spawned dot stays on screen.
    fn visible_window(&self) -> Duration {
        let ms = (2_500u64).saturating_sub(200 * self.difficulty() as u64).max(800);
        Duration::from_millis(ms)
    }

    pub(crate) fn dot(&self) -> Option<Dot> {
        self.dot
    }

    pub(crate) fn move_cursor(&mut self, dx: i32, dy: i32) {
        self.cursor.0 = (self.cursor.0 + dx).clamp(0, self.area.w - 1);
        self.cursor.1 = (self.cursor.1 + dy).clamp(0, self.area.h - 1);
    }

    /// Expires a lingering dot and spawns the next one when due.
    pub(crate) fn update(&mut self, now: Instant, rng: &mut StdRng) {
        if self.finished(now) {
            return;
        }
        if let Some(dot) = self.dot {
            if now >= dot.expires_at {
                self.dot = None;
                self.next_spawn_at = Some(now + Duration::from_millis(300));
            }
        }
        if self.dot.is_none() {
            if let Some(at) = self.next_spawn_at {
                if now >= at {
                    self.dot = Some(Dot {
                        x: rng.gen_range(0..self.area.w),
                        y: rng.gen_range(0..self.area.h),
                        expires_at: now + self.visible_window(),
                    });
                    self.next_spawn_at = None;
                }
            }
        }
    }

    /// A zap counts if the crosshair is within one cell of the dot.
    pub(crate) fn zap(&mut self, now: Instant) -> bool {
        let Some(dot) = self.dot else { return false };
        let near = (self.cursor.0 - dot.x).abs() <= 1 && (self.cursor.1 - dot.y).abs() <= 1;
        if !near {
            return false;
        }
        self.score += 1;
        self.dot = None;
        self.next_spawn_at = Some(now + Duration::from_millis(200));
        true
    }

    pub(crate) fn rating(&self) -> &'static str {
        match self.score {
            50.. => "Expert",
            30.. => "Advanced",
            15.. => "Intermediate",
            _ => "Beginner",
        }
    }
}

/* -----------------------------
   Burger catch
------------------------------ */

const BURGER_SPAWN_EVERY: Duration = Duration::from_millis(600);
const BURGER_FALL_SECS: f64 = 4.0;
/// Basket spans its center cell plus one on each side.
const BASKET_REACH: i32 = 1;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Burger {
    pub(crate) x: i32,
    pub(crate) y: f64,
}

pub(crate) struct CatchGame {
    pub(crate) score: u32,
    pub(crate) basket_x: i32,
    area: PlayArea,
    ends_at: Instant,
    burgers: Vec<Burger>,
    next_spawn_at: Instant,
    last_update: Instant,
}

impl CatchGame {
    pub(crate) fn new(area: PlayArea, now: Instant) -> Self {
        Self {
            score: 0,
            basket_x: area.w / 2,
            area,
            ends_at: now + CATCH_DURATION,
            burgers: Vec::new(),
            next_spawn_at: now + BURGER_SPAWN_EVERY,
            last_update: now,
        }
    }

    pub(crate) fn finished(&self, now: Instant) -> bool {
        now >= self.ends_at
    }

    pub(crate) fn secs_left(&self, now: Instant) -> u64 {
        self.ends_at.saturating_duration_since(now).as_secs()
    }

    pub(crate) fn burgers(&self) -> &[Burger] {
        &self.burgers
    }

    pub(crate) fn move_basket(&mut self, dx: i32) {
        self.basket_x = (self.basket_x + dx).clamp(BASKET_REACH, self.area.w - 1 - BASKET_REACH);
    }

    /// Advances falling burgers and spawns new ones; returns how many were
    /// caught this frame.
    pub(crate) fn update(&mut self, now: Instant, rng: &mut StdRng) -> u32 {
        let dt = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.last_update = now;
        if self.finished(now) {
            return 0;
        }

        while now >= self.next_spawn_at {
            self.burgers.push(Burger {
                x: rng.gen_range(0..self.area.w),
                y: 0.0,
            });
            self.next_spawn_at += BURGER_SPAWN_EVERY;
        }

        let fall = (self.area.h as f64 / BURGER_FALL_SECS) * dt;
        let floor = (self.area.h - 1) as f64;
        let basket_x = self.basket_x;
        let mut caught = 0;
        self.burgers.retain_mut(|b| {
            b.y += fall;
            if b.y < floor {
                return true;
            }
            if (b.x - basket_x).abs() <= BASKET_REACH {
                caught += 1;
            }
            false
        });
        self.score += caught;
        caught
    }

    pub(crate) fn rating(&self) -> &'static str {
        match self.score {
            20.. => "Amazing!",
            15.. => "Great!",
            10.. => "Good!",
            5.. => "Not Bad!",
            _ => "Try Again",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    const AREA: PlayArea = PlayArea { w: 40, h: 16 };

    #[test]
    fn laser_dot_window_shrinks_with_difficulty() {
        let now = Instant::now();
        let mut g = LaserGame::new(AREA, now);
        assert_eq!(g.visible_window(), Duration::from_millis(2_300));
        g.score = 10; // difficulty 3
        assert_eq!(g.visible_window(), Duration::from_millis(1_900));
        g.score = 100; // capped at 5
        assert_eq!(g.difficulty(), 5);
        assert_eq!(g.visible_window(), Duration::from_millis(1_500));
    }

    #[test]
    fn laser_zap_requires_proximity() {
        let now = Instant::now();
        let mut g = LaserGame::new(AREA, now);
        g.update(now, &mut rng());
        let dot = g.dot().expect("dot spawns immediately");
        g.cursor = (dot.x + 5, dot.y);
        assert!(!g.zap(now));
        assert_eq!(g.score, 0);
        g.cursor = (dot.x + 1, dot.y - 1);
        assert!(g.zap(now));
        assert_eq!(g.score, 1);
        assert!(g.dot().is_none());
    }

    #[test]
    fn laser_dot_expires_and_respawns() {
        let now = Instant::now();
        let mut g = LaserGame::new(AREA, now);
        let mut r = rng();
        g.update(now, &mut r);
        assert!(g.dot().is_some());
        let later = now + Duration::from_millis(2_400);
        g.update(later, &mut r);
        assert!(g.dot().is_none());
        g.update(later + Duration::from_millis(300), &mut r);
        assert!(g.dot().is_some());
    }

    #[test]
    fn burgers_land_in_the_basket_span() {
        let now = Instant::now();
        let mut g = CatchGame::new(AREA, now);
        g.burgers = vec![
            Burger { x: g.basket_x, y: 0.0 },
            Burger { x: g.basket_x + 1, y: 0.0 },
            Burger { x: g.basket_x + 2, y: 0.0 },
        ];
        g.next_spawn_at = now + CATCH_DURATION; // no extra spawns
        let caught = g.update(now + Duration::from_secs_f64(BURGER_FALL_SECS), &mut rng());
        assert_eq!(caught, 2);
        assert_eq!(g.score, 2);
        assert!(g.burgers().is_empty());
    }

    #[test]
    fn catch_spawns_on_cadence() {
        let now = Instant::now();
        let mut g = CatchGame::new(AREA, now);
        let mut r = rng();
        g.update(now + Duration::from_millis(1_900), &mut r);
        assert_eq!(g.burgers().len(), 3);
    }

    #[test]
    fn basket_stays_inside_the_area() {
        let now = Instant::now();
        let mut g = CatchGame::new(AREA, now);
        for _ in 0..100 {
            g.move_basket(-1);
        }
        assert_eq!(g.basket_x, BASKET_REACH);
        for _ in 0..100 {
            g.move_basket(1);
        }
        assert_eq!(g.basket_x, AREA.w - 1 - BASKET_REACH);
    }

    #[test]
    fn ratings_match_score_bands() {
        let now = Instant::now();
        let mut laser = LaserGame::new(AREA, now);
        assert_eq!(laser.rating(), "Beginner");
        laser.score = 30;
        assert_eq!(laser.rating(), "Advanced");
        let mut catch = CatchGame::new(AREA, now);
        catch.score = 12;
        assert_eq!(catch.rating(), "Good!");
    }
}
