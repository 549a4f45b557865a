//! Pet state record, derived enums, and the numeric tables the engine
//! runs on. Presentation code reads these; only `sim` mutates them.

/// Simulation tick period (wall clock).
pub(crate) const TICK_PERIOD_MS: u64 = 5_000;

/// Cumulative age (simulated minutes) at which each stage ends. The last
/// stage never ends.
pub(crate) const EVOLUTION_TIMES: [f64; 8] =
    [2.0, 8.0, 20.0, 50.0, 100.0, 200.0, 300.0, f64::INFINITY];

pub(crate) const STAGE_NAMES: [&str; 8] = [
    "Baby",
    "Child",
    "Teen",
    "Adult",
    "Veteran",
    "Legendary",
    "Mythic",
    "Eternal",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Character {
    /// Wisecracking mercenary. Never shuts up.
    Merc,
    /// Gruff brawler. Best at what he does.
    Wolf,
}

impl Character {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Character::Merc => "Merc",
            Character::Wolf => "Wolf",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mood {
    Happy,
    Sad,
    Hungry,
    Sick,
    Sleeping,
    Normal,
}

impl Mood {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Hungry => "hungry",
            Mood::Sick => "sick",
            Mood::Sleeping => "sleeping",
            Mood::Normal => "normal",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Achievement {
    FirstClick,
    DedicatedClicker,
    Evolving,
    Adult,
    OneHourOfLife,
    LaserMaster,
}

impl Achievement {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Achievement::FirstClick => "First Click",
            Achievement::DedicatedClicker => "Dedicated Clicker",
            Achievement::Evolving => "Evolving",
            Achievement::Adult => "Adult",
            Achievement::OneHourOfLife => "One Hour of Life",
            Achievement::LaserMaster => "Laser Master",
        }
    }
}

/// Advisory events an engine call can emit. The UI turns these into
/// toasts; the engine never formats text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Notice {
    LevelUp(u32),
    Evolved(usize),
    Unlocked(Achievement),
    Died,
    Blocked(BlockReason),
    HighScore(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BlockReason {
    TooTiredToPlay,
    NotEnoughEnergyToTrain,
}

#[derive(Clone, Debug)]
pub(crate) struct PetState {
    pub(crate) character: Character,
    pub(crate) hunger: f64,
    pub(crate) happiness: f64,
    pub(crate) energy: f64,
    pub(crate) health: f64,
    pub(crate) loneliness: f64,
    /// Simulated lifetime in minutes (fractional).
    pub(crate) age: f64,
    pub(crate) level: u32,
    pub(crate) xp: f64,
    pub(crate) xp_to_next: f64,
    pub(crate) evolution_stage: usize,
    pub(crate) total_clicks: u64,
    /// Insertion-ordered, duplicate-free.
    pub(crate) achievements: Vec<Achievement>,
    pub(crate) mood: Mood,
    pub(crate) is_alive: bool,
    pub(crate) laser_high_score: u32,
}

impl PetState {
    pub(crate) fn new(character: Character) -> Self {
        Self {
            character,
            hunger: 80.0,
            happiness: 90.0,
            energy: 100.0,
            health: 100.0,
            loneliness: 0.0,
            age: 0.0,
            level: 1,
            xp: 0.0,
            xp_to_next: 100.0,
            evolution_stage: 0,
            total_clicks: 0,
            achievements: Vec::new(),
            mood: Mood::Normal,
            is_alive: true,
            laser_high_score: 0,
        }
    }

    pub(crate) fn stage_name(&self) -> &'static str {
        STAGE_NAMES[self.evolution_stage.min(STAGE_NAMES.len() - 1)]
    }

    pub(crate) fn has_achievement(&self, a: Achievement) -> bool {
        self.achievements.contains(&a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Feed,
    Play,
    Heal,
    Sleep,
    Train,
    Treat,
    Click,
}

/// One row of the action table: need deltas, XP reward, and the energy
/// guard. Tuning lives here so control flow never hard-codes a number.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ActionSpec {
    pub(crate) hunger: f64,
    pub(crate) happiness: f64,
    pub(crate) energy: f64,
    pub(crate) health: f64,
    pub(crate) loneliness: f64,
    pub(crate) xp: f64,
    pub(crate) min_energy: f64,
    pub(crate) blocked: Option<BlockReason>,
}

const NO_EFFECT: ActionSpec = ActionSpec {
    hunger: 0.0,
    happiness: 0.0,
    energy: 0.0,
    health: 0.0,
    loneliness: 0.0,
    xp: 0.0,
    min_energy: 0.0,
    blocked: None,
};

impl Action {
    pub(crate) fn spec(self) -> ActionSpec {
        match self {
            Action::Feed => ActionSpec {
                hunger: 35.0,
                happiness: 12.0,
                loneliness: -15.0,
                xp: 6.0,
                ..NO_EFFECT
            },
            Action::Play => ActionSpec {
                happiness: 28.0,
                energy: -15.0,
                loneliness: -25.0,
                xp: 10.0,
                min_energy: 15.0,
                blocked: Some(BlockReason::TooTiredToPlay),
                ..NO_EFFECT
            },
            Action::Heal => ActionSpec {
                health: 45.0,
                energy: 25.0,
                xp: 4.0,
                ..NO_EFFECT
            },
            Action::Sleep => ActionSpec {
                energy: 55.0,
                health: 18.0,
                happiness: 8.0,
                xp: 3.0,
                ..NO_EFFECT
            },
            Action::Train => ActionSpec {
                energy: -25.0,
                happiness: 18.0,
                xp: 15.0,
                min_energy: 25.0,
                blocked: Some(BlockReason::NotEnoughEnergyToTrain),
                ..NO_EFFECT
            },
            Action::Treat => ActionSpec {
                happiness: 22.0,
                hunger: 18.0,
                loneliness: -18.0,
                xp: 7.0,
                ..NO_EFFECT
            },
            Action::Click => ActionSpec {
                happiness: 6.0,
                loneliness: -8.0,
                xp: 2.0,
                ..NO_EFFECT
            },
        }
    }
}
