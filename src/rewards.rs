//! Reward shaping for Ludo move outcomes
//!
//! Every move the agent can make is classified into an [`OutcomeCategory`]:
//! the board context the moved piece was in ([`BoardContext`]) combined with
//! what the move does ([`MoveEffect`]). The [`RewardTable`] maps each of the
//! 27 categories to a fixed scalar reward.
//!
//! The table is derived from nine base rewards for the `Safe` context and
//! four severity tiers layered additively on top of them:
//!
//! | Context  | Derivation                                                   |
//! |----------|--------------------------------------------------------------|
//! | `Safe`   | base value                                                   |
//! | `Unsafe` | base + `bad` for plain moves, + `good` for escapes/captures,  |
//! |          | + `very_bad` for being captured                              |
//! | `Home`   | base + `very_good` for moving out, + `very_bad` otherwise    |

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Situation of the moved piece before the move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardContext {
    Safe,
    Unsafe,
    Home,
}

impl BoardContext {
    pub const ALL: [BoardContext; 3] = [BoardContext::Safe, BoardContext::Unsafe, BoardContext::Home];

    pub fn label(self) -> &'static str {
        match self {
            BoardContext::Safe => "SAFE",
            BoardContext::Unsafe => "UNSAFE",
            BoardContext::Home => "HOME",
        }
    }
}

/// What a move does on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Bring a piece out of the home yard
    MoveOut,
    /// Plain advance by the die value
    MoveDice,
    /// Reach the goal
    Goal,
    /// Land on a star and jump ahead
    Star,
    /// Land on a globe
    Globe,
    /// Land on an own piece, forming a pair
    Protect,
    /// Capture an opponent piece
    Kill,
    /// Get captured by moving
    Die,
    /// Enter the goal stretch
    GoalZone,
}

impl MoveEffect {
    pub const ALL: [MoveEffect; 9] = [
        MoveEffect::MoveOut,
        MoveEffect::MoveDice,
        MoveEffect::Goal,
        MoveEffect::Star,
        MoveEffect::Globe,
        MoveEffect::Protect,
        MoveEffect::Kill,
        MoveEffect::Die,
        MoveEffect::GoalZone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MoveEffect::MoveOut => "MoveOut",
            MoveEffect::MoveDice => "MoveDice",
            MoveEffect::Goal => "Goal",
            MoveEffect::Star => "Star",
            MoveEffect::Globe => "Globe",
            MoveEffect::Protect => "Protect",
            MoveEffect::Kill => "Kill",
            MoveEffect::Die => "Die",
            MoveEffect::GoalZone => "GoalZone",
        }
    }

    fn ordinal(self) -> usize {
        match self {
            MoveEffect::MoveOut => 0,
            MoveEffect::MoveDice => 1,
            MoveEffect::Goal => 2,
            MoveEffect::Star => 3,
            MoveEffect::Globe => 4,
            MoveEffect::Protect => 5,
            MoveEffect::Kill => 6,
            MoveEffect::Die => 7,
            MoveEffect::GoalZone => 8,
        }
    }
}

/// Closed set of move outcomes, also the action axis of the value tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeCategory {
    pub context: BoardContext,
    pub effect: MoveEffect,
}

impl OutcomeCategory {
    /// Number of categories (3 contexts × 9 effects)
    pub const COUNT: usize = 27;

    pub const fn new(context: BoardContext, effect: MoveEffect) -> Self {
        Self { context, effect }
    }

    /// Dense index in `0..COUNT`: contexts in `Safe, Unsafe, Home` order,
    /// effects in declaration order within each context.
    pub fn index(self) -> usize {
        let context = match self.context {
            BoardContext::Safe => 0,
            BoardContext::Unsafe => 1,
            BoardContext::Home => 2,
        };
        context * MoveEffect::ALL.len() + self.effect.ordinal()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        let context = *BoardContext::ALL.get(index / MoveEffect::ALL.len())?;
        let effect = MoveEffect::ALL[index % MoveEffect::ALL.len()];
        Some(Self::new(context, effect))
    }

    /// All categories in index order
    pub fn all() -> impl Iterator<Item = OutcomeCategory> {
        BoardContext::ALL.into_iter().flat_map(|context| {
            MoveEffect::ALL
                .into_iter()
                .map(move |effect| OutcomeCategory::new(context, effect))
        })
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.context.label(), self.effect.label())
    }
}

impl FromStr for OutcomeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutcomeCategory::all()
            .find(|category| category.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown outcome category '{s}'"))
    }
}

/// Additive severity tiers applied to the safe base rewards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityTiers {
    pub very_bad: f64,
    pub bad: f64,
    pub good: f64,
    pub very_good: f64,
}

impl Default for SeverityTiers {
    fn default() -> Self {
        Self {
            very_bad: -0.8,
            bad: -0.4,
            good: 0.4,
            very_good: 1.2,
        }
    }
}

/// Rewards for the nine effects in the `Safe` context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeBaseRewards {
    pub move_out: f64,
    pub move_dice: f64,
    pub goal: f64,
    pub star: f64,
    pub globe: f64,
    pub protect: f64,
    pub kill: f64,
    pub die: f64,
    pub goal_zone: f64,
}

impl SafeBaseRewards {
    fn of(&self, effect: MoveEffect) -> f64 {
        match effect {
            MoveEffect::MoveOut => self.move_out,
            MoveEffect::MoveDice => self.move_dice,
            MoveEffect::Goal => self.goal,
            MoveEffect::Star => self.star,
            MoveEffect::Globe => self.globe,
            MoveEffect::Protect => self.protect,
            MoveEffect::Kill => self.kill,
            MoveEffect::Die => self.die,
            MoveEffect::GoalZone => self.goal_zone,
        }
    }
}

impl Default for SafeBaseRewards {
    fn default() -> Self {
        Self {
            move_out: 0.4,
            move_dice: 0.01,
            goal: 0.8,
            star: 0.8,
            globe: 0.4,
            protect: 0.2,
            kill: 1.5,
            die: -0.5,
            goal_zone: 0.2,
        }
    }
}

/// Fixed reward for every [`OutcomeCategory`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    rewards: Vec<f64>,
}

impl RewardTable {
    /// Derive the full table from safe base rewards and severity tiers.
    pub fn new(tiers: SeverityTiers, base: SafeBaseRewards) -> Self {
        let rewards = OutcomeCategory::all()
            .map(|category| {
                let base_value = base.of(category.effect);
                base_value + Self::modifier(&tiers, category)
            })
            .collect();
        Self { rewards }
    }

    fn modifier(tiers: &SeverityTiers, category: OutcomeCategory) -> f64 {
        match (category.context, category.effect) {
            (BoardContext::Safe, _) => 0.0,
            (BoardContext::Unsafe, MoveEffect::MoveOut)
            | (BoardContext::Unsafe, MoveEffect::MoveDice)
            | (BoardContext::Unsafe, MoveEffect::Star) => tiers.bad,
            (BoardContext::Unsafe, MoveEffect::Die) => tiers.very_bad,
            (BoardContext::Unsafe, _) => tiers.good,
            (BoardContext::Home, MoveEffect::MoveOut) => tiers.very_good,
            (BoardContext::Home, _) => tiers.very_bad,
        }
    }

    /// Reward for a category.
    pub fn reward_of(&self, category: OutcomeCategory) -> f64 {
        self.rewards[category.index()]
    }

    /// Reward by dense category index, `None` outside `0..COUNT`.
    pub fn reward_at(&self, index: usize) -> Option<f64> {
        self.rewards.get(index).copied()
    }

    /// `(category, reward)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (OutcomeCategory, f64)> + '_ {
        OutcomeCategory::all().zip(self.rewards.iter().copied())
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        Self::new(SeverityTiers::default(), SafeBaseRewards::default())
    }
}
