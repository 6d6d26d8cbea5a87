//! Track rules: how a single dice roll moves a racer.

use core::fmt;

/// Position at or beyond which a racer has won.
pub const TRACK_LENGTH: i32 = 22;
/// Condition every racer starts (and restarts) with.
pub const INITIAL_CONDITION: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RaceMode {
    #[default]
    Normal,
    Super,
}

impl RaceMode {
    /// Anything other than the exact string `"super"` is a normal roll.
    pub fn normalize(requested: &str) -> Self {
        if requested == "super" {
            RaceMode::Super
        } else {
            RaceMode::Normal
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            RaceMode::Normal => "normal",
            RaceMode::Super => "super",
        }
    }
}

impl fmt::Display for RaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying one roll to a racer's position and condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollOutcome {
    pub steps: i32,
    pub new_position: i32,
    pub new_condition: i32,
    pub won: bool,
    pub game_over: bool,
}

/// Steps granted by `dice` (1..=6).
///
/// Normal: 2 on even, 1 on odd. Super: the dice value capped by the
/// remaining condition, never negative.
pub fn advance_steps(mode: RaceMode, dice: u8, condition: i32) -> i32 {
    match mode {
        RaceMode::Normal => {
            if dice % 2 == 0 {
                2
            } else {
                1
            }
        }
        RaceMode::Super => i32::from(dice).min(condition.max(0)),
    }
}

pub fn apply_roll(mode: RaceMode, dice: u8, position: i32, condition: i32) -> RollOutcome {
    let steps = advance_steps(mode, dice, condition);
    let new_position = position + steps;
    let new_condition = match mode {
        RaceMode::Super => condition - 1,
        RaceMode::Normal => condition,
    };
    let won = new_position >= TRACK_LENGTH;
    let game_over = !won && new_condition <= 0;

    RollOutcome {
        steps,
        new_position,
        new_condition,
        won,
        game_over,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_mode_even_odd() {
        for dice in 1..=6u8 {
            let expected = if dice % 2 == 0 { 2 } else { 1 };
            assert_eq!(advance_steps(RaceMode::Normal, dice, 6), expected);
            // condition is irrelevant in normal mode
            assert_eq!(advance_steps(RaceMode::Normal, dice, -3), expected);
        }
    }

    #[test]
    fn super_mode_capped_by_condition() {
        assert_eq!(advance_steps(RaceMode::Super, 6, 6), 6);
        assert_eq!(advance_steps(RaceMode::Super, 6, 2), 2);
        assert_eq!(advance_steps(RaceMode::Super, 1, 5), 1);
        assert_eq!(advance_steps(RaceMode::Super, 4, 0), 0);
        assert_eq!(advance_steps(RaceMode::Super, 4, -2), 0);
    }

    #[test]
    fn normal_roll_from_start() {
        let out = apply_roll(RaceMode::Normal, 4, 0, INITIAL_CONDITION);
        assert_eq!(
            out,
            RollOutcome {
                steps: 2,
                new_position: 2,
                new_condition: INITIAL_CONDITION,
                won: false,
                game_over: false,
            }
        );
    }

    #[test]
    fn reaching_track_length_wins_even_with_no_condition() {
        let out = apply_roll(RaceMode::Super, 6, 20, 1);
        assert_eq!(out.steps, 1);
        assert_eq!(out.new_position, 21);
        assert!(out.game_over);

        let out = apply_roll(RaceMode::Super, 3, 20, 1);
        assert_eq!(out.new_position, 21);

        let out = apply_roll(RaceMode::Super, 2, 21, 1);
        assert_eq!(out.new_position, 22);
        assert_eq!(out.new_condition, 0);
        assert!(out.won);
        assert!(!out.game_over, "a win is never also game over");
    }

    #[test]
    fn super_rolls_exhaust_condition() {
        let mut position = 0;
        let mut condition = INITIAL_CONDITION;
        let mut last = None;
        for _ in 0..6 {
            let out = apply_roll(RaceMode::Super, 1, position, condition);
            position = out.new_position;
            condition = out.new_condition;
            last = Some(out);
        }
        let last = last.unwrap();
        assert_eq!(last.new_position, 6);
        assert_eq!(last.new_condition, 0);
        assert!(last.game_over);
        assert!(!last.won);
    }

    #[test]
    fn normalize_mode() {
        assert_eq!(RaceMode::normalize("super"), RaceMode::Super);
        assert_eq!(RaceMode::normalize("normal"), RaceMode::Normal);
        assert_eq!(RaceMode::normalize("SUPER"), RaceMode::Normal);
        assert_eq!(RaceMode::normalize(""), RaceMode::Normal);
        assert_eq!(RaceMode::normalize("turbo"), RaceMode::Normal);
    }
}
