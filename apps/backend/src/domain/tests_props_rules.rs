//! Property tests for the roll rules (pure domain, no DB).

use proptest::prelude::*;

use crate::domain::rules::{advance_steps, apply_roll, RaceMode, TRACK_LENGTH};

fn mode() -> impl Strategy<Value = RaceMode> {
    prop_oneof![Just(RaceMode::Normal), Just(RaceMode::Super)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Normal mode moves one or two squares and never touches condition.
    #[test]
    fn prop_normal_mode_steps(
        dice in 1u8..=6,
        position in 0i32..TRACK_LENGTH,
        condition in -10i32..=10,
    ) {
        let out = apply_roll(RaceMode::Normal, dice, position, condition);
        prop_assert!(out.steps == 1 || out.steps == 2);
        prop_assert_eq!(out.new_condition, condition);
        prop_assert_eq!(out.new_position, position + out.steps);
    }

    /// Super mode is bounded by dice and remaining condition, and costs one condition.
    #[test]
    fn prop_super_mode_bounds(
        dice in 1u8..=6,
        position in 0i32..TRACK_LENGTH,
        condition in -10i32..=10,
    ) {
        let out = apply_roll(RaceMode::Super, dice, position, condition);
        prop_assert!(out.steps >= 0);
        prop_assert!(out.steps <= i32::from(dice).min(condition.max(0)));
        prop_assert_eq!(out.new_condition, condition - 1);
    }

    /// Terminal flags are consistent with the new position and condition.
    #[test]
    fn prop_terminal_flags(
        mode in mode(),
        dice in 1u8..=6,
        position in 0i32..TRACK_LENGTH,
        condition in -10i32..=10,
    ) {
        let out = apply_roll(mode, dice, position, condition);
        if out.won {
            prop_assert!(out.new_position >= TRACK_LENGTH);
        }
        if out.game_over {
            prop_assert!(!out.won);
            prop_assert!(out.new_condition <= 0);
        }
        prop_assert!(!(out.won && out.game_over));
        prop_assert_eq!(out.steps, advance_steps(mode, dice, condition));
    }
}
