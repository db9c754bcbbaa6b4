//! Recover touchdown / field-goal counts from a point total.

use serde::Serialize;

use crate::error::{ModelError, Result};
use crate::observations::ScoreKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreDecomposition {
    pub touchdowns: u32,
    pub field_goals: u32,
}

impl ScoreDecomposition {
    pub fn events(&self) -> u32 {
        self.touchdowns + self.field_goals
    }

    pub fn points(&self) -> u32 {
        self.touchdowns * ScoreKind::Touchdown.points()
            + self.field_goals * ScoreKind::FieldGoal.points()
    }
}

/// Every `(touchdowns, field_goals)` with `7 * touchdowns + 3 * field_goals == total`,
/// fewest scoring events first.
///
/// Two solutions always differ by a multiple of (3 touchdowns, -7 field goals),
/// so event counts are distinct and the order is fully determined.
pub fn decompositions(total: u32) -> Vec<ScoreDecomposition> {
    let td = ScoreKind::Touchdown.points();
    let fg = ScoreKind::FieldGoal.points();
    let mut found: Vec<ScoreDecomposition> = (0..=total / td)
        .rev()
        .filter_map(|touchdowns| {
            let rest = total - touchdowns * td;
            (rest % fg == 0).then_some(ScoreDecomposition {
                touchdowns,
                field_goals: rest / fg,
            })
        })
        .collect();
    found.sort_by_key(ScoreDecomposition::events);
    found
}

/// The decomposition with the fewest scoring events.
///
/// That is the one with the most touchdowns. A touchdown count `t` works when
/// `total - 7t` is divisible by 3, i.e. `t ≡ total (mod 3)`, so the answer is
/// the largest such `t` not above `total / 7`.
pub fn decompose_score(total: u32) -> Result<ScoreDecomposition> {
    let td = ScoreKind::Touchdown.points();
    let fg = ScoreKind::FieldGoal.points();
    let most = total / td;
    let step_down = (most % fg + fg - total % fg) % fg;
    let touchdowns = most
        .checked_sub(step_down)
        .ok_or(ModelError::InvalidDecomposition(total))?;
    Ok(ScoreDecomposition {
        touchdowns,
        field_goals: (total - touchdowns * td) / fg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(touchdowns: u32, field_goals: u32) -> ScoreDecomposition {
        ScoreDecomposition {
            touchdowns,
            field_goals,
        }
    }

    #[test]
    fn test_zero_is_no_scores() {
        assert_eq!(decompose_score(0).unwrap(), d(0, 0));
    }

    #[test]
    fn test_simplest_first() {
        assert_eq!(decompositions(21), vec![d(3, 0), d(0, 7)]);
        assert_eq!(decompose_score(21).unwrap(), d(3, 0));
    }

    #[test]
    fn test_mixed_totals() {
        assert_eq!(decompose_score(10).unwrap(), d(1, 1));
        assert_eq!(decompose_score(13).unwrap(), d(1, 2));
        assert_eq!(decompose_score(17).unwrap(), d(2, 1));
        assert_eq!(decompositions(42), vec![d(6, 0), d(3, 7), d(0, 14)]);
    }

    #[test]
    fn test_unreachable_totals() {
        for total in [1, 2, 4, 5, 8, 11] {
            assert_eq!(
                decompose_score(total),
                Err(ModelError::InvalidDecomposition(total))
            );
        }
    }

    #[test]
    fn test_fewest_events_matches_full_listing() {
        for total in 0..500 {
            assert_eq!(decompose_score(total).ok(), decompositions(total).first().copied());
        }
    }

    #[test]
    fn test_huge_total_is_direct() {
        let best = decompose_score(u32::MAX).unwrap();
        assert_eq!(best.points(), u32::MAX);
        assert!(best.field_goals < 7);
    }

    #[test]
    fn test_every_solution_adds_up() {
        for total in 0..200 {
            for sol in decompositions(total) {
                assert_eq!(sol.points(), total);
            }
        }
        // beyond 11 every total is reachable
        assert!((12..200).all(|t| decompose_score(t).is_ok()));
    }
}
