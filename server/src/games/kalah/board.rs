use serde_json::Value;

use common::protocol::parse_pit_index;
use common::{BOARD_SLOTS, PitArray};

use super::types::{MoveError, Sowing};

pub const PIT_COUNT: usize = BOARD_SLOTS - 1;
pub const STORE: usize = BOARD_SLOTS - 1;
pub const INITIAL_STONES: u32 = 6;

/// One side of the board: six sowing pits and the store at index 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pits(PitArray);

impl Default for Pits {
    fn default() -> Self {
        let mut pits = [INITIAL_STONES; BOARD_SLOTS];
        pits[STORE] = 0;
        Self(pits)
    }
}

impl From<PitArray> for Pits {
    fn from(pits: PitArray) -> Self {
        Self(pits)
    }
}

impl Pits {
    pub fn as_array(&self) -> &PitArray {
        &self.0
    }

    pub fn store(&self) -> u32 {
        self.0[STORE]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// True once every sowing pit is empty.
    pub fn is_exhausted(&self) -> bool {
        self.0[..PIT_COUNT].iter().all(|&stones| stones == 0)
    }

    /// Resolves a raw move value to a sowable pit on this side.
    pub fn check_move(&self, raw: &Value) -> Result<usize, MoveError> {
        let index = parse_pit_index(raw).map_err(MoveError::InvalidPitIndex)?;
        let pos = usize::try_from(index)
            .ok()
            .filter(|&pos| pos < PIT_COUNT)
            .ok_or_else(|| MoveError::InvalidPitIndex(index.to_string()))?;
        if self.0[pos] == 0 {
            return Err(MoveError::EmptyPit(pos));
        }
        Ok(pos)
    }

    /// Sows the stones of `pos` around this side, store included, and applies
    /// the capture rule against `opponent`. `pos` must come from `check_move`.
    pub fn sow(&mut self, pos: usize, opponent: &mut Pits) -> Sowing {
        let size = self.0[pos] as usize;
        self.0[pos] = 0;
        for step in 1..=size {
            self.0[(pos + step) % BOARD_SLOTS] += 1;
        }

        let last_pit = (pos + size) % BOARD_SLOTS;
        if last_pit == STORE {
            return Sowing::ExtraTurn;
        }
        if self.0[last_pit] != 1 {
            return Sowing::Pass { last_pit };
        }

        let mirrored = PIT_COUNT - 1 - last_pit;
        let captured = opponent.0[mirrored];
        opponent.0[mirrored] = 0;
        self.0[last_pit] = 0;
        self.0[STORE] += captured + 1;
        Sowing::Capture { last_pit, captured }
    }
}

/// Seat whose store is strictly the largest, scanning seats in order.
/// Ties go to seat 0.
pub fn winning_seat(sides: [&Pits; 2]) -> usize {
    let mut winner = 0;
    for (seat, pits) in sides.iter().enumerate().skip(1) {
        if pits.store() > sides[winner].store() {
            winner = seat;
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_side() {
        let pits = Pits::default();
        assert_eq!(pits.as_array(), &[6, 6, 6, 6, 6, 6, 0]);
        assert_eq!(pits.total(), 36);
        assert!(!pits.is_exhausted());
    }

    #[test]
    fn test_sow_into_store_keeps_turn() {
        let mut own = Pits::default();
        let mut opponent = Pits::default();

        let sowing = own.sow(0, &mut opponent);

        assert_eq!(sowing, Sowing::ExtraTurn);
        assert!(!sowing.passes_turn());
        assert_eq!(own.as_array(), &[0, 7, 7, 7, 7, 7, 1]);
        assert_eq!(opponent, Pits::default());
    }

    #[test]
    fn test_sow_into_empty_pit_captures_mirrored_pit() {
        let mut own = Pits::from([0, 7, 7, 7, 7, 7, 1]);
        let mut opponent = Pits::default();

        let sowing = own.sow(1, &mut opponent);

        assert_eq!(sowing, Sowing::Capture { last_pit: 1, captured: 6 });
        assert!(sowing.passes_turn());
        assert_eq!(own.as_array(), &[1, 0, 8, 8, 8, 8, 9]);
        assert_eq!(opponent.as_array(), &[6, 6, 6, 6, 0, 6, 0]);
    }

    #[test]
    fn test_sow_into_occupied_pit_passes_turn() {
        let mut own = Pits::default();
        let mut opponent = Pits::default();

        let sowing = own.sow(2, &mut opponent);

        assert_eq!(sowing, Sowing::Pass { last_pit: 1 });
        assert_eq!(own.as_array(), &[7, 7, 0, 7, 7, 7, 1]);
        assert_eq!(opponent, Pits::default());
    }

    #[test]
    fn test_capture_of_empty_mirrored_pit_still_banks_last_stone() {
        let mut own = Pits::from([0, 0, 0, 0, 1, 0, 0]);
        let mut opponent = Pits::from([0, 0, 0, 0, 0, 0, 0]);

        let sowing = own.sow(4, &mut opponent);

        assert_eq!(sowing, Sowing::Capture { last_pit: 5, captured: 0 });
        assert_eq!(own.as_array(), &[0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_long_sow_wraps_and_skips_opponent_side() {
        let mut own = Pits::from([0, 0, 15, 0, 0, 0, 0]);
        let mut opponent = Pits::default();

        let sowing = own.sow(2, &mut opponent);

        // 15 stones: two full laps of 7 plus one more into pit 3.
        assert_eq!(own.as_array(), &[2, 2, 2, 3, 2, 2, 2]);
        assert_eq!(sowing, Sowing::Pass { last_pit: 3 });
        assert_eq!(opponent, Pits::default());
    }

    #[test]
    fn test_stones_are_conserved_across_both_sides() {
        let mut own = Pits::default();
        let mut opponent = Pits::default();
        let moves = [0, 1, 3, 5, 2, 4];
        for pos in moves {
            if own.check_move(&json!(pos)).is_ok() {
                own.sow(pos, &mut opponent);
            }
            assert_eq!(own.total() + opponent.total(), 72);
        }
    }

    #[test]
    fn test_check_move_rejects_out_of_range() {
        let pits = Pits::default();
        assert_eq!(
            pits.check_move(&json!(-1)),
            Err(MoveError::InvalidPitIndex("-1".to_string()))
        );
        assert_eq!(
            pits.check_move(&json!(6)),
            Err(MoveError::InvalidPitIndex("6".to_string()))
        );
    }

    #[test]
    fn test_check_move_rejects_non_numeric() {
        let pits = Pits::default();
        let err = pits.check_move(&json!("n/a")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid pit index: \"n/a\"");
    }

    #[test]
    fn test_check_move_rejects_empty_pit() {
        let pits = Pits::from([6, 6, 6, 6, 0, 6, 0]);
        let err = pits.check_move(&json!(4)).unwrap_err();
        assert_eq!(err, MoveError::EmptyPit(4));
        assert_eq!(err.to_string(), "No stones available at pit 4");
    }

    #[test]
    fn test_check_move_accepts_numeric_string() {
        let pits = Pits::default();
        assert_eq!(pits.check_move(&json!("5")), Ok(5));
    }

    #[test]
    fn test_exhausted_ignores_store() {
        assert!(Pits::from([0, 0, 0, 0, 0, 0, 30]).is_exhausted());
        assert!(!Pits::from([0, 0, 0, 0, 0, 1, 30]).is_exhausted());
    }

    #[test]
    fn test_winning_seat_prefers_larger_store() {
        let low = Pits::from([0, 0, 0, 0, 0, 0, 20]);
        let high = Pits::from([0, 0, 0, 0, 0, 0, 52]);
        assert_eq!(winning_seat([&low, &high]), 1);
        assert_eq!(winning_seat([&high, &low]), 0);
    }

    #[test]
    fn test_winning_seat_tie_goes_to_first_seat() {
        let a = Pits::from([0, 0, 0, 0, 0, 0, 36]);
        let b = Pits::from([0, 0, 0, 0, 0, 0, 36]);
        assert_eq!(winning_seat([&a, &b]), 0);
    }
}
