use crate::widgets::shared::calendar::{GRID_COLUMNS, GRID_ROWS};

pub(super) const TRIGGER_ROW: u16 = 0;
pub(super) const HEADER_ROW: u16 = 1;
pub(super) const WEEKDAY_ROW: u16 = 2;
pub(super) const FIRST_GRID_ROW: u16 = 3;
pub(super) const FOOTER_ROW: u16 = FIRST_GRID_ROW + GRID_ROWS as u16;

pub(super) const GRID_LEFT: u16 = 2;
pub(super) const CELL_WIDTH: u16 = 4;
/// Width of the month title between the two arrows.
pub(super) const TITLE_WIDTH: usize = 22;

const PREV_COLS: (u16, u16) = (GRID_LEFT, GRID_LEFT + 1);
const NEXT_COLS: (u16, u16) = (
    GRID_LEFT + 2 + TITLE_WIDTH as u16,
    GRID_LEFT + 4 + TITLE_WIDTH as u16,
);

pub(super) const TODAY_LABEL: &str = "[Today]";
pub(super) const CLEAR_LABEL: &str = "[Clear]";
pub(super) const FOOTER_GAP: &str = "  ";

/// What a widget-local pointer position lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Hit {
    Trigger,
    PrevMonth,
    NextMonth,
    Cell(usize),
    Today,
    Clear,
    Panel,
}

/// Hit test against the open panel layout. `with_clear` mirrors whether the
/// footer currently shows the clear button.
pub(super) fn hit_test(row: u16, col: u16, open: bool, with_clear: bool) -> Option<Hit> {
    if row == TRIGGER_ROW {
        return Some(Hit::Trigger);
    }
    if !open {
        return None;
    }
    match row {
        HEADER_ROW if (PREV_COLS.0..=PREV_COLS.1).contains(&col) => Some(Hit::PrevMonth),
        HEADER_ROW if (NEXT_COLS.0..=NEXT_COLS.1).contains(&col) => Some(Hit::NextMonth),
        HEADER_ROW | WEEKDAY_ROW => Some(Hit::Panel),
        r if (FIRST_GRID_ROW..FOOTER_ROW).contains(&r) => {
            if col < GRID_LEFT {
                return Some(Hit::Panel);
            }
            let column = ((col - GRID_LEFT) / CELL_WIDTH) as usize;
            if column >= GRID_COLUMNS {
                return Some(Hit::Panel);
            }
            let grid_row = (r - FIRST_GRID_ROW) as usize;
            Some(Hit::Cell(grid_row * GRID_COLUMNS + column))
        }
        FOOTER_ROW => {
            let today_start = GRID_LEFT;
            let today_end = today_start + TODAY_LABEL.len() as u16;
            let clear_start = today_end + FOOTER_GAP.len() as u16;
            let clear_end = clear_start + CLEAR_LABEL.len() as u16;
            if (today_start..today_end).contains(&col) {
                Some(Hit::Today)
            } else if with_clear && (clear_start..clear_end).contains(&col) {
                Some(Hit::Clear)
            } else {
                Some(Hit::Panel)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{Hit, hit_test};

    #[test]
    fn trigger_row_always_hits_trigger() {
        assert_eq!(hit_test(0, 40, false, false), Some(Hit::Trigger));
        assert_eq!(hit_test(3, 4, false, false), None);
    }

    #[test]
    fn grid_cells_map_row_major() {
        assert_eq!(hit_test(3, 2, true, false), Some(Hit::Cell(0)));
        assert_eq!(hit_test(3, 5, true, false), Some(Hit::Cell(0)));
        assert_eq!(hit_test(3, 6, true, false), Some(Hit::Cell(1)));
        assert_eq!(hit_test(8, 29, true, false), Some(Hit::Cell(41)));
        assert_eq!(hit_test(8, 30, true, false), Some(Hit::Panel));
    }

    #[test]
    fn header_and_footer_buttons() {
        assert_eq!(hit_test(1, 2, true, false), Some(Hit::PrevMonth));
        assert_eq!(hit_test(1, 27, true, false), Some(Hit::NextMonth));
        assert_eq!(hit_test(1, 12, true, false), Some(Hit::Panel));
        assert_eq!(hit_test(9, 3, true, false), Some(Hit::Today));
        assert_eq!(hit_test(9, 12, true, false), Some(Hit::Panel));
        assert_eq!(hit_test(9, 12, true, true), Some(Hit::Clear));
        assert_eq!(hit_test(10, 0, true, true), None);
    }
}
