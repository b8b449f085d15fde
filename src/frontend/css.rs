//! Stylesheet generation for a [`BoardView`].
//!
//! Every cell widget carries the `board-cell` class plus a per-cell class
//! from [`cell_class`]; [`stylesheet`] emits one rule per cell with its
//! resolved colours and font size.
//!
//! | Selector               | Targets                               |
//! |------------------------|---------------------------------------|
//! | `.board-cell`          | Every cell                            |
//! | `.board-cell.empty`    | Cells without a button                |
//! | `.board-cell.inert`    | Buttons without an action             |
//! | `.cell-R-C`            | The cell at row `R`, column `C`       |

use crate::button::Position;
use crate::traits::BoardView;
use std::fmt::Write;

const BASE_CSS: &str = r#"
.board-cell {
    background-image: none;
    border-radius: 6px;
    box-shadow: none;
}
"#;

/// Per-cell CSS class.
pub fn cell_class(position: Position) -> String {
    format!("cell-{}-{}", position.row, position.col)
}

/// Full stylesheet for `view`.
pub fn stylesheet(view: &BoardView) -> String {
    let mut css = String::from(BASE_CSS);
    for cell in &view.cells {
        let class = cell_class(cell.position);
        // Writing to a String cannot fail.
        let _ = writeln!(
            css,
            ".{class}, .{class} label {{ background-color: {}; color: {}; font-size: {}px; }}",
            cell.bg_color, cell.fg_color, cell.font_size,
        );
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::traits::CellView;

    fn view() -> BoardView {
        let cell = |row, col, bg| CellView {
            position: Position::new(row, col),
            label: String::new(),
            bg_color: bg,
            fg_color: HexColor::rgb(0xff, 0xff, 0xff),
            font_size: 18,
            icon: None,
            actionable: false,
            populated: false,
        };
        BoardView {
            state: "main".into(),
            columns: 2,
            rows: 1,
            cells: vec![
                cell(0, 0, HexColor::rgb(0xaa, 0xaa, 0xff)),
                cell(0, 1, HexColor::rgb(0xcc, 0xcc, 0xcc)),
            ],
        }
    }

    #[test]
    fn class_names_encode_position() {
        assert_eq!(cell_class(Position::new(2, 7)), "cell-2-7");
    }

    #[test]
    fn one_rule_per_cell() {
        let css = stylesheet(&view());
        assert!(css.contains(".board-cell {"));
        assert!(css.contains(
            ".cell-0-0, .cell-0-0 label { background-color: #aaaaff; color: #ffffff; font-size: 18px; }"
        ));
        assert!(css.contains(".cell-0-1, .cell-0-1 label { background-color: #cccccc;"));
        assert_eq!(css.matches("label {").count(), 2);
    }
}
