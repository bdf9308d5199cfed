//! Lays panels out in rows.
use super::style::{Block, Span, StyledLine};

/// Gap between panels of one row.
pub const SEPARATOR: &str = "  ";

/// Arrange `panels` into rows of `columns` and flatten them into lines.
///
/// A short final row is completed with blank panels, and panels shorter than the
/// tallest in their row get blank lines, so every row group is a full rectangle.
/// Row groups are separated by one empty line.
pub fn compose(panels: &[Block], columns: usize) -> Vec<StyledLine> {
    let columns = columns.max(1);
    let Some(width) = panels.iter().map(Block::width).max() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    for (group, row) in panels.chunks(columns).enumerate() {
        if group > 0 {
            lines.push(StyledLine::new());
        }

        let height = row.iter().map(Block::height).max().unwrap_or(0);
        let mut cells: Vec<Block> = row.to_vec();
        cells.resize_with(columns, || Block::blank(width, height));
        for cell in &mut cells {
            cell.pad_to(height);
        }

        for index in 0..height {
            let mut line = StyledLine::new();
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    line.push(Span::plain(SEPARATOR));
                }
                line.extend(cell.lines()[index].fit(width));
            }
            lines.push(line);
        }
    }
    lines
}
