//! Pure rendering: styled text model, sparklines, panels and the grid.
pub mod grid;
pub mod panel;
pub mod sparkline;
pub mod style;

pub use grid::compose;
pub use style::{AnsiPaint, Block, Paint, PlainPaint, Span, StyledLine};
