//! Shared crate-wide constants.

use std::time::Duration;

/// Smallest width a bordered window may take. Leaves room for the corners,
/// a few caption glyphs and the resize grip.
pub const MIN_BORDERED_WIDTH: u16 = 12;

/// Smallest height a bordered window may take: the caption row plus the
/// bottom border.
pub const MIN_BORDERED_HEIGHT: u16 = 2;

/// Offset (in cells, applied to both axes) between consecutive
/// auto-positioned windows.
///
/// Each window that asks the desktop to choose its position is placed this
/// many columns and rows further from the inner top-left corner than the
/// previous one, producing a cascade.
pub const AUTO_POSITION_STEP: i32 = 2;

/// Space (in cells) the cascade keeps free before starting over.
///
/// Once the cascade offset reaches the desktop's inner width or height minus
/// this reserve, the next auto-positioned window goes back to the corner.
pub const AUTO_POSITION_RESERVE: i32 = 10;

/// Maximum delay between two clicks of the same button on the same cell for
/// the second one to be reported as a double click.
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);
