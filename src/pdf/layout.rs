//! Page geometry and text metrics for the summary table
//!
//! Units are PDF points (1/72 in). The origin is the bottom-left corner of the page.

/// A4 landscape
pub const PAGE_WIDTH: f32 = 842.0;
pub const PAGE_HEIGHT: f32 = 595.0;
pub const MARGIN: f32 = 42.5;

pub const TITLE_SIZE: f32 = 20.0;
pub const SUBTITLE_SIZE: f32 = 14.0;
pub const STAMP_SIZE: f32 = 10.0;
pub const HEADER_SIZE: f32 = 11.0;
pub const BODY_SIZE: f32 = 10.0;

pub const HEADER_HEIGHT: f32 = 24.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const CELL_PADDING: f32 = 8.5;

/// Top edge of the table on the first page, below the title block
pub const FIRST_TABLE_TOP: f32 = PAGE_HEIGHT - 113.0;
/// Top edge of the table on continuation pages
pub const NEXT_TABLE_TOP: f32 = PAGE_HEIGHT - MARGIN;

/// Fraction of each column in the table width: team, agent, previous, annualized
const COLUMN_SHARES: [f32; 4] = [0.20, 0.36, 0.22, 0.22];

/// Horizontal placement of a column's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub const COLUMN_ALIGN: [Align; 4] = [Align::Left, Align::Left, Align::Right, Align::Right];

/// Left edge and width of one table column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub x: f32,
    pub width: f32,
}

impl Column {
    /// X coordinate where text of the given width starts
    pub fn text_x(&self, text_width: f32, align: Align) -> f32 {
        match align {
            Align::Left => self.x + CELL_PADDING,
            Align::Right => self.x + self.width - CELL_PADDING - text_width,
        }
    }
}

pub fn table_width() -> f32 {
    PAGE_WIDTH - 2.0 * MARGIN
}

pub fn columns() -> [Column; 4] {
    let width = table_width();
    let mut x = MARGIN;
    COLUMN_SHARES.map(|share| {
        let column = Column { x, width: width * share };
        x += column.width;
        column
    })
}

/// Number of body rows that fit below a table top, after the header
pub fn rows_fitting(table_top: f32) -> usize {
    let available = table_top - HEADER_HEIGHT - MARGIN;
    if available <= 0.0 {
        0
    } else {
        (available / ROW_HEIGHT).floor() as usize
    }
}

/// Split `count` table lines (body rows plus totals) into per-page chunk sizes
///
/// The first page has less room because of the title block. Always yields at
/// least one page so the header is drawn even for an empty report.
pub fn paginate(count: usize) -> Vec<usize> {
    let first = rows_fitting(FIRST_TABLE_TOP).max(1);
    let next = rows_fitting(NEXT_TABLE_TOP).max(1);

    let mut pages = vec![count.min(first)];
    let mut remaining = count.saturating_sub(first);
    while remaining > 0 {
        let take = remaining.min(next);
        pages.push(take);
        remaining -= take;
    }
    pages
}

/// Approximate width of text set in Helvetica, in points
///
/// Uses the standard AFM advance widths for the common characters and an average
/// for everything else; good enough for right-aligning figures.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| char_units(c, bold)).sum();
    units as f32 * size / 1000.0
}

fn char_units(c: char, bold: bool) -> u32 {
    match c {
        '0'..='9' | '$' => 556,
        ',' | '.' | ' ' => 278,
        '-' => 333,
        'i' | 'j' | 'l' => {
            if bold {
                278
            } else {
                222
            }
        }
        'I' => 278,
        'f' | 't' | 'r' => {
            if bold {
                389
            } else {
                333
            }
        }
        'm' => 889,
        'w' => 778,
        'M' => 833,
        'W' => 944,
        c if c.is_ascii_uppercase() => {
            if bold {
                722
            } else {
                667
            }
        }
        c if c.is_ascii_lowercase() => {
            if bold {
                611
            } else {
                556
            }
        }
        _ => 556,
    }
}
