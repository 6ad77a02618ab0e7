use super::{GridShape, CELL_WIDTH};
use crate::notes::Note;
use crate::progress::{header_date, CellState, Clock, Progress, TimeUnit};
use crate::state::DotYear;
use crate::theme::{
    dots::{CURRENT_STYLE, FUTURE_STYLE, PAST_STYLE, SELECTED_STYLE},
    ACTIVE_TAB_STYLE, BASE_STYLE, DATE_STYLE, INACTIVE_TAB_STYLE, LEFT_STYLE, STATUS_STYLE,
    TAGLINE_STYLE, YEAR_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Widget,
};

const DOT: &str = "●";

/// Minimum width of the column in which everything is drawn, wide enough for
/// the tagline
const MIN_CONTENT_WIDTH: u16 = 40;

/// Lines above the grid: the date, the tagline, and the unit tabs
const HEADER_LINES: u16 = 3;

/// Columns between adjacent unit tabs
const TAB_GAP: u16 = 2;

/// The main screen: a header, the dot grid for the active unit, the number of
/// units left, and a line describing the selected cell
#[derive(Debug)]
pub(crate) struct YearView<'a, C> {
    dotyear: &'a DotYear<C>,
}

impl<'a, C: Clock> YearView<'a, C> {
    pub(crate) fn new(dotyear: &'a DotYear<C>) -> Self {
        YearView { dotyear }
    }

    fn status(&self, progress: &Progress) -> String {
        let unit = progress.unit();
        match self.dotyear.selected() {
            Some(i) => {
                let label = format!("{} {} / {}", unit.title(), i + 1, progress.total());
                match self.dotyear.note(i).map(Note::summary) {
                    Some("") => format!("{label}: (empty note)"),
                    Some(first) => format!("{label}: {first}"),
                    None => format!("{label}: no note yet, press ENTER to write one"),
                }
            }
            None => String::from("Press ? for help"),
        }
    }
}

impl<C: Clock> Widget for YearView<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let progress = self.dotyear.progress();
        let unit = progress.unit();
        let today = self.dotyear.today();
        let shape = GridShape::for_unit(unit);
        let width = shape.width().max(MIN_CONTENT_WIDTH);
        let left = area.width.saturating_sub(width) / 2;
        let area = Rect {
            x: area.x + left,
            width: area.width - left,
            ..area
        };
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.mvprint(0, 0, header_date(today), DATE_STYLE);
        canvas.mvprint(
            1,
            0,
            format!("Track your year, one {unit} at a time."),
            TAGLINE_STYLE,
        );
        canvas.draw_tabs(2, unit);
        for (i, state) in progress.cells() {
            let (row, col) = shape.position(i);
            canvas.draw_cell(
                HEADER_LINES + row,
                col * CELL_WIDTH,
                state,
                self.dotyear.selected() == Some(i),
                self.dotyear.has_note(i),
            );
        }
        let footer = HEADER_LINES + shape.rows();
        canvas.mvprint(footer, 0, today.year().to_string(), YEAR_STYLE);
        let remaining = progress.remaining();
        let units = if remaining == 1 {
            unit.name()
        } else {
            unit.plural()
        };
        let left_msg = format!("{remaining} {units} left");
        canvas.mvprint(
            footer,
            width.saturating_sub(text_width(&left_msg)),
            left_msg,
            LEFT_STYLE,
        );
        canvas.mvprint(footer + 1, 0, self.status(&progress), STATUS_STYLE);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_tabs(&mut self, y: u16, active: TimeUnit) {
        let mut x = 0;
        for unit in TimeUnit::ALL {
            let label = format!(" {} ", unit.plural());
            let style = if unit == active {
                ACTIVE_TAB_STYLE
            } else {
                INACTIVE_TAB_STYLE
            };
            let w = text_width(&label);
            self.mvprint(y, x, label, style);
            x = x.saturating_add(w).saturating_add(TAB_GAP);
        }
    }

    fn draw_cell(&mut self, y: u16, x: u16, state: CellState, selected: bool, noted: bool) {
        let mut style = match state {
            CellState::Past => PAST_STYLE,
            CellState::Current => CURRENT_STYLE,
            CellState::Future => FUTURE_STYLE,
        };
        if noted {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        let (open, close, frame) = if selected {
            style = style.add_modifier(Modifier::BOLD);
            ("[", "]", SELECTED_STYLE)
        } else {
            (" ", " ", BASE_STYLE)
        };
        self.mvprint(y, x, open, frame);
        self.mvprint(y, x + 1, DOT, style);
        self.mvprint(y, x + 2, close, frame);
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            self.buf.set_stringn(
                x + self.area.x,
                y + self.area.y,
                s,
                usize::from(self.area.width - x),
                style,
            );
        }
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(Line::raw(s).width()).unwrap_or(u16::MAX)
}
