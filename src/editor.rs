use crate::notes::Note;
use crate::progress::TimeUnit;
use crate::theme::{
    editor::{
        BULLET_STYLE, CURSOR_STYLE, FOCUS_STYLE, HINT_STYLE, PLACEHOLDER_STYLE, TITLE_STYLE,
    },
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, StatefulWidget, Widget, Wrap},
};
use std::mem::take;

const OUTER_WIDTH: u16 = 52;
const OUTER_HEIGHT: u16 = 16;

/// Columns to the left of the fields, holding the focus marker
const GUTTER_WIDTH: u16 = 2;

/// At most this many of the most recent items are shown
const MAX_ITEM_ROWS: usize = 3;

static FOCUS_MARKER: &str = "›";

static TITLE_PLACEHOLDER: &str = "Title";

static ITEM_PLACEHOLDER: &str = "Add a new item";

static PLACEHOLDER: &str = "Write something about this ";

static HINT: &str = "[ENTER] Save  [TAB] Next field  [ESC] Cancel";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct NoteEditor;

impl StatefulWidget for NoteEditor {
    type State = EditorState;

    /*
     * ....................................................
     * .┌────────── Day 292 / 365 Journal ───────────────┐.
     * .│   Hiking trip                                  │.
     * .│   • Pack water                                 │.
     * .│   + Add a new item                             │.
     * .│                                                │.
     * .│ › Went to the lake█                            │.
     * .│                                                │.
     * .│  [ENTER] Save  [TAB] Next field  [ESC] Cancel  │.
     * .└────────────────────────────────────────────────┘.
     * ....................................................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH.min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT.min(area.height)])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(format!(" {} ", state.title()))
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let inner = block_area.inner(Margin::new(2, 1));
        let [title_area, items_area, _, body_area, hint_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(state.item_rows()),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);
        let focus_row = match state.focus {
            Field::Title => title_area.y,
            Field::Items => items_area.bottom().saturating_sub(1),
            Field::Body => body_area.y,
        };
        let marker = Rect {
            x: inner.x,
            y: focus_row,
            width: 1,
            height: 1,
        };
        Line::styled(FOCUS_MARKER, FOCUS_STYLE).render(marker.intersection(inner), buf);
        Paragraph::new(state.title_line()).render(fields(title_area), buf);
        Paragraph::new(state.items_text()).render(fields(items_area), buf);
        Paragraph::new(state.body_text())
            .wrap(Wrap { trim: false })
            .render(fields(body_area), buf);
        Line::styled(HINT, HINT_STYLE)
            .centered()
            .render(hint_area, buf);
    }
}

/// The part of a row to the right of the gutter
fn fields(area: Rect) -> Rect {
    let [_, fields] =
        Layout::horizontal([Constraint::Length(GUTTER_WIDTH), Constraint::Min(0)]).areas(area);
    fields
}

/// A single-line input: its value followed by the cursor, or the cursor over
/// a placeholder when there is no value
fn field_line(value: &str, placeholder: &str, style: Style, focused: bool) -> Line<'static> {
    let cursor = focused.then(|| Span::styled(" ", CURSOR_STYLE));
    if value.is_empty() {
        Line::from_iter(
            cursor
                .into_iter()
                .chain([Span::styled(placeholder.to_owned(), PLACEHOLDER_STYLE)]),
        )
    } else {
        Line::from_iter(std::iter::once(Span::styled(value.to_owned(), style)).chain(cursor))
    }
}

/// Which part of the note keystrokes go to
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Title,
    Items,
    Body,
}

impl Field {
    fn next(self) -> Field {
        match self {
            Field::Title => Field::Items,
            Field::Items => Field::Body,
            Field::Body => Field::Title,
        }
    }

    fn prev(self) -> Field {
        match self {
            Field::Title => Field::Body,
            Field::Items => Field::Title,
            Field::Body => Field::Items,
        }
    }
}

/// The note being written for one cell.  Typing starts in the body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EditorState {
    unit: TimeUnit,
    index: u16,
    focus: Field,
    note: Note,
    new_item: String,
}

impl EditorState {
    /// Start editing the note for cell `index`, beginning from its current
    /// contents if it has any
    pub(crate) fn new(unit: TimeUnit, index: u16, note: Option<&Note>) -> EditorState {
        EditorState {
            unit,
            index,
            focus: Field::Body,
            note: note.cloned().unwrap_or_default(),
            new_item: String::new(),
        }
    }

    pub(crate) fn index(&self) -> u16 {
        self.index
    }

    fn title(&self) -> String {
        format!(
            "{} {} / {} Journal",
            self.unit.title(),
            self.index + 1,
            self.unit.total()
        )
    }

    fn item_rows(&self) -> u16 {
        u16::try_from(self.note.items.len().min(MAX_ITEM_ROWS) + 1).unwrap_or(1)
    }

    fn title_line(&self) -> Line<'static> {
        field_line(
            &self.note.title,
            TITLE_PLACEHOLDER,
            TITLE_STYLE,
            self.focus == Field::Title,
        )
    }

    fn items_text(&self) -> Text<'static> {
        let skip = self.note.items.len().saturating_sub(MAX_ITEM_ROWS);
        let mut lines = self
            .note
            .items
            .iter()
            .skip(skip)
            .map(|item| {
                Line::from_iter([
                    Span::styled("• ", BULLET_STYLE),
                    Span::styled(item.clone(), BASE_STYLE),
                ])
            })
            .collect::<Vec<_>>();
        let mut input = field_line(
            &self.new_item,
            ITEM_PLACEHOLDER,
            BASE_STYLE,
            self.focus == Field::Items,
        );
        input.spans.insert(0, Span::styled("+ ", BULLET_STYLE));
        lines.push(input);
        Text::from(lines)
    }

    fn body_text(&self) -> Text<'static> {
        let focused = self.focus == Field::Body;
        if self.note.text.is_empty() {
            let placeholder = format!("{PLACEHOLDER}{}…", self.unit.name());
            return Text::from(field_line("", &placeholder, BASE_STYLE, focused));
        }
        let mut lines = self
            .note
            .text
            .split('\n')
            .map(|ln| Line::styled(ln.to_owned(), BASE_STYLE))
            .collect::<Vec<_>>();
        if let Some(last) = lines.last_mut().filter(|_| focused) {
            last.push_span(Span::styled(" ", CURSOR_STYLE));
        }
        Text::from(lines)
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Title => &mut self.note.title,
            Field::Items => &mut self.new_item,
            Field::Body => &mut self.note.text,
        }
    }

    /// The finished note.  An item still being typed is kept.
    fn take_note(&mut self) -> Note {
        let mut note = take(&mut self.note);
        if !self.new_item.is_empty() {
            note.items.push(take(&mut self.new_item));
        }
        note
    }

    pub(crate) fn handle_input(&mut self, input: EditorInput) -> EditorOutput {
        match input {
            EditorInput::Char(c) if !c.is_control() => {
                self.focused_mut().push(c);
                EditorOutput::Ok
            }
            EditorInput::Char(_) => EditorOutput::Invalid,
            EditorInput::Backspace => {
                if self.focused_mut().pop().is_some()
                    || (self.focus == Field::Items && self.note.items.pop().is_some())
                {
                    EditorOutput::Ok
                } else {
                    EditorOutput::Invalid
                }
            }
            EditorInput::Enter if self.focus == Field::Items && !self.new_item.is_empty() => {
                let item = take(&mut self.new_item);
                self.note.items.push(item);
                EditorOutput::Ok
            }
            EditorInput::Enter => EditorOutput::Save(self.take_note()),
            EditorInput::NextField => {
                self.focus = self.focus.next();
                EditorOutput::Ok
            }
            EditorInput::PrevField => {
                self.focus = self.focus.prev();
                EditorOutput::Ok
            }
            EditorInput::Escape => EditorOutput::Cancel,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EditorInput {
    Char(char),
    Backspace,
    Enter,
    NextField,
    PrevField,
    Escape,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum EditorOutput {
    Ok,
    Invalid,
    Save(Note),
    Cancel,
}
