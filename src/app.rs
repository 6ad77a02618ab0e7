use crate::editor::{EditorInput, EditorOutput, EditorState, NoteEditor};
use crate::grid::{Direction, GridShape, YearView};
use crate::help::Help;
use crate::notes::Note;
use crate::progress::{Clock, TimeUnit};
use crate::state::DotYear;
use crate::theme::BASE_STYLE;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Redraw at least this often even without input, so that the grid moves on
/// when the date changes
const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<C> {
    dotyear: DotYear<C>,
    notes_path: Option<PathBuf>,
    state: AppState,
}

impl<C: Clock> App<C> {
    /// If `notes_path` is set, all notes are written to it after each save
    pub(crate) fn new(dotyear: DotYear<C>, notes_path: Option<PathBuf>) -> App<C> {
        App {
            dotyear,
            notes_path,
            state: AppState::Grid,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            if poll(REFRESH_INTERVAL)? {
                self.handle_input()?;
            }
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = read()?
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Grid => match key {
                KeyCode::Char('h') | KeyCode::Left => self.step(Direction::Left),
                KeyCode::Char('l') | KeyCode::Right => self.step(Direction::Right),
                KeyCode::Char('k') | KeyCode::Up => self.step(Direction::Up),
                KeyCode::Char('j') | KeyCode::Down => self.step(Direction::Down),
                KeyCode::Char('0') | KeyCode::Home => self.dotyear.select_current().is_ok(),
                KeyCode::Char('d') => self.switch_unit(TimeUnit::Day),
                KeyCode::Char('m') => self.switch_unit(TimeUnit::Month),
                KeyCode::Char('w') => self.switch_unit(TimeUnit::Week),
                KeyCode::Tab => self.switch_unit(self.dotyear.unit().next()),
                KeyCode::Enter | KeyCode::Char(' ') => self.open_editor(),
                KeyCode::Esc if self.dotyear.selected().is_some() => {
                    self.dotyear.clear_selection();
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Grid;
                true
            }
            AppState::Editing(editor) => {
                let input = match key {
                    KeyCode::Char(c) => EditorInput::Char(c),
                    KeyCode::Backspace | KeyCode::Delete => EditorInput::Backspace,
                    KeyCode::Enter => EditorInput::Enter,
                    KeyCode::Tab | KeyCode::Down => EditorInput::NextField,
                    KeyCode::BackTab | KeyCode::Up => EditorInput::PrevField,
                    KeyCode::Esc => EditorInput::Escape,
                    _ => return false,
                };
                match editor.handle_input(input) {
                    EditorOutput::Ok => true,
                    EditorOutput::Invalid => false,
                    EditorOutput::Save(note) => {
                        let index = editor.index();
                        self.state = AppState::Grid;
                        self.save_note(index, note)
                    }
                    EditorOutput::Cancel => {
                        self.state = AppState::Grid;
                        true
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    /// Move the selection one cell over.  With nothing selected, the first
    /// move selects today.
    fn step(&mut self, dir: Direction) -> bool {
        let Some(current) = self.dotyear.selected() else {
            return self.dotyear.select_current().is_ok();
        };
        GridShape::for_unit(self.dotyear.unit())
            .step(current, dir)
            .is_some_and(|next| self.dotyear.select_cell(next).is_ok())
    }

    fn switch_unit(&mut self, unit: TimeUnit) -> bool {
        self.dotyear.select_unit(unit);
        true
    }

    fn open_editor(&mut self) -> bool {
        if self.dotyear.selected().is_none() && self.dotyear.select_current().is_err() {
            return false;
        }
        let Some(index) = self.dotyear.selected() else {
            return false;
        };
        let editor = EditorState::new(self.dotyear.unit(), index, self.dotyear.note(index));
        self.state = AppState::Editing(editor);
        true
    }

    // Returns `false` if the note could not be written to the note file; it
    // is kept in memory regardless
    fn save_note(&mut self, index: u16, note: Note) -> bool {
        if self.dotyear.save_note(index, note).is_err() {
            return false;
        }
        if let Some(path) = self.notes_path.as_deref() {
            if let Err(e) = self.dotyear.notes().save(path) {
                tracing::error!(error = ?e, "failed to save notes");
                return false;
            }
        }
        true
    }
}

impl<C: Clock> Widget for &mut App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        YearView::new(&self.dotyear).render(area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Editing(ref mut editor) = self.state {
            NoteEditor.render(area, buf, editor);
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Grid,
    Helping,
    Editing(EditorState),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NoteStore;
    use crate::progress::FixedClock;
    use time::macros::date;

    fn app() -> App<FixedClock> {
        App::new(
            DotYear::new(FixedClock(date!(2026 - 10 - 19)), NoteStore::new()),
            None,
        )
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn type_str(app: &mut App<FixedClock>, s: &str) {
        for c in s.chars() {
            assert!(app.handle_key(KeyCode::Char(c)), "typing {c:?} failed");
        }
    }

    #[test]
    fn test_first_move_selects_today() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.dotyear.selected(), Some(291));
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.dotyear.selected(), Some(292));
        assert!(app.handle_key(KeyCode::Char('k')));
        assert_eq!(app.dotyear.selected(), Some(272));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert_eq!(app.dotyear.selected(), Some(312));
        assert!(app.handle_key(KeyCode::Left));
        assert_eq!(app.dotyear.selected(), Some(311));
    }

    #[test]
    fn test_move_off_grid() {
        let mut app = app();
        app.dotyear.select_cell(3).unwrap();
        assert!(!app.handle_key(KeyCode::Up));
        assert_eq!(app.dotyear.selected(), Some(3));
        app.dotyear.select_cell(364).unwrap();
        assert!(!app.handle_key(KeyCode::Right));
        assert!(!app.handle_key(KeyCode::Down));
        assert_eq!(app.dotyear.selected(), Some(364));
    }

    #[test]
    fn test_home_selects_today() {
        let mut app = app();
        app.dotyear.select_cell(3).unwrap();
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(app.dotyear.selected(), Some(291));
        assert!(app.handle_key(KeyCode::Char('w')));
        assert!(app.handle_key(KeyCode::Char('0')));
        assert_eq!(app.dotyear.selected(), Some(42));
    }

    #[test]
    fn test_switch_units() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('m')));
        assert_eq!(app.dotyear.unit(), TimeUnit::Month);
        assert!(app.handle_key(KeyCode::Tab));
        assert_eq!(app.dotyear.unit(), TimeUnit::Week);
        assert!(app.handle_key(KeyCode::Tab));
        assert_eq!(app.dotyear.unit(), TimeUnit::Day);
        assert!(app.handle_key(KeyCode::Char('w')));
        assert_eq!(app.dotyear.unit(), TimeUnit::Week);
        assert!(app.handle_key(KeyCode::Char('d')));
        assert_eq!(app.dotyear.unit(), TimeUnit::Day);
    }

    #[test]
    fn test_write_note() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Enter));
        assert!(matches!(app.state, AppState::Editing(_)));
        // Grid keys are just text while editing
        type_str(&mut app, "Quiet day");
        assert_eq!(app.dotyear.unit(), TimeUnit::Day);
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Grid);
        assert_eq!(app.dotyear.note(291), Some(&Note::new("Quiet day")));
    }

    #[test]
    fn test_edit_existing_note() {
        let mut app = app();
        app.dotyear.select_unit(TimeUnit::Month);
        app.dotyear.save_note(2, Note::new("March")).unwrap();
        app.dotyear.select_cell(2).unwrap();
        assert!(app.handle_key(KeyCode::Char(' ')));
        assert!(app.handle_key(KeyCode::Backspace));
        assert!(app.handle_key(KeyCode::Backspace));
        type_str(&mut app, "ble");
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.dotyear.note(2), Some(&Note::new("Marble")));
    }

    #[test]
    fn test_write_titled_note_with_items() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('m')));
        assert!(app.handle_key(KeyCode::Enter));
        assert!(app.handle_key(KeyCode::BackTab));
        assert!(app.handle_key(KeyCode::BackTab));
        type_str(&mut app, "Harvest");
        assert!(app.handle_key(KeyCode::Tab));
        type_str(&mut app, "Apples");
        assert!(app.handle_key(KeyCode::Enter));
        type_str(&mut app, "Pears");
        assert!(app.handle_key(KeyCode::Enter));
        assert!(app.handle_key(KeyCode::Down));
        type_str(&mut app, "Busy month");
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Grid);
        assert_eq!(
            app.dotyear.note(9),
            Some(&Note {
                title: String::from("Harvest"),
                items: vec![String::from("Apples"), String::from("Pears")],
                text: String::from("Busy month"),
            })
        );
    }

    #[test]
    fn test_cancel_note() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Enter));
        type_str(&mut app, "Never mind");
        assert!(app.handle_key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Grid);
        assert_eq!(app.dotyear.note(291), None);
        assert_eq!(app.dotyear.notes().len(), 0);
    }

    #[test]
    fn test_invalid_editor_key() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Enter));
        assert!(!app.handle_key(KeyCode::F(1)));
        assert!(matches!(app.state, AppState::Editing(_)));
    }

    #[test]
    fn test_no_editor_after_year_end() {
        let mut app = App::new(
            DotYear::new(FixedClock(date!(2024 - 12 - 31)), NoteStore::new()),
            None,
        );
        assert!(!app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Grid);
        app.dotyear.select_cell(10).unwrap();
        assert!(app.handle_key(KeyCode::Enter));
        assert!(matches!(app.state, AppState::Editing(_)));
    }

    #[test]
    fn test_save_writes_note_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("notes.json");
        let mut app = App::new(
            DotYear::new(FixedClock(date!(2026 - 10 - 19)), NoteStore::new()),
            Some(path.clone()),
        );
        assert!(app.handle_key(KeyCode::Char('w')));
        assert!(app.handle_key(KeyCode::Enter));
        type_str(&mut app, "Week 43");
        assert!(app.handle_key(KeyCode::Enter));
        let store = NoteStore::load(&path).unwrap();
        assert_eq!(store.get(TimeUnit::Week, 42), Some(&Note::new("Week 43")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_to_unwritable_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("missing-dir").join("notes.json");
        let mut app = App::new(
            DotYear::new(FixedClock(date!(2026 - 10 - 19)), NoteStore::new()),
            Some(path),
        );
        assert!(app.handle_key(KeyCode::Enter));
        type_str(&mut app, "x");
        assert!(!app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Grid);
        assert_eq!(app.dotyear.note(291), Some(&Note::new("x")));
    }

    #[test]
    fn test_escape_deselects_then_quits() {
        let mut app = app();
        app.dotyear.select_cell(7).unwrap();
        assert!(app.handle_key(KeyCode::Esc));
        assert_eq!(app.dotyear.selected(), None);
        assert!(!app.quitting());
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.quitting());
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('q')));
        assert_eq!(app.state, AppState::Grid);
        assert!(!app.quitting());
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
        assert!(!app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn test_render_editor_over_grid() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Enter));
        type_str(&mut app, "Hi");
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert_eq!(row(&buffer, 0).trim(), "Monday, 19.10");
        assert!(row(&buffer, 5).contains(" Day 292 / 365 Journal "));
        assert!(row(&buffer, 9).contains("│ › Hi "));
        assert_eq!(buffer[(0, 0)].bg, ratatui::style::Color::Black);
    }

    #[test]
    fn test_render_help_over_grid() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('?')));
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert!(row(&buffer, 4).contains(" Commands "));
        assert!(row(&buffer, 23).contains("Press ? for help"));
    }
}
