use crate::notes::{Note, NoteStore};
use crate::progress::{Clock, Progress, TimeUnit};
use thiserror::Error;
use time::Date;

/// Everything the user can change: the active granularity, the selected cell,
/// and the notes.  "Today" is asked of the clock afresh on every query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DotYear<C> {
    clock: C,
    unit: TimeUnit,
    selected: Option<u16>,
    notes: NoteStore,
}

impl<C: Clock> DotYear<C> {
    pub(crate) fn new(clock: C, notes: NoteStore) -> DotYear<C> {
        DotYear {
            clock,
            unit: TimeUnit::Day,
            selected: None,
            notes,
        }
    }

    pub(crate) fn today(&self) -> Date {
        self.clock.today()
    }

    pub(crate) fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub(crate) fn progress(&self) -> Progress {
        Progress::for_date(self.unit, self.today())
    }

    pub(crate) fn selected(&self) -> Option<u16> {
        self.selected
    }

    pub(crate) fn notes(&self) -> &NoteStore {
        &self.notes
    }

    pub(crate) fn note(&self, index: u16) -> Option<&Note> {
        self.notes.get(self.unit, index)
    }

    pub(crate) fn has_note(&self, index: u16) -> bool {
        self.notes.contains(self.unit, index)
    }

    /// Switch granularity.  The selection is cleared, as cell indices mean
    /// different things in different grids.
    pub(crate) fn select_unit(&mut self, unit: TimeUnit) {
        if unit != self.unit {
            tracing::debug!(from = %self.unit, to = %unit, "switching granularity");
            self.unit = unit;
            self.selected = None;
        }
    }

    pub(crate) fn select_cell(&mut self, index: u16) -> Result<(), CellOutOfRange> {
        self.check_index(index)?;
        self.selected = Some(index);
        Ok(())
    }

    /// Select the cell containing today
    pub(crate) fn select_current(&mut self) -> Result<(), CellOutOfRange> {
        let progress = self.progress();
        match progress.current() {
            Some(i) => self.select_cell(i),
            None => Err(CellOutOfRange {
                unit: self.unit,
                index: progress.elapsed(),
            }),
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub(crate) fn save_note(&mut self, index: u16, note: Note) -> Result<(), CellOutOfRange> {
        self.check_index(index)?;
        tracing::info!(
            unit = %self.unit,
            index,
            len = note.text.len(),
            items = note.items.len(),
            "saving note"
        );
        self.notes.set(self.unit, index, note);
        Ok(())
    }

    fn check_index(&self, index: u16) -> Result<(), CellOutOfRange> {
        if index < self.unit.total() {
            Ok(())
        } else {
            Err(CellOutOfRange {
                unit: self.unit,
                index,
            })
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("there is no {unit} {index} in the year")]
pub(crate) struct CellOutOfRange {
    pub(crate) unit: TimeUnit,
    pub(crate) index: u16,
}
