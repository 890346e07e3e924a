//! Add/edit modal and delete confirmation
//!
//! The modal is either closed or open in add or edit mode with a draft:
//! - closed -> open(add): empty draft
//! - closed -> open(edit): draft copied from the selected record
//! - open -> closed (cancel): draft discarded, store untouched
//! - open -> closed (save): only when the trimmed name is non-empty
//!
//! Deletion skips the modal and goes through [`DeletePrompt`] instead.

use anyhow::Result;
use chrono::{Days, NaiveDate};
use tracing::{debug, info};

use crate::models::{EmployeeDraft, EmployeeRecord};
use crate::store::Store;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("No form is open")]
    NotOpen,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

/// Form inputs in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    DateOfBirth,
    Gender,
    Email,
    Address,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::DateOfBirth,
        FormField::Gender,
        FormField::Email,
        FormField::Address,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::DateOfBirth => "Date of birth",
            FormField::Gender => "Gender",
            FormField::Email => "Email",
            FormField::Address => "Address",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open {
        mode: FormMode,
        draft: EmployeeDraft,
        focus: FormField,
    },
}

/// Result of a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Added(u64),
    Updated { id: u64, replaced: bool },
}

#[derive(Debug)]
pub struct FormController {
    state: ModalState,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    pub fn mode(&self) -> Option<FormMode> {
        match &self.state {
            ModalState::Open { mode, .. } => Some(*mode),
            ModalState::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&EmployeeDraft> {
        match &self.state {
            ModalState::Open { draft, .. } => Some(draft),
            ModalState::Closed => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut EmployeeDraft> {
        match &mut self.state {
            ModalState::Open { draft, .. } => Some(draft),
            ModalState::Closed => None,
        }
    }

    pub fn focus(&self) -> Option<FormField> {
        match &self.state {
            ModalState::Open { focus, .. } => Some(*focus),
            ModalState::Closed => None,
        }
    }

    pub fn open_add(&mut self) {
        self.state = ModalState::Open {
            mode: FormMode::Add,
            draft: EmployeeDraft::default(),
            focus: FormField::Name,
        };
    }

    pub fn open_edit(&mut self, record: &EmployeeRecord) {
        self.state = ModalState::Open {
            mode: FormMode::Edit,
            draft: EmployeeDraft::from(record),
            focus: FormField::Name,
        };
    }

    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("form cancelled");
        }
        self.state = ModalState::Closed;
    }

    /// Validate and commit the draft, closing the modal on success
    ///
    /// A rejected save leaves the modal open with the draft intact.
    pub fn save(&mut self, store: &mut Store) -> Result<SaveOutcome, FormError> {
        let (mode, draft) = match &self.state {
            ModalState::Open { mode, draft, .. } => (*mode, draft),
            ModalState::Closed => return Err(FormError::NotOpen),
        };
        if !draft.has_name() {
            info!("save rejected: empty name");
            return Err(FormError::EmptyName);
        }

        let outcome = match (mode, draft.id) {
            (FormMode::Edit, Some(id)) => {
                let replaced = store.update(draft.clone().into_record(id))?;
                SaveOutcome::Updated { id, replaced }
            }
            _ => SaveOutcome::Added(store.add(draft.clone())?),
        };
        self.state = ModalState::Closed;
        Ok(outcome)
    }

    pub fn focus_next(&mut self) {
        if let ModalState::Open { focus, .. } = &mut self.state {
            *focus = focus.next();
        }
    }

    pub fn focus_previous(&mut self) {
        if let ModalState::Open { focus, .. } = &mut self.state {
            *focus = focus.previous();
        }
    }

    /// Type a character into the focused field
    pub fn input_char(&mut self, c: char) {
        let ModalState::Open { draft, focus, .. } = &mut self.state else {
            return;
        };
        match focus {
            FormField::Name => draft.name.push(c),
            FormField::DateOfBirth => {
                if c.is_ascii_digit() || c == '-' {
                    draft.date_of_birth.push(c);
                }
            }
            FormField::Gender => {
                if let Ok(gender) = c.to_string().parse() {
                    draft.gender = gender;
                }
            }
            FormField::Email => draft.email.push(c),
            FormField::Address => draft.address.push(c),
        }
    }

    pub fn backspace(&mut self) {
        let ModalState::Open { draft, focus, .. } = &mut self.state else {
            return;
        };
        match focus {
            FormField::Name => {
                draft.name.pop();
            }
            FormField::DateOfBirth => {
                draft.date_of_birth.pop();
            }
            FormField::Gender => draft.gender = Default::default(),
            FormField::Email => {
                draft.email.pop();
            }
            FormField::Address => {
                draft.address.pop();
            }
        }
    }

    pub fn cycle_gender(&mut self, forward: bool) {
        if let Some(draft) = self.draft_mut() {
            draft.gender = if forward {
                draft.gender.next()
            } else {
                draft.gender.previous()
            };
        }
    }

    /// Move the date of birth by whole days, starting from today when unset
    pub fn step_date(&mut self, days: i64) {
        step_date_with_today(self, days, chrono::Local::now().date_naive());
    }
}

fn step_date_with_today(form: &mut FormController, days: i64, today: NaiveDate) {
    let Some(draft) = form.draft_mut() else {
        return;
    };
    let current = NaiveDate::parse_from_str(draft.date_of_birth.trim(), DATE_FORMAT).unwrap_or(today);
    let delta = Days::new(days.unsigned_abs());
    let stepped = if days >= 0 {
        current.checked_add_days(delta)
    } else {
        current.checked_sub_days(delta)
    };
    if let Some(date) = stepped {
        draft.date_of_birth = date.format(DATE_FORMAT).to_string();
    }
}

/// Pending delete awaiting a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub id: u64,
    pub name: String,
}

impl DeletePrompt {
    pub fn new(record: &EmployeeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
        }
    }

    pub fn message(&self) -> String {
        format!("Delete {} (id {})? This cannot be undone.", self.name, self.id)
    }

    /// Remove the record only when `confirmed`; returns whether anything was removed
    pub fn resolve(self, store: &mut Store, confirmed: bool) -> Result<bool> {
        if !confirmed {
            debug!(id = self.id, "delete declined");
            return Ok(false);
        }
        store.remove(self.id)
    }
}
