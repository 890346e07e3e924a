//! Terminal UI for roster using ratatui
//!
//! Provides the interactive table with search, sort, and the add/edit modal

use anyhow::Result;
use crossterm::{
    event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use tracing::warn;

use crate::form::{DeletePrompt, FormController, FormError, FormField, FormMode, SaveOutcome};
use crate::models::{EmployeeRecord, SortKey};
use crate::store::Store;
use crate::view;

/// Main TUI application state
pub struct TuiApp {
    store: Store,
    form: FormController,
    table_state: TableState,
    search: String,
    search_active: bool,
    sort: Option<SortKey>,
    delete_prompt: Option<DeletePrompt>,
    status_message: Option<String>,
    should_quit: bool,
}

impl TuiApp {
    /// Create a new TUI application over a loaded store
    pub fn new(store: Store, sort: Option<SortKey>) -> Self {
        let mut app = Self {
            store,
            form: FormController::new(),
            table_state: TableState::default(),
            search: String::new(),
            search_active: false,
            sort,
            delete_prompt: None,
            status_message: None,
            should_quit: false,
        };
        app.reset_selection();
        app
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Run event loop
        let res = self.run_app(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    /// Main event loop
    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let event::Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key)?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn delete_prompt(&self) -> Option<&DeletePrompt> {
        self.delete_prompt.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Rows currently shown, in display order
    pub fn visible(&self) -> Vec<&EmployeeRecord> {
        view::visible(self.store.records(), &self.search, self.sort)
    }

    pub fn selected_record(&self) -> Option<&EmployeeRecord> {
        let selected = self.table_state.selected()?;
        self.visible().get(selected).copied()
    }

    /// Dispatch a single key press; each press runs to completion
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // A notification swallows the next key, like a blocking alert
        if self.status_message.take().is_some() {
            return Ok(());
        }

        if self.delete_prompt.is_some() {
            return self.handle_delete_prompt_key(key);
        }

        if self.form.is_open() {
            return self.handle_form_key(key);
        }

        if self.search_active {
            self.handle_search_key(key);
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Down | KeyCode::Char('j') => self.next_row(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_row(),
            KeyCode::Char('/') => {
                self.search_active = true;
            }
            KeyCode::Char('s') => {
                self.sort = Some(self.sort.map_or(SortKey::Id, SortKey::next));
                self.reset_selection();
            }
            KeyCode::Char('a') => self.form.open_add(),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(record) = self.selected_record().cloned() {
                    self.form.open_edit(&record);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.delete_prompt = self.selected_record().map(DeletePrompt::new);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_delete_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        let confirmed = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return Ok(()),
        };
        if let Some(prompt) = self.delete_prompt.take() {
            if prompt.resolve(&mut self.store, confirmed)? {
                self.clamp_selection();
            }
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let focus = self.form.focus();
        match key.code {
            KeyCode::Esc => self.form.cancel(),
            KeyCode::Enter => self.save_form()?,
            KeyCode::Tab => self.form.focus_next(),
            KeyCode::BackTab => self.form.focus_previous(),
            KeyCode::Up if focus == Some(FormField::DateOfBirth) => self.form.step_date(1),
            KeyCode::Down if focus == Some(FormField::DateOfBirth) => self.form.step_date(-1),
            KeyCode::Up => self.form.focus_previous(),
            KeyCode::Down => self.form.focus_next(),
            KeyCode::Left if focus == Some(FormField::Gender) => self.form.cycle_gender(false),
            KeyCode::Right if focus == Some(FormField::Gender) => self.form.cycle_gender(true),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.input_char(c),
            _ => {}
        }
        Ok(())
    }

    fn save_form(&mut self) -> Result<()> {
        match self.form.save(&mut self.store) {
            Ok(SaveOutcome::Added(id)) => self.select_id(id),
            Ok(SaveOutcome::Updated { id, replaced }) => {
                if !replaced {
                    warn!(id, "edited employee no longer exists");
                }
                self.select_id(id);
            }
            Err(FormError::Storage(e)) => return Err(e),
            Err(e) => self.status_message = Some(e.to_string()),
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.search_active = false,
            KeyCode::Esc => {
                self.search.clear();
                self.search_active = false;
            }
            KeyCode::Backspace => {
                self.search.pop();
            }
            KeyCode::Char(c) => self.search.push(c),
            _ => return,
        }
        self.reset_selection();
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        // Main layout: header, toolbar, table, footer
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Search + sort
                Constraint::Min(0),    // Table
                Constraint::Length(3), // Footer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_toolbar(f, chunks[1]);
        self.render_table(f, chunks[2]);
        self.render_footer(f, chunks[3]);

        if self.form.is_open() {
            self.render_form(f);
        }

        if let Some(prompt) = &self.delete_prompt {
            render_delete_prompt(f, prompt);
        }

        if let Some(msg) = &self.status_message {
            render_status_message(f, msg);
        }
    }

    /// Render header
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new(format!("Employee Roster ({} total)", self.store.len()))
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        f.render_widget(title, area);
    }

    fn render_toolbar(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        let search_style = if self.search_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let search_text = if self.search.is_empty() && !self.search_active {
            "Search by name...".to_string()
        } else {
            self.search.clone()
        };
        let search = Paragraph::new(search_text)
            .block(Block::default().borders(Borders::ALL).title("Search"))
            .style(search_style);
        f.render_widget(search, chunks[0]);

        let sort_label = self.sort.map_or("Stored order", |s| s.label());
        let sort = Paragraph::new(format!("Sort by {}", sort_label))
            .block(Block::default().borders(Borders::ALL).title("Sort"));
        f.render_widget(sort, chunks[1]);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let rows: Vec<Row> = {
            let visible = self.visible();
            if visible.is_empty() {
                vec![Row::new(vec![Cell::from("No data")])
                    .style(Style::default().fg(Color::DarkGray))]
            } else {
                visible
                    .iter()
                    .map(|e| {
                        Row::new(vec![
                            Cell::from(e.id.to_string()),
                            Cell::from(e.name.clone()),
                            Cell::from(e.date_of_birth.clone()),
                            Cell::from(e.gender.label()),
                            Cell::from(e.email.clone()),
                            Cell::from(e.address.clone()),
                        ])
                    })
                    .collect()
            }
        };

        let header = Row::new(vec!["ID", "Name", "Date of birth", "Gender", "Email", "Address"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(22),
            Constraint::Length(13),
            Constraint::Length(8),
            Constraint::Percentage(25),
            Constraint::Percentage(30),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Employees"))
            .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    /// Render footer with keybindings
    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let footer_text = if self.form.is_open() {
            "  Tab/↑/↓: Field  ←/→: Gender  ↑/↓ on date: ±1 day  Enter: Save  Esc: Cancel"
        } else if self.search_active {
            "  Type to filter  Enter: Done  Esc: Clear"
        } else {
            "  ↑/↓: Navigate  /: Search  s: Sort  a: Add  e: Edit  d: Delete  q/Esc: Quit"
        };

        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(Color::White).bg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(footer, area);
    }

    /// Render the add/edit modal
    fn render_form(&self, f: &mut Frame) {
        let (Some(mode), Some(draft), Some(focus)) =
            (self.form.mode(), self.form.draft(), self.form.focus())
        else {
            return;
        };
        let area = centered_rect(60, 50, f.area());
        f.render_widget(Clear, area);

        let title = match mode {
            FormMode::Add => "Add Employee",
            FormMode::Edit => "Edit Employee",
        };

        let lines: Vec<Line> = FormField::ALL
            .iter()
            .map(|field| {
                let value = match field {
                    FormField::Name => draft.name.as_str(),
                    FormField::DateOfBirth => draft.date_of_birth.as_str(),
                    FormField::Gender => match draft.gender.label() {
                        "" => "Select",
                        label => label,
                    },
                    FormField::Email => draft.email.as_str(),
                    FormField::Address => draft.address.as_str(),
                };
                let required = if *field == FormField::Name { "*" } else { "" };
                let label = format!("{:<15}", format!("{}{}:", field.label(), required));
                let style = if *field == focus {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![Span::styled(label, style), Span::raw(value.to_string())])
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn select_id(&mut self, id: u64) {
        let position = self.visible().iter().position(|e| e.id == id);
        match position {
            Some(i) => self.table_state.select(Some(i)),
            None => self.clamp_selection(),
        }
    }

    fn reset_selection(&mut self) {
        let first = if self.visible().is_empty() { None } else { Some(0) };
        self.table_state.select(first);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        let selected = match (self.table_state.selected(), len) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.table_state.select(selected);
    }

    /// Navigate to next row
    fn next_row(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    /// Navigate to previous row
    fn previous_row(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }
}

fn render_delete_prompt(f: &mut Frame, prompt: &DeletePrompt) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(format!("{}\n\ny: Delete  n/Esc: Keep", prompt.message()))
        .block(Block::default().borders(Borders::ALL).title("Confirm"))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Render status message
fn render_status_message(f: &mut Frame, message: &str) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(format!("{}\n\nPress any key", message))
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
