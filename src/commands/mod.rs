//! CLI commands for roster

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use tracing::info;

use crate::config::{load_config, save_config, Config, RosterPaths};
use crate::db::Database;
use crate::form::{DeletePrompt, FormController, FormError, SaveOutcome};
use crate::models::{EmployeeDraft, EmployeeRecord, Gender, SortKey};
use crate::store::Store;
use crate::tui::TuiApp;
use crate::view;

/// Output format for show/list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Field values supplied on the command line; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct FieldArgs {
    pub name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl FieldArgs {
    fn apply(self, draft: &mut EmployeeDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(dob) = self.dob {
            draft.date_of_birth = dob;
        }
        if let Some(gender) = self.gender {
            draft.gender = gender;
        }
        if let Some(email) = self.email {
            draft.email = email;
        }
        if let Some(address) = self.address {
            draft.address = address;
        }
    }
}

/// Initialize roster for first-time setup
pub fn init(paths: &RosterPaths) -> Result<()> {
    if paths.is_initialized() {
        println!("Roster is already initialized at {}", paths.root.display());
        return Ok(());
    }

    println!("Initializing roster at {}...", paths.root.display());

    paths.ensure_dirs()?;
    println!("  Created directory structure");

    if !paths.config.exists() {
        save_config(paths, &Config::default())?;
        println!("  Created config.toml");
    }

    Database::open(paths)?;
    println!("  Created database");
    info!(root = %paths.root.display(), "initialized roster");

    println!();
    println!("Roster initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  roster add --name <name>      Add an employee");
    println!("  roster list                   List employees");
    println!("  roster tui                    Open the dashboard");

    Ok(())
}

/// Open the dashboard
pub fn tui(paths: &RosterPaths) -> Result<()> {
    let (store, config) = open_store(paths)?;
    let mut app = TuiApp::new(store, config.sort_key());
    app.run()
}

/// List employees, filtered by name and sorted
pub fn list(
    paths: &RosterPaths,
    search: Option<&str>,
    sort: Option<SortKey>,
    format: OutputFormat,
) -> Result<()> {
    let (store, config) = open_store(paths)?;
    let sort = sort.or_else(|| config.sort_key());
    let rows = view::visible(store.records(), search.unwrap_or(""), sort);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<6} {:<24} {:<12} {:<8} {:<28} {:<24}",
        "ID", "NAME", "DOB", "GENDER", "EMAIL", "ADDRESS"
    );
    println!("{}", "-".repeat(107));

    if rows.is_empty() {
        println!("No data");
        return Ok(());
    }

    for e in rows {
        println!(
            "{:<6} {:<24} {:<12} {:<8} {:<28} {:<24}",
            e.id,
            truncate(&e.name, 22),
            e.date_of_birth,
            e.gender.label(),
            truncate(&e.email, 26),
            truncate(&e.address, 22)
        );
    }

    Ok(())
}

/// Show an employee by ID
pub fn show(paths: &RosterPaths, id: u64, format: OutputFormat) -> Result<()> {
    let (store, _) = open_store(paths)?;
    let record = store
        .get(id)
        .with_context(|| format!("Employee not found: {}", id))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Summary => print_employee_summary(record),
    }
    Ok(())
}

/// Add an employee through the same validation as the form
pub fn add(paths: &RosterPaths, fields: FieldArgs) -> Result<u64> {
    let (mut store, _) = open_store(paths)?;
    let mut form = FormController::new();
    form.open_add();
    if let Some(draft) = form.draft_mut() {
        fields.apply(draft);
    }

    match commit(&mut form, &mut store)? {
        SaveOutcome::Added(id) => {
            println!("Added employee {}", id);
            Ok(id)
        }
        SaveOutcome::Updated { id, .. } => Ok(id),
    }
}

/// Edit an existing employee; omitted fields keep their values
pub fn edit(paths: &RosterPaths, id: u64, fields: FieldArgs) -> Result<()> {
    let (mut store, _) = open_store(paths)?;
    let record = store
        .get(id)
        .cloned()
        .with_context(|| format!("Employee not found: {}", id))?;

    let mut form = FormController::new();
    form.open_edit(&record);
    if let Some(draft) = form.draft_mut() {
        fields.apply(draft);
    }

    commit(&mut form, &mut store)?;
    println!("Updated employee {}", id);
    Ok(())
}

/// Remove an employee after confirmation
pub fn remove(paths: &RosterPaths, id: u64, assume_yes: bool) -> Result<()> {
    let (mut store, _) = open_store(paths)?;
    let prompt = match store.get(id) {
        Some(record) => DeletePrompt::new(record),
        None => {
            println!("No employee with id {}; nothing removed.", id);
            return Ok(());
        }
    };

    let confirmed = assume_yes || {
        let stdin = io::stdin();
        confirm(&prompt.message(), &mut stdin.lock(), &mut io::stdout())?
    };

    if prompt.resolve(&mut store, confirmed)? {
        println!("Removed employee {}", id);
    } else {
        println!("Cancelled.");
    }
    Ok(())
}

/// Delete the whole roster from local storage
pub fn reset(paths: &RosterPaths, assume_yes: bool) -> Result<()> {
    let (mut store, _) = open_store(paths)?;
    if store.is_empty() && store.storage().get_item(store.key())?.is_none() {
        println!("Roster is already empty.");
        return Ok(());
    }

    let question = format!("Delete all {} employees under key {}?", store.len(), store.key());
    let confirmed = assume_yes || {
        let stdin = io::stdin();
        confirm(&question, &mut stdin.lock(), &mut io::stdout())?
    };
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    let dropped = store.clear()?;
    info!(dropped, "reset roster from CLI");
    println!("Removed {} employees.", dropped);
    Ok(())
}

/// Ask a yes/no question; anything but y/yes is a no
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{} [y/N] ", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer).context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn commit(form: &mut FormController, store: &mut Store) -> Result<SaveOutcome> {
    match form.save(store) {
        Ok(outcome) => Ok(outcome),
        Err(FormError::EmptyName) => bail!("Name must not be empty"),
        Err(FormError::NotOpen) => bail!("No form is open"),
        Err(FormError::Storage(e)) => Err(e),
    }
}

/// Load config and the persisted roster
pub fn open_store(paths: &RosterPaths) -> Result<(Store, Config)> {
    let config = load_config(paths)?;
    paths.ensure_dirs()?;
    let db = Database::open(paths)?;
    let store = Store::load(db, config.storage_key.clone())?;
    Ok((store, config))
}

fn print_employee_summary(record: &EmployeeRecord) {
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    println!("Employee {}", record.id);
    println!("  Name:          {}", record.name);
    println!("  Date of birth: {}", or_dash(&record.date_of_birth));
    println!("  Gender:        {}", or_dash(record.gender.label()));
    println!("  Email:         {}", or_dash(&record.email));
    println!("  Address:       {}", or_dash(&record.address));
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_accepts_yes_only() {
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false), ("", false)] {
            let mut input = answer.as_bytes();
            let mut output = Vec::new();
            assert_eq!(confirm("Delete?", &mut input, &mut output).unwrap(), expected);
            assert_eq!(String::from_utf8(output).unwrap(), "Delete? [y/N] ");
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Anna", 10), "Anna");
        assert_eq!(truncate("Nguyễn Văn An", 6), "Nguyễ…");
    }

    #[test]
    fn test_add_edit_remove_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let paths = RosterPaths::at(dir.path());
        init(&paths).unwrap();

        let id = add(
            &paths,
            FieldArgs {
                name: Some("Anna".to_string()),
                gender: Some(Gender::Female),
                ..FieldArgs::default()
            },
        )
        .unwrap();
        assert_eq!(id, 1);

        edit(
            &paths,
            id,
            FieldArgs {
                address: Some("Hue".to_string()),
                ..FieldArgs::default()
            },
        )
        .unwrap();

        let (store, _) = open_store(&paths).unwrap();
        let anna = store.get(1).unwrap();
        assert_eq!(anna.address, "Hue");
        assert_eq!(anna.gender, Gender::Female);

        remove(&paths, 1, true).unwrap();
        let (store, _) = open_store(&paths).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let dir = tempfile::tempdir().unwrap();
        let paths = RosterPaths::at(dir.path());

        let err = add(
            &paths,
            FieldArgs {
                name: Some("  ".to_string()),
                ..FieldArgs::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Name must not be empty"));

        let (store, _) = open_store(&paths).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_reset_removes_storage_key() {
        let dir = tempfile::tempdir().unwrap();
        let paths = RosterPaths::at(dir.path());
        for name in ["Anna", "Bob"] {
            add(
                &paths,
                FieldArgs {
                    name: Some(name.to_string()),
                    ..FieldArgs::default()
                },
            )
            .unwrap();
        }

        reset(&paths, true).unwrap();
        let (store, config) = open_store(&paths).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.storage().get_item(&config.storage_key).unwrap(), None);

        // Nothing stored is not an error
        reset(&paths, true).unwrap();
    }

    #[test]
    fn test_edit_unknown_id_fails() {
        let dir = tempfile::tempdir().unwrap();
        let paths = RosterPaths::at(dir.path());
        assert!(edit(&paths, 5, FieldArgs::default()).is_err());
    }
}
