use crate::cli::{Cli, OutputFormat};
use crate::context::CliContext;
use crate::error::CliResult;
use colored::*;
use notebook::{Note, NoteChanges, NoteId};
use std::io::{self, Read};
use tabled::{
    settings::{object::Rows, Alignment, Color, Modify, Style},
    Table, Tabled,
};

const CONTENT_PREVIEW_CHARS: usize = 40;

#[derive(Tabled)]
struct NoteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Note> for NoteRow {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.to_string(),
            title: note.title.clone(),
            content: preview(&note.content),
            updated: note.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub async fn run_list(
    context: &CliContext,
    search: Option<String>,
    format: OutputFormat,
) -> CliResult<()> {
    let mut notebook = context.open_notebook().await?;
    notebook.refresh().await?;
    context.report_backend(notebook.last_backend());

    let notes = notebook.search(search.as_deref().unwrap_or(""));

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&notes)?);
        }
        OutputFormat::Table => display_table(&notes),
    }

    Ok(())
}

pub async fn run_create(
    context: &CliContext,
    title: String,
    content: Option<String>,
) -> CliResult<()> {
    let content = get_content_input(content)?.unwrap_or_default();
    let mut notebook = context.open_notebook().await?;

    let note = notebook.create(&title, &content).await?;
    context.report_backend(notebook.last_backend());

    println!("{} {}", "✅ Created note:".green(), note.title.bold());
    println!("🆔 ID: {}", note.id);
    Ok(())
}

pub async fn run_update(
    context: &CliContext,
    id: String,
    title: Option<String>,
    content: Option<String>,
) -> CliResult<()> {
    let id: NoteId = id.parse()?;
    let content = get_content_input(content)?;
    let changes = NoteChanges::new(title.as_deref(), content.as_deref())?;
    let mut notebook = context.open_notebook().await?;

    let note = notebook.update(&id, changes).await?;
    context.report_backend(notebook.last_backend());

    println!("{} {}", "✅ Updated note:".green(), note.title.bold());
    println!("🆔 ID: {}", note.id);
    Ok(())
}

pub async fn run_delete(context: &CliContext, id: String) -> CliResult<()> {
    let id: NoteId = id.parse()?;
    let mut notebook = context.open_notebook().await?;

    notebook.delete(&id).await?;
    context.report_backend(notebook.last_backend());

    println!("{} {}", "🗑️  Deleted note:".green(), id);
    Ok(())
}

fn display_table(notes: &[&Note]) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    let rows: Vec<NoteRow> = notes.iter().map(|note| NoteRow::from(*note)).collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    if Cli::should_use_color() {
        table.with(Modify::new(Rows::one(0)).with(Color::FG_BRIGHT_CYAN));
    }
    table.with(Modify::new(Rows::new(1..)).with(Alignment::left()));

    println!("{}", table);
    println!("{}", format!("{} note(s)", notes.len()).dimmed());
}

/// First line of `content`, shortened for table display
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    let mut chars = first_line.chars();
    let head: String = chars.by_ref().take(CONTENT_PREVIEW_CHARS).collect();
    if chars.next().is_some() || content.lines().nth(1).is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

/// Resolve a `--content` argument, reading stdin for `-`
fn get_content_input(content: Option<String>) -> io::Result<Option<String>> {
    match content {
        Some(c) if c == "-" => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_content() {
        assert_eq!(preview("milk, eggs"), "milk, eggs");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(50);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), CONTENT_PREVIEW_CHARS + 1);
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn test_preview_marks_multiline() {
        assert_eq!(preview("first\nsecond"), "first…");
    }

    #[test]
    fn test_direct_content_passes_through() {
        assert_eq!(
            get_content_input(Some("text".into())).unwrap().as_deref(),
            Some("text")
        );
        assert_eq!(get_content_input(None).unwrap(), None);
    }
}
