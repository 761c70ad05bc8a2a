use anyhow::{Context, Result};

use vocab_hero_lib::storage::now;

use crate::app::App;
use crate::render::terminal::{paint, truncate, Color};
use crate::OutputFormat;

pub fn run(app: &App, email: &str, limit: usize, format: &OutputFormat, use_color: bool) -> Result<()> {
    let user = app.user(email)?;
    let at = now();
    let due = app
        .db
        .due_vocabulary(user.id, limit, at)
        .context("Failed to load due vocabulary")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&due)?),
        OutputFormat::Plain => {
            if due.items.is_empty() {
                println!("Nothing due. Come back later.");
                return Ok(());
            }

            let word_width = due
                .items
                .iter()
                .map(|entry| entry.item.word.chars().count())
                .max()
                .unwrap_or(4)
                .clamp(4, 16);
            let reading_width = due
                .items
                .iter()
                .map(|entry| entry.item.reading.chars().count())
                .max()
                .unwrap_or(7)
                .clamp(7, 16);

            println!(
                "{:<ww$} {:<rw$} {:<30} {}",
                "Word",
                "Reading",
                "Meaning",
                "Overdue",
                ww = word_width,
                rw = reading_width
            );
            for entry in &due.items {
                let overdue_days = (at - entry.schedule.next_review).num_days();
                let overdue = if overdue_days > 0 {
                    paint(&format!("{}d", overdue_days), Color::RED, use_color)
                } else {
                    paint("today", Color::DIM, use_color)
                };
                println!(
                    "{:<ww$} {:<rw$} {:<30} {}",
                    truncate(&entry.item.word, word_width),
                    truncate(&entry.item.reading, reading_width),
                    truncate(&entry.item.meaning, 30),
                    overdue,
                    ww = word_width,
                    rw = reading_width
                );
            }

            let shown = due.items.len() as i64;
            if due.total_due > shown {
                println!("\n{} of {} due items shown", shown, due.total_due);
            } else {
                println!("\n{} due", paint(&due.total_due.to_string(), Color::BOLD, use_color));
            }
        }
    }

    Ok(())
}
