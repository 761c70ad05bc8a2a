use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use vocab_hero_lib::storage::StorageError;
use vocab_hero_lib::vocabulary::CreateVocabularyRequest;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

/// A CSV row that could not be imported
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Parse `word,reading,meaning[,partOfSpeech]` rows
///
/// A first row starting with `word` is treated as a header. Rows with fewer
/// than three columns are reported as skipped instead of failing the import.
pub fn parse_rows<R: Read>(input: R) -> Result<(Vec<(u64, CreateVocabularyRequest)>, Vec<SkippedRow>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut rows = Vec::new();
    let mut skipped = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record.context("Failed to read CSV")?;
        let line = record.position().map(|p| p.line()).unwrap_or(index as u64 + 1);

        if index == 0 && record.get(0).is_some_and(|f| f.eq_ignore_ascii_case("word")) {
            continue;
        }
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if record.len() < 3 {
            skipped.push(SkippedRow {
                line,
                reason: format!("expected at least 3 columns, found {}", record.len()),
            });
            continue;
        }

        let mut request = CreateVocabularyRequest::new(&record[0], &record[1], &record[2]);
        request.part_of_speech = record
            .get(3)
            .filter(|pos| !pos.is_empty())
            .map(str::to_string);
        rows.push((line, request));
    }

    Ok((rows, skipped))
}

pub fn run(app: &App, email: &str, csv_path: &Path, format: &OutputFormat, use_color: bool) -> Result<()> {
    let user = app.user(email)?;
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open {}", csv_path.display()))?;
    let (rows, mut skipped) = parse_rows(file)?;

    let mut imported = 0usize;
    for (line, request) in rows {
        match app.db.create_vocabulary(user.id, request) {
            Ok(_) => imported += 1,
            Err(StorageError::Validation(errors)) => skipped.push(SkippedRow {
                line,
                reason: errors.to_string(),
            }),
            Err(e) => return Err(e).with_context(|| format!("Failed to import line {}", line)),
        }
    }
    log::info!("Imported {} items for {} ({} skipped)", imported, user.email, skipped.len());

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "imported": imported,
                "skipped": skipped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Imported {} items for {}",
                paint(&imported.to_string(), Color::GREEN, use_color),
                user.email
            );
            for row in &skipped {
                println!(
                    "  {} line {}: {}",
                    paint("skipped", Color::YELLOW, use_color),
                    row.line,
                    row.reason
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_with_header() {
        let input = "word,reading,meaning,partOfSpeech\n猫,ねこ,cat,noun\n食べる,たべる,to eat\n";
        let (rows, skipped) = parse_rows(input.as_bytes()).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1.word, "猫");
        assert_eq!(rows[0].1.part_of_speech.as_deref(), Some("noun"));
        assert_eq!(rows[1].1.meaning, "to eat");
        assert_eq!(rows[1].1.part_of_speech, None);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let input = "犬,いぬ,dog\n本,ほん\n\n";
        let (rows, skipped) = parse_rows(input.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].line, 2);
    }
}
