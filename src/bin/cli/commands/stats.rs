use anyhow::{Context, Result};

use vocab_hero_lib::storage::now;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, email: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let user = app.user(email)?;
    let stats = app
        .db
        .progress_stats(user.id, now())
        .context("Failed to compute statistics")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            let streak_color = if stats.current_streak > 0 { Color::GREEN } else { Color::DIM };

            println!("{}", paint(&user.email, Color::BOLD, use_color));
            println!("  Vocabulary:      {}", stats.total_vocabulary);
            println!("  Learned:         {}", stats.learned_count);
            println!("  Due now:         {}", stats.due_count);
            println!(
                "  Today:           {} reviews, {} correct",
                stats.reviews_today, stats.correct_today
            );
            println!("  Accuracy:        {:.0}%", stats.accuracy * 100.0);
            println!(
                "  Streak:          {} (longest {})",
                paint(&format!("{} days", stats.current_streak), streak_color, use_color),
                stats.longest_streak
            );
            println!("  Sessions done:   {}", stats.sessions_completed);
        }
    }

    Ok(())
}
