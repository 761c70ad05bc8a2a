use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let path = app.db.path();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "database": path.to_string_lossy(),
                "initialized": true,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("Database ready at {}", path.display()),
    }

    Ok(())
}
