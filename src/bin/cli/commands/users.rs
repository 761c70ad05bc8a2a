use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run_add(app: &App, email: &str, name: Option<String>, format: &OutputFormat) -> Result<()> {
    let user = app
        .db
        .create_user(email, name)
        .with_context(|| format!("Failed to create user '{}'", email))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
        OutputFormat::Plain => {
            println!("Created user {}", user.email);
            if let Some(name) = &user.name {
                println!("  Name: {}", name);
            }
            println!("  ID: {}", user.id);
        }
    }

    Ok(())
}
