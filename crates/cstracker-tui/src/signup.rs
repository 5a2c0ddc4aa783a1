//! Interactive student registration (`cstracker --signup`).

use std::io::{self, Write};

use anyhow::{bail, Result};

use cstracker_core::models::SignupRequest;
use cstracker_core::{ApiClient, ApiError, Config};

pub async fn run() -> Result<()> {
    let config = Config::load().unwrap_or_default();
    let api = ApiClient::from_config(&config)?;

    println!("\n=== Create a student account ===\n");

    let request = SignupRequest {
        first_name: prompt("First name")?,
        last_name: prompt("Last name")?,
        course: prompt("Course")?,
        year_level: prompt("Year level")?,
        section: prompt("Section")?,
        email: prompt("Email")?,
        phone_number: prompt("Phone number")?,
        username: prompt("Username")?,
        password: rpassword::prompt_password("Password: ")?,
    };

    let missing = request.missing_fields();
    if !missing.is_empty() {
        bail!("Please fill in all required fields: {}", missing.join(", "));
    }

    println!("\nCreating account...");
    match api.signup(&request).await {
        Ok(created) => {
            let username = created.username.unwrap_or(request.username);
            println!("Account created for {}. Please log in.", username);
            Ok(())
        }
        Err(e) => bail!(
            "Signup failed: {}",
            ApiError::user_message(&e, "Something went wrong. Please try again.")
        ),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
