//! Account commands: login, signup, logout, whoami.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;

use mentor_core::MentorError;
use mentor_core::gateway::{Credentials, SignupProfile};

use crate::app::App;

pub async fn login(app: &App, username: String, password: Option<String>) -> Result<()> {
    let password = resolve_password(password)?;
    let credentials = Credentials::new(username, password);

    match app.identity.login(&credentials).await {
        Ok(()) => {
            let identity = app.identity.identity().await;
            let name = identity
                .map(|i| i.username)
                .unwrap_or_else(|| credentials.username.clone());
            println!("{}", format!("Logged in as {}.", name).bright_green());
            Ok(())
        }
        Err(e) if e.is_authentication() => {
            eprintln!("{}", "Incorrect username or password.".red());
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn signup(
    app: &App,
    username: String,
    level: u8,
    password: Option<String>,
) -> Result<()> {
    let password = resolve_password(password)?;
    let profile = SignupProfile {
        username,
        password,
        level,
    };

    match app.identity.signup(&profile).await {
        Ok(()) => {
            println!(
                "{}",
                format!("Account created. Logged in as {}.", profile.username).bright_green()
            );
            Ok(())
        }
        Err(MentorError::Validation(issues)) => {
            eprintln!("{}", "Signup rejected:".red());
            for issue in issues {
                eprintln!("  {}: {}", issue.field.yellow(), issue.message);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(app: &App) -> Result<()> {
    app.identity.logout().await?;
    println!("{}", "Logged out.".bright_green());
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    match app.identity.identity().await {
        Some(identity) => {
            println!("username: {}", identity.username.bright_cyan());
            println!("role:     {:?}", identity.role);
            if let Some(level) = identity.level {
                println!("level:    {}", level);
            }
        }
        None => println!("{}", "Not logged in.".bright_black()),
    }
    Ok(())
}

/// Takes the password from the flag or prompts for it on stdin.
fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
