//! Admin commands: document upload and broadcast.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use colored::Colorize;

use mentor_core::gateway::UploadRequest;
use mentor_core::notification::{AccessScope, TargetLevel};

use crate::app::App;

pub async fn upload(
    app: &App,
    file: PathBuf,
    access: AccessScope,
    notify: Option<String>,
    notify_level: Option<TargetLevel>,
) -> Result<()> {
    if notify.is_none() && notify_level.is_some() {
        bail!("--notify-level requires --notify");
    }

    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("invalid file name: {}", file.display()))?;
    let content = tokio::fs::read(&file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))?;

    let request = UploadRequest {
        file_name,
        content,
        access_scope: access,
        notification_message: notify,
        notification_target: notify_level,
    };

    let message = require_admin(app, app.identity.upload_document(&request).await).await?;
    println!("{}", message.bright_green());
    Ok(())
}

pub async fn broadcast(app: &App, message: String, level: TargetLevel) -> Result<()> {
    let detail = require_admin(app, app.identity.broadcast(&message, level).await).await?;
    println!("{}", detail.bright_green());
    Ok(())
}

/// Turns the manager's authorization rejection into a friendly exit.
async fn require_admin<T>(app: &App, result: mentor_core::Result<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_authorization() => {
            eprintln!("{}", "This command requires an administrator account.".red());
            if app.identity.identity().await.is_none() {
                eprintln!("{}", "You are not logged in.".bright_black());
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
