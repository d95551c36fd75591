//! Notification commands: list and mark-as-seen.

use anyhow::Result;
use colored::Colorize;

use mentor_core::notification::Notification;

use crate::app::App;

pub async fn list(app: &App, include_read: bool) -> Result<()> {
    let notifications = app.identity.notifications(include_read).await?;
    if notifications.is_empty() {
        println!("{}", "No notifications.".bright_black());
        return Ok(());
    }
    for notification in &notifications {
        print_notification(notification);
    }
    Ok(())
}

pub async fn mark_seen(app: &App, ids: Vec<i64>) -> Result<()> {
    app.identity.mark_notifications_seen(&ids).await?;
    println!(
        "{}",
        format!("Marked {} notification(s) as seen.", ids.len()).bright_green()
    );
    Ok(())
}

fn print_notification(notification: &Notification) {
    let marker = if notification.is_seen {
        " ".normal()
    } else {
        "*".bright_yellow()
    };
    println!(
        "{} [{}] {} ({}, level {})",
        marker,
        notification.id,
        notification.message,
        notification.timestamp.bright_black(),
        notification.target_level,
    );
    if let Some(doc) = &notification.document_internal_id {
        println!("      document: {}", doc.bright_black());
    }
}
