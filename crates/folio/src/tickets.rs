// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio tickets` operator commands.

use std::io::IsTerminal;

use folio_config::FolioConfig;
use folio_core::types::Ticket;
use folio_core::{FolioError, StorageAdapter, TicketStatus};
use folio_storage::{SqliteStorage, TicketFilter};

/// Characters of ticket details shown per row.
const DETAILS_WIDTH: usize = 48;

async fn open_storage(config: &FolioConfig) -> Result<SqliteStorage, FolioError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(storage)
}

/// `folio tickets list [--user <id>] [--status open|closed]`
pub async fn run_list(
    config: &FolioConfig,
    user: Option<String>,
    status: Option<TicketStatus>,
) -> Result<(), FolioError> {
    let storage = open_storage(config).await?;
    let tickets = storage
        .list_tickets(&TicketFilter {
            user_id: user,
            status,
        })
        .await?;
    storage.close().await?;

    if tickets.is_empty() {
        println!("no tickets found");
        return Ok(());
    }

    let use_color = std::io::stdout().is_terminal();
    println!(
        "{:>6}  {:<6}  {:<14}  {:<16}  {:<24}  DETAILS",
        "FOLIO", "STATUS", "CATEGORY", "USER", "CREATED"
    );
    for ticket in &tickets {
        println!("{}", format_row(ticket, use_color));
    }
    println!("\n{} ticket(s)", tickets.len());
    Ok(())
}

/// `folio tickets close <id>`
pub async fn run_close(config: &FolioConfig, id: i64) -> Result<(), FolioError> {
    let storage = open_storage(config).await?;
    let closed = storage.close_ticket(id).await;
    storage.close().await?;

    if closed? {
        println!("ticket #{id} closed");
        Ok(())
    } else {
        Err(FolioError::Internal(format!(
            "ticket #{id} does not exist or is already closed"
        )))
    }
}

fn format_row(ticket: &Ticket, use_color: bool) -> String {
    let status = ticket.status.to_string();
    let status = if use_color {
        use colored::Colorize;
        match ticket.status {
            TicketStatus::Open => format!("{:<6}", status).green().to_string(),
            TicketStatus::Closed => format!("{:<6}", status).dimmed().to_string(),
        }
    } else {
        format!("{status:<6}")
    };
    format!(
        "{:>6}  {}  {:<14}  {:<16}  {:<24}  {}",
        format!("#{}", ticket.id),
        status,
        ticket.category.to_string(),
        ticket.user_id,
        ticket.created_at,
        summarize(ticket.details.as_deref()),
    )
}

/// Single-line, width-limited view of the details text.
fn summarize(details: Option<&str>) -> String {
    let Some(details) = details else {
        return "(pending)".to_string();
    };
    let flat = details.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= DETAILS_WIDTH {
        flat
    } else {
        let cut: String = flat.chars().take(DETAILS_WIDTH - 1).collect();
        format!("{cut}…")
    }
}
