// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order-status notifications over the push channel.
//!
//! Triggered by the record-CRUD collaborators outside the webhook flow.
//! Templates carry `{placeholder}` variables substituted from the order;
//! delivery is per-recipient best-effort.

use tracing::{info, warn};

use sprocket_core::error::SprocketError;
use sprocket_core::traits::ReplySender;
use sprocket_core::types::{Order, OutboundMessage};

/// Substitutes `{placeholder}` variables in a notification template.
///
/// Supported placeholders: `{orderNumber}`, `{dealerName}`, `{companyName}`,
/// `{totalAmount}`, `{status}`, `{createdAt}`, `{items}`.
pub fn render_template(template: &str, order: &Order) -> String {
    let mut text = template.to_string();
    text = text.replace("{orderNumber}", &order.order_number);
    text = text.replace("{dealerName}", &order.dealer.contact_name);
    text = text.replace("{companyName}", &order.dealer.company_name);
    text = text.replace("{totalAmount}", &order.total_amount.to_string());
    text = text.replace("{status}", order.status.label());
    text = text.replace(
        "{createdAt}",
        &order.created_at.format("%Y/%m/%d").to_string(),
    );

    if text.contains("{items}") {
        let items = order
            .items
            .iter()
            .map(|item| {
                format!(
                    "{} x {}{}",
                    item.name,
                    item.quantity,
                    item.unit.as_deref().unwrap_or("件")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        text = text.replace("{items}", &items);
    }

    text
}

/// Pushes a rendered order notification to each recipient account.
///
/// Per-recipient delivery failures are logged and skipped; one broken
/// recipient must not starve the rest.
pub async fn notify_order_status(
    sender: &dyn ReplySender,
    template: &str,
    order: &Order,
    recipients: &[String],
) -> Result<(), SprocketError> {
    if recipients.is_empty() {
        warn!(order = order.order_number.as_str(), "no notification recipients");
        return Ok(());
    }

    let text = render_template(template, order);

    for account_id in recipients {
        match sender
            .push(account_id, vec![OutboundMessage::text(text.clone())])
            .await
        {
            Ok(()) => info!(
                order = order.order_number.as_str(),
                account_id = account_id.as_str(),
                "order notification pushed"
            ),
            Err(e) => warn!(
                order = order.order_number.as_str(),
                account_id = account_id.as_str(),
                error = %e,
                "order notification failed"
            ),
        }
    }

    Ok(())
}
