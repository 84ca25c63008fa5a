// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply text.
//!
//! Chat text is the only channel users see; every failure surfaces here as
//! natural language, never as an error code.

use sprocket_core::types::{Order, Product};

/// LINE user ids are 33 characters; anything longer is platform noise.
const ACCOUNT_ID_LEN: usize = 33;

pub const ASK_ORDER_NUMBER: &str = "請提供您的訂單編號，我將為您查詢訂單資訊。";

pub const ASK_PRODUCT_QUERY: &str = "請告訴我您想查詢的產品名稱或分類，例如「牙盤」、「曲柄」等。";

pub const ASK_STOCK_QUERY: &str = "請告訴我您想查詢庫存的產品名稱。";

pub const PRODUCT_NOT_FOUND: &str = "抱歉，找不到相關產品。";

pub const SUPPORT_REPLY: &str =
    "您想要聯繫客服嗎？請撥打 0800-123-456 或發送郵件至 support@sprocket.bike";

pub const ORDER_LOOKUP_FAILED: &str = "查詢訂單時發生錯誤，請稍後再試。";

pub const PRODUCT_LOOKUP_FAILED: &str = "查詢產品時發生錯誤，請稍後再試。";

pub const STOCK_LOOKUP_FAILED: &str = "查詢庫存時發生錯誤，請稍後再試。";

/// Truncates an external account id to the platform's 33-character shape.
pub fn normalized_account_id(account_id: &str) -> &str {
    match account_id.char_indices().nth(ACCOUNT_ID_LEN) {
        Some((i, _)) => &account_id[..i],
        None => account_id,
    }
}

/// The one-time hint sent to accounts not linked to any business user.
pub fn linking_hint(account_id: &str) -> String {
    format!(
        "您好！您的 LINE User ID 是：\n\n{}\n\n請將此 ID 提供給管理員完成註冊，或者在前端介面手動綁定此 ID 到您的帳號。",
        normalized_account_id(account_id)
    )
}

/// Reply for the account-linking helper intent.
pub fn line_user_id_reply(account_id: &str) -> String {
    format!(
        "您的 LINE User ID 是：\n\n{}\n\n請將此 ID 提供給管理員完成註冊，或者在前端介面手動綁定此 ID 到您的帳號。",
        normalized_account_id(account_id)
    )
}

/// Formatted order details: number, status, creation date, itemized lines,
/// total.
pub fn order_details(order: &Order) -> String {
    let items = order
        .items
        .iter()
        .map(|item| {
            format!(
                "・{} x {}{}",
                item.name,
                item.quantity,
                item.unit.as_deref().unwrap_or("件")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "訂單資訊：\n\n訂單編號：{}\n狀態：{}\n下單時間：{}\n\n訂單明細：\n{}\n\n總額：{} 元",
        order.order_number,
        order.status.label(),
        order.created_at.format("%Y/%m/%d %H:%M"),
        items,
        order.total_amount
    )
}

pub fn order_not_found(order_number: &str) -> String {
    format!("抱歉，找不到訂單編號為 {order_number} 的訂單。請確認訂單編號是否正確。")
}

/// Bulleted product list with price and stock quantity.
pub fn product_results(products: &[Product]) -> String {
    let lines = products
        .iter()
        .map(|p| format!("・{} - {} 元 (庫存：{})", p.name, p.price, p.stock_quantity))
        .collect::<Vec<_>>()
        .join("\n");

    format!("找到以下產品：\n\n{}\n\n共找到 {} 個產品。", lines, products.len())
}

/// Stock reply; phrasing branches on quantity.
pub fn stock_status(product: &Product) -> String {
    let status = if product.stock_quantity > 0 {
        format!("目前庫存充足（{} 件）", product.stock_quantity)
    } else {
        "目前缺貨中".to_string()
    };
    format!("產品：{}\n{}\n價格：{} 元", product.name, status, product.price)
}

pub fn stock_not_found(query: &str) -> String {
    format!("抱歉，找不到名稱為「{query}」的產品。")
}
