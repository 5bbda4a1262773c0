//! Pre-rendered Telegram message texts (HTML parse mode).

use rust_decimal::Decimal;

use crate::models::TrackedProduct;
use crate::tracker::RunSummary;

pub fn price_drop(
    product: &TrackedProduct,
    old_price: Decimal,
    new_price: Decimal,
    discount: Decimal,
    discount_percent: f64,
) -> String {
    format!(
        "🔔 <b>PREISALARM!</b> 🔔\n\n\
         📦 <b>{}</b>\n\n\
         💰 Vorher: {:.2} €\n\
         ✅ Jetzt: {:.2} €\n\
         📉 Ersparnis: {:.2} € ({:.1}%)\n\n\
         🔗 <a href=\"{}\">Zum Produkt</a>",
        product.name, old_price, new_price, discount, discount_percent, product.url
    )
}

pub fn new_all_time_low(product: &TrackedProduct, price: Decimal) -> String {
    format!(
        "🏆 <b>NEUER TIEFSTPREIS!</b> 🏆\n\n\
         📦 <b>{}</b>\n\
         💎 Bester Preis ever: {:.2} €\n\n\
         🔗 <a href=\"{}\">Jetzt zuschlagen!</a>",
        product.name, price, product.url
    )
}

pub fn new_product(product: &TrackedProduct, price: Decimal) -> String {
    format!(
        "✅ <b>Neues Produkt wird überwacht</b>\n\n\
         📦 {}\n\
         💰 Startpreis: {:.2} €\n\n\
         Ich benachrichtige dich bei Preisänderungen!",
        product.name, price
    )
}

pub fn price_not_found(product: &TrackedProduct) -> String {
    format!(
        "⚠️ <b>Preis nicht gefunden</b>\n\n\
         📦 {}\n\
         Bitte prüfe, ob die URL noch stimmt.\n\n\
         🔗 <a href=\"{}\">Zum Produkt</a>",
        product.name, product.url
    )
}

pub fn run_summary(summary: &RunSummary) -> String {
    format!(
        "📊 <b>Preis-Check abgeschlossen</b>\n\n\
         ✅ {} Produkte geprüft\n\
         ✨ {} neu aufgenommen\n\
         📉 {} Preissenkung{}",
        summary.checked,
        summary.new_products,
        summary.price_drops,
        if summary.price_drops == 1 { "" } else { "en" }
    )
}

pub fn critical_failure(error: &str) -> String {
    format!("⚠️ <b>Fehler beim Preis-Check:</b>\n\n{error}")
}
