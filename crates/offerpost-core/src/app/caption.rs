//! Caption - 投稿本文の組み立て
//!
//! タイトル・割引率・価格・宣伝リンク・開示文をまとめる。

use crate::domain::Offer;

#[derive(Debug, Clone)]
pub struct CaptionTemplate {
    pub promo_link: String,
    pub disclosure: String,
}

impl CaptionTemplate {
    pub fn new(promo_link: impl Into<String>, disclosure: impl Into<String>) -> Self {
        Self {
            promo_link: promo_link.into(),
            disclosure: disclosure.into(),
        }
    }

    pub fn render(&self, offer: &Offer) -> String {
        format!(
            "🔥 {title}\n\n\
             💥 ¡{discount}% de descuento!\n\
             💰 Ahora: {price} (antes {original})\n\n\
             👉 Más ofertas: {link}\n\n\
             {disclosure}",
            title = offer.title.trim(),
            discount = offer.discount,
            price = format_price(offer.price),
            original = format_price(offer.original_price),
            link = self.promo_link,
            disclosure = self.disclosure,
        )
    }
}

/// `1234567` -> `$1,234,567`
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}
