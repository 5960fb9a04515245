//! Offer model: one scraped product listing waiting to be published.
//!
//! フィールド名は scraper の出力（スペイン語）に合わせて serde で rename する。

use serde::{Deserialize, Serialize};

/// A scraped product listing.
///
/// Field names on the wire follow the scraper's output (`titulo`, `enlace`, ...).
/// Every field except `imagen_alternativa` is required; a record missing one
/// fails deserialization, which is what makes store validation all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(rename = "titulo")]
    pub title: String,

    /// Current (discounted) price.
    #[serde(rename = "precio_actual")]
    pub price: u64,

    #[serde(rename = "precio_original")]
    pub original_price: u64,

    /// Discount percentage, already computed by the scraper.
    #[serde(rename = "descuento")]
    pub discount: u32,

    #[serde(rename = "enlace")]
    pub link: String,

    #[serde(rename = "vendidos")]
    pub sold: u64,

    #[serde(rename = "imagen")]
    pub image_url: String,

    #[serde(
        rename = "imagen_alternativa",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alt_image_url: Option<String>,
}

impl Offer {
    /// Alternate image URL, if the scraper supplied a non-blank one.
    pub fn alternate_image(&self) -> Option<&str> {
        self.alt_image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "titulo": "Audífonos Inalámbricos",
            "precio_actual": 499,
            "precio_original": 999,
            "descuento": 50,
            "enlace": "https://articulo.mercadolibre.com.mx/MLM-1-item",
            "vendidos": 120,
            "imagen": "https://http2.mlstatic.com/a.webp"
        })
    }

    #[test]
    fn deserializes_scraper_record() {
        let offer: Offer = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(offer.title, "Audífonos Inalámbricos");
        assert_eq!(offer.price, 499);
        assert_eq!(offer.discount, 50);
        assert_eq!(offer.alt_image_url, None);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut value = sample_json();
        value.as_object_mut().unwrap().remove("enlace");
        let err = serde_json::from_value::<Offer>(value).unwrap_err();
        assert!(err.to_string().contains("enlace"));
    }

    #[test]
    fn null_required_field_is_rejected() {
        let mut value = sample_json();
        value["titulo"] = serde_json::Value::Null;
        assert!(serde_json::from_value::<Offer>(value).is_err());
    }

    #[test]
    fn alternate_image_when_present() {
        let mut value = sample_json();
        value["imagen_alternativa"] = "https://http2.mlstatic.com/b.jpg".into();
        let offer: Offer = serde_json::from_value(value).unwrap();
        assert_eq!(offer.alternate_image(), Some("https://http2.mlstatic.com/b.jpg"));
    }

    #[test]
    fn blank_alternate_is_ignored() {
        let mut value = sample_json();
        value["imagen_alternativa"] = "  ".into();
        let offer: Offer = serde_json::from_value(value).unwrap();
        assert_eq!(offer.alternate_image(), None);
    }
}
