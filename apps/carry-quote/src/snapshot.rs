//! # Quote Snapshot
//!
//! The frozen record of one priced order line. An order collaborator stores
//! it as-is; re-pricing later against a changed catalog never alters it.
//!
//! ```json
//! {
//!   "id": "5b1f0c8e-8a0e-4c5e-9d2f-3f1c2b7a9e10",
//!   "product_id": "rank-boost",
//!   "product_title": "Rank Boost",
//!   "selection": { "groups": { "1": { "type": "single_id", "id": 10 } } },
//!   "unit_price_cents": 10300,
//!   "quantity": 2,
//!   "line_total_cents": 20600,
//!   "breakdown": { ... },
//!   "quoted_at": "2026-10-18T12:00:00Z"
//! }
//! ```

use carry_core::{PriceBreakdown, PriceResult, Product, Selection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub id: Uuid,
    pub product_id: String,
    pub product_title: String,
    pub selection: Selection,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
    pub breakdown: PriceBreakdown,
    pub quoted_at: DateTime<Utc>,
}

impl QuoteSnapshot {
    /// Freezes a price with a fresh id and the current time.
    pub fn new(product: &Product, selection: Selection, price: PriceResult) -> Self {
        QuoteSnapshot {
            id: Uuid::new_v4(),
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            selection,
            unit_price_cents: price.unit_cents,
            quantity: price.breakdown.qty,
            line_total_cents: price.line_total_cents,
            breakdown: price.breakdown,
            quoted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_copies_price() {
        let product = Product {
            id: "boost".into(),
            title: "Boost".into(),
            base_price_cents: 4_200,
            option_groups: vec![],
        };
        let selection = Selection::new();
        let price = carry_core::quote(&product, &selection).unwrap();
        let snapshot = QuoteSnapshot::new(&product, selection, price);

        assert_eq!(snapshot.product_id, "boost");
        assert_eq!(snapshot.unit_price_cents, 4_200);
        assert_eq!(snapshot.quantity, 1);
        assert_eq!(snapshot.line_total_cents, 4_200);
        assert_eq!(snapshot.id.get_version_num(), 4);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["line_total_cents"], 4_200);
        assert!(json["quoted_at"].is_string());
    }
}
