//! Starter catalog: the two MSG packagings the warehouse handles.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use wms_core::ProductId;

use crate::product::{Dimensions, Product, ProductDraft};

fn seeded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

pub fn products() -> Vec<Product> {
    let now = seeded_at();
    let expiry = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);

    let mut msg_1kg = ProductDraft::new("AJI-MSG-001", "Ajinomoto MSG 1kg")
        .with_description("Penyedap rasa Ajinomoto 1kg")
        .with_category("Seasoning")
        .with_weight(1.0)
        .with_dimensions(Dimensions::new(10.0, 5.0, 15.0))
        .with_batch("B2023-001");
    msg_1kg.expiry_date = expiry(2025, 6, 30);

    let mut msg_500g = ProductDraft::new("AJI-MSG-002", "Ajinomoto MSG 500g")
        .with_description("Penyedap rasa Ajinomoto 500g")
        .with_category("Seasoning")
        .with_weight(0.5)
        .with_dimensions(Dimensions::new(8.0, 4.0, 12.0))
        .with_batch("B2023-002");
    msg_500g.expiry_date = expiry(2025, 5, 15);

    vec![
        Product::from_draft(ProductId::from("1"), msg_1kg, now),
        Product::from_draft(ProductId::from("2"), msg_500g, now),
    ]
}
