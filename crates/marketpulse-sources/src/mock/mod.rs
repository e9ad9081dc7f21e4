//! Deterministic mock feeds for demos and tests.
//!
//! Each feed is seeded; the same seed and reference date reproduce the same
//! batch byte for byte, which keeps demo passes and their alert identities
//! stable across runs.

mod news;
mod regs;
mod trends;

pub use news::MockNewsFeed;
pub use regs::MockRegulatoryFeed;
pub use trends::MockTrendsFeed;

/// One tracked product line in the demo catalog: the HSN code and the
/// product phrase the news mock writes headlines about. The phrases match
/// the demo taxonomy's keywords so classification round-trips.
pub(crate) struct CatalogEntry {
    pub hsn_code: &'static str,
    pub product: &'static str,
}

pub(crate) const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        hsn_code: "1006",
        product: "basmati rice",
    },
    CatalogEntry {
        hsn_code: "2106",
        product: "food preparations",
    },
    CatalogEntry {
        hsn_code: "3004",
        product: "medicaments",
    },
    CatalogEntry {
        hsn_code: "4016",
        product: "rubber goods",
    },
    CatalogEntry {
        hsn_code: "6101",
        product: "knitted apparel",
    },
    CatalogEntry {
        hsn_code: "7308",
        product: "steel structures",
    },
    CatalogEntry {
        hsn_code: "8542",
        product: "electronic circuits",
    },
    CatalogEntry {
        hsn_code: "8708",
        product: "automobile parts",
    },
];
