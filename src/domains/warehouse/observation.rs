use super::catalog::Product;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 3;
pub const MAX_QUANTITY: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Ok,
    LowStock,
    Critical,
}

impl StockStatus {
    pub fn for_quantity(quantity: u32) -> Self {
        if quantity > 20 {
            StockStatus::Ok
        } else if quantity > 10 {
            StockStatus::LowStock
        } else {
            StockStatus::Critical
        }
    }
}

/// One product reading, serialized as an entry of `scan_results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub status: StockStatus,
}

impl Observation {
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.to_string(),
            product_name: product.name.to_string(),
            quantity,
            status: StockStatus::for_quantity(quantity),
        }
    }
}

pub type ObservationBatch = Vec<Observation>;

/// Stateless producer of synthetic scan readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservationGenerator;

impl ObservationGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Picks 1..=3 distinct products and draws an independent quantity for each.
    /// Batch size is capped by the catalog length; an empty catalog yields an empty batch.
    pub fn generate<R: Rng>(&self, catalog: &[Product], rng: &mut R) -> ObservationBatch {
        let k = rng
            .gen_range(MIN_BATCH_SIZE..=MAX_BATCH_SIZE)
            .min(catalog.len());
        let picked: Vec<&Product> = catalog.choose_multiple(rng, k).collect();
        picked
            .into_iter()
            .map(|product| Observation::new(product, rng.gen_range(0..=MAX_QUANTITY)))
            .collect()
    }
}
