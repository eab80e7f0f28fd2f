//! Stand-in scanner: fixed analyzing delay, fixed result, never fails.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::IngredientRecognizer;
use crate::config::KitchenConfig;
use crate::types::{CapturedImage, InventoryItem, KitchenError};

/// (name, quantity, unit, days left, icon)
const SCANNED_ITEMS: [(&str, f64, &str, u32, &str); 3] = [
    ("Avocados", 2.0, "pcs", 4, "🥑"),
    ("Sourdough", 1.0, "loaf", 5, "🍞"),
    ("Eggs", 6.0, "pcs", 10, "🥚"),
];

pub struct ScanSimulator {
    delay: Duration,
}

impl ScanSimulator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &KitchenConfig) -> Self {
        Self::new(config.scan_delay)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl IngredientRecognizer for ScanSimulator {
    async fn recognize(&self, image: &CapturedImage) -> Result<Vec<InventoryItem>, KitchenError> {
        info!(
            "Analyzing frame ({} bytes), simulated for {:?}",
            image.bytes.len(),
            self.delay
        );
        tokio::time::sleep(self.delay).await;

        Ok(SCANNED_ITEMS
            .iter()
            .map(|(name, quantity, unit, days_left, icon)| InventoryItem {
                id: uuid::Uuid::new_v4().to_string(),
                name: name.to_string(),
                quantity: *quantity,
                unit: unit.to_string(),
                days_left: *days_left,
                icon: icon.to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_returns_fixed_items_after_delay() {
        let simulator = ScanSimulator::new(Duration::from_secs(2));
        let started = Instant::now();

        let items = simulator.recognize(&CapturedImage::default()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(2));
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Avocados", "Sourdough", "Eggs"]);
        assert_eq!(items[2].quantity, 6.0);
        assert_eq!(items[1].icon, "🍞");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_ids_per_scan() {
        let simulator = ScanSimulator::new(Duration::from_millis(10));
        let first = simulator.recognize(&CapturedImage::default()).await.unwrap();
        let second = simulator.recognize(&CapturedImage::default()).await.unwrap();

        assert_ne!(first[0].id, second[0].id);
        assert_ne!(first[0].id, first[1].id);
    }

    #[test]
    fn test_delay_from_config() {
        let simulator = ScanSimulator::from_config(&KitchenConfig::default());
        assert_eq!(simulator.delay(), Duration::from_secs(2));
    }
}
