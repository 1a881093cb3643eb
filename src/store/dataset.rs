//! Dataset file handling.
//!
//! Datasets are stored as a single pretty-printed JSON document. Loading
//! checks that records reference each other consistently.

use crate::error::SourceError;
use crate::models::Dataset;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Load and validate a dataset from a JSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset, SourceError> {
    let content = std::fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&content)?;

    validate_dataset(&dataset)?;

    info!(
        "Loaded dataset from {}: {} users, {} orders, {} item A, {} item B",
        path.display(),
        dataset.users.len(),
        dataset.orders.len(),
        dataset.items_a.len(),
        dataset.items_b.len()
    );

    Ok(dataset)
}

/// Load a dataset, or return an empty one if the file does not exist yet.
pub fn load_or_default(path: &Path) -> Result<Dataset, SourceError> {
    if path.exists() {
        load_dataset(path)
    } else {
        debug!("No dataset at {}, starting empty", path.display());
        Ok(Dataset::default())
    }
}

/// Write a dataset as pretty-printed JSON.
pub fn save_dataset(dataset: &Dataset, path: &Path) -> Result<(), SourceError> {
    let content = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, content)?;
    debug!("Saved dataset to {}", path.display());
    Ok(())
}

/// Check references between records and that no amount is negative.
pub fn validate_dataset(dataset: &Dataset) -> Result<(), SourceError> {
    let user_ids: HashSet<Uuid> = dataset.users.iter().map(|u| u.id).collect();
    if user_ids.len() != dataset.users.len() {
        return Err(SourceError::Integrity("duplicate user id".to_string()));
    }

    let mut emails = HashSet::new();
    for user in &dataset.users {
        if !emails.insert(user.email.as_str()) {
            return Err(SourceError::Integrity(format!(
                "duplicate email: {}",
                user.email
            )));
        }
    }

    let order_ids: HashSet<Uuid> = dataset.orders.iter().map(|o| o.id).collect();
    for order in &dataset.orders {
        if !user_ids.contains(&order.user_id) {
            return Err(SourceError::Integrity(format!(
                "order {} references unknown user {}",
                order.id, order.user_id
            )));
        }
    }

    for item in &dataset.items_a {
        if !order_ids.contains(&item.order_id) {
            return Err(SourceError::Integrity(format!(
                "item {} references unknown order {}",
                item.id, item.order_id
            )));
        }
        if item.price.is_sign_negative() {
            return Err(SourceError::Integrity(format!(
                "item {} has a negative price",
                item.id
            )));
        }
    }

    for item in &dataset.items_b {
        if !order_ids.contains(&item.order_id) {
            return Err(SourceError::Integrity(format!(
                "item {} references unknown order {}",
                item.id, item.order_id
            )));
        }
        if item.placement_price.is_sign_negative() || item.article_price.is_sign_negative() {
            return Err(SourceError::Integrity(format!(
                "item {} has a negative price",
                item.id
            )));
        }
    }

    Ok(())
}
