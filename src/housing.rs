//! Per-ZIP aggregation of Census housing and business data.
//!
//! ZIP codes are processed sequentially in request order. A failure for one
//! ZIP becomes an inline error record and never stops the remaining ones.

use crate::client::CensusClient;
use crate::error::Result;
use crate::types::{BusinessCount, HousingRecord, ZipResult};
use crate::zipcode;

/// Share of owner-occupied units in percent, rounded half-to-even to two decimals.
///
/// Zero when there are no housing units.
pub fn percent_owner_occupied(owner_occupied: i64, total_units: i64) -> f64 {
    if total_units == 0 {
        return 0.0;
    }
    let percent = owner_occupied as f64 / total_units as f64 * 100.0;
    (percent * 100.0).round_ties_even() / 100.0
}

/// Whether a record passes the optional owner-occupancy threshold
pub fn meets_threshold(percent: f64, min_owner_occupied: Option<f64>) -> bool {
    min_owner_occupied.is_none_or(|min| percent >= min)
}

/// Collect housing records for every requested ZIP code.
///
/// Returns one entry per ZIP except those below `min_owner_occupied`.
pub async fn collect_housing_data(
    client: &CensusClient,
    zip_codes: &[String],
    min_owner_occupied: Option<f64>,
) -> Vec<ZipResult> {
    let mut results = Vec::with_capacity(zip_codes.len());

    for raw in zip_codes {
        match housing_record(client, raw, min_owner_occupied).await {
            Ok(Some(record)) => results.push(ZipResult::Housing(record)),
            Ok(None) => {
                tracing::debug!("ZIP {} below owner-occupancy threshold, skipping", raw.trim());
            }
            Err(e) => {
                tracing::warn!("Failed to collect housing data for {}: {}", raw.trim(), e);
                results.push(ZipResult::failed(raw.trim(), &e));
            }
        }
    }

    results
}

/// Build the record for one ZIP, or `None` when it is filtered out
async fn housing_record(
    client: &CensusClient,
    raw_zip: &str,
    min_owner_occupied: Option<f64>,
) -> Result<Option<HousingRecord>> {
    let zip_code = zipcode::normalize(raw_zip)?;
    let counts = client.housing_counts(&zip_code).await?;

    let percent = percent_owner_occupied(counts.owner_occupied, counts.total_units);
    if !meets_threshold(percent, min_owner_occupied) {
        return Ok(None);
    }

    // Establishment counts are best effort
    let business_establishments = match client.business_establishments(&zip_code).await {
        Ok(count) => BusinessCount::Known(count),
        Err(e) => {
            tracing::debug!("Business establishments unavailable for {}: {}", zip_code, e);
            BusinessCount::Unavailable
        }
    };

    Ok(Some(HousingRecord {
        place: zipcode::place_name(&zip_code),
        zip_code,
        total_units: counts.total_units,
        owner_occupied_units: counts.owner_occupied,
        renter_occupied_units: counts.renter_occupied,
        single_family_detached_units: counts.single_family_detached,
        apartments_units: counts.apartments,
        business_establishments,
        percent_owner_occupied: percent,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_owner_occupied() {
        assert_eq!(percent_owner_occupied(600, 1000), 60.0);
        assert_eq!(percent_owner_occupied(1, 3), 33.33);
        assert_eq!(percent_owner_occupied(2, 3), 66.67);
        assert_eq!(percent_owner_occupied(1000, 1000), 100.0);
    }

    #[test]
    fn test_percent_ties_round_to_even() {
        assert_eq!(percent_owner_occupied(1, 32), 3.12);
        assert_eq!(percent_owner_occupied(5, 32), 15.62);
        assert_eq!(percent_owner_occupied(3, 32), 9.38);
        assert_eq!(percent_owner_occupied(1, 8), 12.5);
    }

    #[test]
    fn test_percent_zero_total() {
        assert_eq!(percent_owner_occupied(0, 0), 0.0);
        assert_eq!(percent_owner_occupied(5, 0), 0.0);
    }

    #[test]
    fn test_meets_threshold() {
        assert!(meets_threshold(10.0, None));
        assert!(meets_threshold(50.0, Some(50.0)));
        assert!(meets_threshold(50.01, Some(50.0)));
        assert!(!meets_threshold(49.99, Some(50.0)));
        // 1/32 is 3.125%, reported as 3.12
        assert!(!meets_threshold(percent_owner_occupied(1, 32), Some(3.125)));
    }
}
