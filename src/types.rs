use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{CensusError, Result};

/// Census variable names
pub mod variables {
    pub const TOTAL_UNITS: &str = "B25001_001E";
    pub const OWNER_OCCUPIED: &str = "B25003_002E";
    pub const RENTER_OCCUPIED: &str = "B25003_003E";
    pub const SINGLE_FAMILY_DETACHED: &str = "B25024_002E";
    pub const APARTMENTS: &str = "B25032_010E";
    pub const ESTABLISHMENTS: &str = "ESTAB"; // County Business Patterns

    /// ACS variables requested for each ZIP, in request order.
    pub const HOUSING: [&str; 5] = [
        TOTAL_UNITS,
        OWNER_OCCUPIED,
        RENTER_OCCUPIED,
        SINGLE_FAMILY_DETACHED,
        APARTMENTS,
    ];
}

/// Tabular response from the Census data API.
///
/// The API answers with a JSON array of rows: the first row names the
/// columns, the following rows hold values (usually as strings).
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct DataTable {
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    /// True when the table has a header and at least one value row
    pub fn has_values(&self) -> bool {
        self.rows.len() > 1
    }

    /// Read an integer from the first value row, locating the column by name
    pub fn integer(&self, variable: &str) -> Result<i64> {
        let header = self.rows.first().ok_or(CensusError::NoData)?;
        let values = self.rows.get(1).ok_or(CensusError::NoData)?;

        let column = header
            .iter()
            .position(|name| name.as_str() == Some(variable))
            .ok_or_else(|| CensusError::MissingColumn(variable.to_string()))?;

        let value = match values.get(column) {
            None | Some(Value::Null) => {
                return Err(CensusError::MissingValue(variable.to_string()));
            }
            Some(value) => value,
        };

        let parsed = match value {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };

        parsed.ok_or_else(|| CensusError::InvalidValue {
            variable: variable.to_string(),
            value: value.to_string(),
        })
    }
}

/// Housing unit counts for one ZCTA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HousingCounts {
    pub total_units: i64,
    pub owner_occupied: i64,
    pub renter_occupied: i64,
    pub single_family_detached: i64,
    pub apartments: i64,
}

impl HousingCounts {
    pub fn from_table(table: &DataTable) -> Result<Self> {
        Ok(Self {
            total_units: table.integer(variables::TOTAL_UNITS)?,
            owner_occupied: table.integer(variables::OWNER_OCCUPIED)?,
            renter_occupied: table.integer(variables::RENTER_OCCUPIED)?,
            single_family_detached: table.integer(variables::SINGLE_FAMILY_DETACHED)?,
            apartments: table.integer(variables::APARTMENTS)?,
        })
    }
}

/// Number of business establishments, or a marker when the count could not be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessCount {
    Known(i64),
    Unavailable,
}

impl Serialize for BusinessCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Known(count) => serializer.serialize_i64(*count),
            Self::Unavailable => serializer.serialize_str("data_unavailable"),
        }
    }
}

/// Aggregated housing record for one ZIP code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HousingRecord {
    pub zip_code: String,
    pub total_units: i64,
    pub owner_occupied_units: i64,
    pub renter_occupied_units: i64,
    pub single_family_detached_units: i64,
    pub apartments_units: i64,
    pub business_establishments: BusinessCount,
    pub percent_owner_occupied: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

/// Outcome for one requested ZIP code
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ZipResult {
    Housing(HousingRecord),
    Failed { zip_code: String, error: String },
}

impl ZipResult {
    pub fn failed(zip_code: impl Into<String>, error: &CensusError) -> Self {
        Self::Failed {
            zip_code: zip_code.into(),
            error: error.to_string(),
        }
    }

    pub fn zip_code(&self) -> &str {
        match self {
            Self::Housing(record) => &record.zip_code,
            Self::Failed { zip_code, .. } => zip_code,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Body returned by the housing data endpoint and the CLI
#[derive(Debug, Clone, Serialize)]
pub struct HousingDataResponse {
    pub results: Vec<ZipResult>,
}
