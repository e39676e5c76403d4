pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod housing;
pub mod logger;
pub mod types;
pub mod zipcode;

pub use api::build_app;
pub use client::{CensusClient, CensusConfig};
pub use config::ServerConfig;
pub use error::{CensusError, Result};
pub use housing::{collect_housing_data, percent_owner_occupied};
pub use types::{BusinessCount, HousingDataResponse, HousingRecord, ZipResult};
pub use zipcode::place_name;
