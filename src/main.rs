use std::env;

use anyhow::{Context, Result};
use zcta_housing::{
    CensusClient, CensusConfig, HousingDataResponse, ZipResult, collect_housing_data, logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <zip_codes> [min_owner_occupied]", args[0]);
        eprintln!("  zip_codes: comma-separated (e.g., 12345,54321)");
        eprintln!("  min_owner_occupied: minimum % of owner-occupied units");
        eprintln!("  CENSUS_API_KEY is read from the environment");
        std::process::exit(1);
    }

    logger::init("zcta_housing=warn");

    // Parse comma-separated ZIP codes
    let zip_codes: Vec<String> = args[1]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if zip_codes.is_empty() {
        eprintln!("Error: No ZIP codes provided");
        std::process::exit(1);
    }

    let min_owner_occupied = args
        .get(2)
        .map(|s| s.trim().parse::<f64>())
        .transpose()
        .context("min_owner_occupied must be a number")?;

    let client = CensusClient::with_config(CensusConfig::from_env())?;

    eprintln!("Fetching housing data for {} ZIP code(s)...", zip_codes.len());
    let results = collect_housing_data(&client, &zip_codes, min_owner_occupied).await;

    for result in &results {
        if let ZipResult::Failed { zip_code, error } = result {
            eprintln!("  {}: {}", zip_code, error);
        }
    }
    let failed = results.iter().filter(|r| r.is_error()).count();
    eprintln!("{} record(s), {} failed", results.len(), failed);

    let response = HousingDataResponse { results };
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
