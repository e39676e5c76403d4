/// Example HTTP client demonstrating how to call the housing data server API
///
/// Run the server first:
/// ```bash
/// CENSUS_API_KEY=... cargo run --bin server
/// ```
///
/// Then run this example:
/// ```bash
/// cargo run --example api_client
/// ```
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, Debug)]
struct HousingDataResponse {
    results: Vec<Value>,
}

#[derive(Deserialize, Debug)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Deserialize, Debug)]
struct MetricsResponse {
    total_requests: u64,
    zip_codes_processed: u64,
    uptime_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client = reqwest::Client::new();

    println!("=== Housing Data API Client Demo ===\n");

    // 1. Health Check
    println!("1. Checking server health...");
    let health: HealthResponse = client
        .get(format!("{}/health", base_url))
        .send()
        .await?
        .json()
        .await?;
    println!("   Server status: {}", health.status);
    println!("   Version: {}\n", health.version);

    // 2. Housing data for a few ZIP codes
    println!("2. Fetching housing data...");
    let query = [
        ("zip_codes", "10001"),
        ("zip_codes", "60614"),
        ("zip_codes", "94110"),
    ];
    print_results(&client, &base_url, &query).await?;

    // 3. Same ZIP codes, owner-occupied only
    println!("3. Fetching ZIP codes with at least 40% owner-occupied units...");
    let query = [
        ("zip_codes", "10001,60614,94110"),
        ("min_owner_occupied", "40"),
    ];
    print_results(&client, &base_url, &query).await?;

    // 4. Get Metrics
    println!("4. Getting server metrics...");
    let metrics: MetricsResponse = client
        .get(format!("{}/api/metrics", base_url))
        .send()
        .await?
        .json()
        .await?;
    println!("   Total requests: {}", metrics.total_requests);
    println!("   ZIP codes processed: {}", metrics.zip_codes_processed);
    println!("   Uptime: {} seconds\n", metrics.uptime_seconds);

    println!("=== Demo Complete ===");

    Ok(())
}

async fn print_results(
    client: &reqwest::Client,
    base_url: &str,
    query: &[(&str, &str)],
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client
        .get(format!("{}/api/housing-data/", base_url))
        .query(query)
        .send()
        .await?;

    if !response.status().is_success() {
        println!("   Error: {}\n", response.text().await?);
        return Ok(());
    }

    let body: HousingDataResponse = response.json().await?;
    for record in &body.results {
        let zip = record["zip_code"].as_str().unwrap_or("?");
        match record.get("error") {
            Some(error) => println!("   {} - error: {}", zip, error),
            None => println!(
                "   {} - {} units, {}% owner-occupied, {} establishments",
                zip,
                record["total_units"],
                record["percent_owner_occupied"],
                record["business_establishments"]
            ),
        }
    }
    println!();
    Ok(())
}
