use crate::error::{CensusError, Result};

/// Normalize a requested ZIP code to the 5-digit form used for ZCTA queries.
///
/// Accepts `12345` and ZIP+4 (`12345-6789`), surrounding whitespace ignored.
pub fn normalize(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let zip = match raw.split_once('-') {
        Some((zip, plus4)) if is_digits(plus4, 4) => zip,
        Some(_) => return Err(CensusError::InvalidZip(raw.to_string())),
        None => raw,
    };

    if is_digits(zip, 5) {
        Ok(zip.to_string())
    } else {
        Err(CensusError::InvalidZip(raw.to_string()))
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Look up city and state from a US zip code
pub fn lookup_zipcode(zip: &str) -> Option<(String, String)> {
    // Avoid zipcodes::matching to suppress debug_print output.
    let results = zipcodes::filter_by(vec![|z| z.zip_code == zip], None).ok()?;
    let info = results.first()?;
    Some((info.city.clone(), info.state.clone()))
}

/// Human readable "City, ST" for a ZIP code, if it is known
pub fn place_name(zip: &str) -> Option<String> {
    let (city, state) = lookup_zipcode(zip)?;
    if city.is_empty() {
        return None;
    }
    Some(format!("{}, {}", city, state))
}
