//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3.0 document for the journal API to disk so clients
//! can pick up the contract without booting the server. Takes the output
//! path as its only argument and falls back to `openapi.json`.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    let document = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, &document)?;
    println!("wrote {path} ({} bytes)", document.len());
    Ok(())
}
