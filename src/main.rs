use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    cmr_search::cli::run().await
}
