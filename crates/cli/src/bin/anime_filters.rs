use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    anime_filters_cli::main_entry().await
}
