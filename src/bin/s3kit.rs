use anyhow::Result;
use s3kit::cli::start;

#[tokio::main]
async fn main() -> Result<()> {
    let (s3, action) = start()?;

    action.run(&s3).await
}
