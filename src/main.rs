use clap::Parser;
use color_eyre::Result;
use nri_spark::{
    init_errors,
    App,
};
use nri_spark_config::Args;

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    App::new(Args::parse())?.run().await
}
