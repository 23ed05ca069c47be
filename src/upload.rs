use std::path::PathBuf;

use anyhow::Result;

use crate::convert::{client, load_and_convert, print_report};
use crate::ApiArgs;

pub async fn upload(
    api: &ApiArgs,
    input: PathBuf,
    catalog_path: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let report = load_and_convert(api, &input, catalog_path).await?;

    print_report(&report);

    if dry_run {
        println!("Dry run: {} questions ready to upload", report.accepted());
        return Ok(());
    }

    let summary = client(api)?.submit(&report.questions).await?;

    println!("{}", summary.message());

    Ok(())
}
