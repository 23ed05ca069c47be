use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use question_uploader::helpers::write_json;
use question_uploader::{
    convert_rows, ensure_catalog, read_rows, Catalog, ConversionReport, QuestionApi,
};

use crate::ApiArgs;

pub async fn convert(
    api: &ApiArgs,
    input: PathBuf,
    catalog_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let report = load_and_convert(api, &input, catalog_path).await?;

    print_report(&report);

    match output {
        Some(path) => {
            write_json(&path, &report.questions)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {} questions to {}", report.accepted(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report.questions)?),
    }

    Ok(())
}

pub async fn load_and_convert(
    api: &ApiArgs,
    input: &Path,
    catalog_path: Option<PathBuf>,
) -> Result<ConversionReport> {
    let catalog = match catalog_path {
        Some(path) => {
            Catalog::load(&path).with_context(|| format!("loading catalog {}", path.display()))?
        }
        None => client(api)?
            .fetch_catalog()
            .await
            .context("fetching question catalog")?,
    };
    ensure_catalog(&catalog)?;

    let rows = read_rows(input).with_context(|| format!("reading {}", input.display()))?;

    Ok(convert_rows(&rows, &catalog))
}

pub fn client(api: &ApiArgs) -> Result<QuestionApi> {
    let Some(base_url) = api.api_url.clone() else {
        bail!("QUESTION_API_URL is not set; pass --api-url or a --catalog file");
    };

    Ok(QuestionApi::new(base_url, api.token())?)
}

pub fn print_report(report: &ConversionReport) {
    for issue in report.warnings() {
        eprintln!("row {}: warning: {}", issue.row, issue.message);
    }

    if report.has_errors() {
        for issue in report.errors() {
            eprintln!("row {}: skipped: {}", issue.row, issue.message);
        }
    }

    eprintln!(
        "{} of {} rows accepted, {} skipped",
        report.accepted(),
        report.total_rows,
        report.rejected()
    );
}
