use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;
use url::Url;

mod convert;
mod template;
mod upload;

#[derive(Parser)]
#[clap(version, about = "Bulk-upload assessment questions from a spreadsheet")]
struct Uploader {
    #[clap(flatten)]
    api: ApiArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Args)]
pub struct ApiArgs {
    /// Base URL of the question service.
    #[clap(long, env = "QUESTION_API_URL", value_parser, global = true)]
    api_url: Option<Url>,

    /// Bearer token sent with every request.
    #[clap(long, env = "QUESTION_API_TOKEN", value_parser, hide_env_values = true, global = true)]
    api_token: Option<String>,
}

impl ApiArgs {
    pub fn token(&self) -> Option<SecretString> {
        self.api_token.clone().map(SecretString::new)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Convert a sheet offline and report row issues.
    Convert {
        #[clap(short, long, value_parser, value_name = "PATH")]
        input: PathBuf,

        /// Catalog JSON file; fetched from the API when omitted.
        #[clap(short, long, value_parser, value_name = "PATH")]
        catalog: Option<PathBuf>,

        /// Where to write the converted records.
        #[clap(short, long, value_parser, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Convert a sheet and submit the accepted questions.
    Upload {
        #[clap(short, long, value_parser, value_name = "PATH")]
        input: PathBuf,

        #[clap(short, long, value_parser, value_name = "PATH")]
        catalog: Option<PathBuf>,

        /// Stop after conversion.
        #[clap(long)]
        dry_run: bool,
    },
    /// Write the upload template workbook.
    Template {
        #[clap(
            short,
            long,
            value_parser,
            value_name = "PATH",
            default_value = "questions_template.xlsx"
        )]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(feature = "env-file")]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "question_uploader=info,question_uploader_bin=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let uploader = Uploader::parse();

    match uploader.command {
        Command::Convert {
            input,
            catalog,
            output,
        } => convert::convert(&uploader.api, input, catalog, output).await,
        Command::Upload {
            input,
            catalog,
            dry_run,
        } => upload::upload(&uploader.api, input, catalog, dry_run).await,
        Command::Template { output } => template::template(output),
    }
}
