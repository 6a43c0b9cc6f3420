use std::path::PathBuf;

use skillconv_core::convert::transform_conversion;
use skillconv_core::platform::Platform;

use crate::api::{self, ApiConfig};
use crate::prelude::{println, *};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct Options {
    /// Skill file to upload
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Source platform: claude, chatgpt, gemini
    #[arg(long = "from", env = "SKILLCONV_SOURCE", default_value = "claude")]
    pub source: String,

    /// Target platform: claude, chatgpt, gemini
    #[arg(long = "to", env = "SKILLCONV_TARGET", default_value = "chatgpt")]
    pub target: String,

    /// Email to associate with the conversion
    #[arg(long, env = "SKILLCONV_EMAIL")]
    pub email: Option<String>,

    /// Write the converted content to a file (a directory picks the default filename)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let source: Platform = options.source.parse()?;
    let target: Platform = options.target.parse()?;

    let config = ApiConfig::from_env().with_overrides(global.api_url.clone());
    if global.verbose {
        println!("Conversion service: {}", config.base_url);
        println!();
    }

    let spinner = start_spinner(f!(
        "Uploading {} ({source} -> {target})...",
        options.file.display()
    ));
    let result = api::upload_convert_data(
        &config,
        &options.file,
        source,
        target,
        options.email.clone(),
    )
    .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let output = transform_conversion(result?, source, target);

    crate::convert::emit_result(&output, options.output.as_deref(), options.json).await
}
