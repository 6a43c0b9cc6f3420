use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use colored::Colorize;
use skillconv_core::convert::{
    confidence_bar, transform_conversion, validate_content, ConversionOutput, ConversionRequest,
};
use skillconv_core::platform::{detect_platform, Platform};

use crate::api::{self, ApiConfig};
use crate::prelude::{println, *};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct Options {
    /// Skill content to convert (reads stdin when omitted)
    #[arg(value_name = "CONTENT")]
    pub content: Option<String>,

    /// Read skill content from a file instead
    #[arg(short, long, conflicts_with = "content")]
    pub input: Option<PathBuf>,

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

    let content = read_content(&options)?;
    validate_content(&content).map_err(Error::InvalidInput)?;

    if global.verbose {
        if let Some(detected) = detect_platform(&content) {
            if detected != source {
                println!(
                    "{}",
                    format!("Note: content looks like {} but is being converted as {}", detected.label(), source.label())
                        .yellow()
                );
            }
        }
    }

    let config = ApiConfig::from_env().with_overrides(global.api_url.clone());
    if global.verbose {
        println!("Conversion service: {}", config.base_url);
        println!();
    }

    let request = ConversionRequest {
        source_content: content,
        source_platform: source,
        target_platform: target,
        user_email: options.email.clone(),
    };

    let spinner = start_spinner(f!("Converting {source} -> {target}..."));
    let result = api::convert_data(&config, &request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let output = transform_conversion(result?, source, target);

    emit_result(&output, options.output.as_deref(), options.json).await
}

/// Resolve skill content from the positional argument, --input, or stdin.
fn read_content(options: &Options) -> Result<String> {
    if let Some(content) = &options.content {
        return Ok(content.clone());
    }

    if let Some(path) = &options.input {
        return std::fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read {}: {e}", path.display()));
    }

    if std::io::stdin().is_terminal() {
        return Err(Error::InvalidInput(
            "No skill content provided. Pass it as an argument, use --input, or pipe it on stdin."
                .to_string(),
        )
        .into());
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| eyre!("Failed to read stdin: {e}"))?;

    Ok(buffer)
}

/// Print a conversion result and optionally save the converted content.
///
/// Shared by `convert` and `upload`, which produce the same output record.
pub async fn emit_result(
    output: &ConversionOutput,
    save_to: Option<&Path>,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        print!("{}", format_result_text(output));
    }

    if let Some(path) = save_to {
        let path = resolve_output_path(path, &output.suggested_filename);

        tokio::fs::write(&path, &output.converted_content)
            .await
            .map_err(|e| eyre!("Failed to write {}: {e}", path.display()))?;

        if !json {
            println!("{} {}", "Saved to:".green().bold(), path.display());
        }
    }

    Ok(())
}

/// A directory target picks the conversion's suggested filename.
fn resolve_output_path(path: &Path, suggested_filename: &str) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_filename)
    } else {
        path.to_path_buf()
    }
}

/// Convert a result to formatted text with colors
fn format_result_text(output: &ConversionOutput) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!(
            "CONVERTED SKILL ({} -> {})",
            output.source_platform, output.target_platform
        )
        .bright_cyan()
        .bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    result.push_str(&format!(
        "\n{}: {} {}\n",
        "Confidence".green(),
        confidence_bar(output.confidence_score, 24).bright_green(),
        output.confidence_percent.bright_white().bold()
    ));

    result.push_str(&format!("\n{}\n", output.converted_content));

    if !output.conversion_notes.is_empty() {
        result.push_str(&format!("\n{}\n", "CONVERSION NOTES".bright_cyan().bold()));
        for note in &output.conversion_notes {
            result.push_str(&format!("  - {note}\n"));
        }
    }

    if !output.warnings.is_empty() {
        result.push_str(&format!("\n{}\n", "WARNINGS".yellow().bold()));
        for warning in &output.warnings {
            result.push_str(&format!("  - {}\n", warning.yellow()));
        }
    }

    if !output.incompatible_features.is_empty() {
        result.push_str(&format!(
            "\n{}\n",
            "INCOMPATIBLE FEATURES".red().bold()
        ));
        for feature in &output.incompatible_features {
            result.push_str(&format!("  - {}\n", feature.red()));
        }
    }

    result.push_str(&format!("\n{}:\n", "To save the result".bright_white().bold()));
    result.push_str(&format!(
        "  {}\n",
        format!(
            "skillconv convert --from {} --to {} --output {}",
            output.source_platform, output.target_platform, output.suggested_filename
        )
        .cyan()
    ));

    result.push_str(&format!("\n{}:\n", "To get JSON output".bright_white().bold()));
    result.push_str(&format!("  {}\n", "skillconv convert --json".cyan()));

    result.push('\n');
    result
}
