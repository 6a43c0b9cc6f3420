use colored::Colorize;

use crate::api::{self, ApiConfig};
use crate::prelude::{println, *};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct Options {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let config = ApiConfig::from_env().with_overrides(global.api_url.clone());

    let health = api::health_data(&config).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&health)?);
    } else {
        let mut table = new_table();
        table.add_row(prettytable::row![
            "Service".bold().cyan(),
            config.base_url.bright_white()
        ]);
        table.add_row(prettytable::row![
            "Status".bold().cyan(),
            health.status.green()
        ]);
        table.printstd();
    }

    Ok(())
}
