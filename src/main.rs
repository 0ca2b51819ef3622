use clap::Parser;
use scilife::content::StudentLevel;
use scilife::core::config;
use scilife::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "scilife", about = "AI-curated science museum in your terminal")]
struct Args {
    /// Audience level for generated exhibits
    #[arg(short, long, value_enum)]
    level: Option<StudentLevel>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to scilife.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("scilife.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {e}");
        Default::default()
    });
    let resolved = config::resolve(&file_config, args.level);
    log::info!("SciLife starting up (level: {:?})", resolved.level);

    tui::run(resolved)
}
