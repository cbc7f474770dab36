use std::process::ExitCode;

use clap::Parser;
use log::error;

use uno_card_generator::assets::Assets;
use uno_card_generator::pipeline::{self, RunSummary};
use uno_card_generator::{Args, Config};

fn generate(args: Args) -> uno_card_generator::Result<RunSummary> {
    let config = Config::from_args(args)?;

    println!("UNO Card Generator");
    println!("==================");
    println!("Output dir:      {}", config.output_dir.display());
    println!("Assets dir:      {}", config.assets_dir.display());
    println!("Test mode:       {}", if config.is_test_mode() { "Yes" } else { "No" });
    println!("First card only: {}", if config.first_only { "Yes" } else { "No" });
    println!("Upscale factor:  {}", config.render.upscale_factor);
    println!(
        "Card size:       {:.1} x {:.1} mm",
        config.card_size.width, config.card_size.height
    );
    println!();

    let assets = Assets::load(&config.assets_dir)?;
    let mut provider = pipeline::provider_for(&config)?;
    pipeline::run(&config, provider.as_mut(), &assets)
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match generate(args) {
        Ok(summary) => {
            println!();
            println!("✓ Cards generated successfully!");
            println!("  Card images:   {}", summary.cards.len());
            println!("  PDF:           {} ({} pages)", summary.pdf_path.display(), summary.pages);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            // The logger may be filtered off; the failure still reaches stderr.
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
