//! One generation run: deck, art, render, PNG files, PDF.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::assets::{Assets, TEST_BACKGROUND};
use crate::config::Config;
use crate::deck::{DECK_SIZE, build_deck};
use crate::error::{Error, Result};
use crate::layout;
use crate::pdf;
use crate::prompt::prompt_for;
use crate::provider::{ImageProvider, OpenAiProvider, PlaceholderProvider};
use crate::render::{CardFile, render};

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub cards: Vec<CardFile>,
    pub pdf_path: PathBuf,
    pub pages: usize,
}

/// Picks the art source for this run: the placeholder in test mode, the API otherwise.
pub fn provider_for(config: &Config) -> Result<Box<dyn ImageProvider>> {
    match &config.api {
        None => {
            let path = config.assets_dir.join(TEST_BACKGROUND);
            Ok(Box::new(PlaceholderProvider::load(&path)?))
        }
        Some(api) => {
            let provider = OpenAiProvider::new(&api.base_url, &api.key, &api.model, &api.size)
                .map_err(Error::Client)?;
            Ok(Box::new(provider))
        }
    }
}

pub fn run(config: &Config, provider: &mut dyn ImageProvider, assets: &Assets) -> Result<RunSummary> {
    // Fail on an impossible page grid before spending any API calls.
    let grid = layout::grid(config.card_size, &config.sheet)?;
    let coverage = grid.coverage(config.card_size, &config.sheet);
    if coverage < 0.5 {
        warn!(
            "{}x{} grid covers only {:.0}% of the page; check card width, margins and spacing",
            grid.columns,
            grid.rows,
            coverage * 100.0
        );
    }

    fs::create_dir_all(&config.output_dir).map_err(|source| Error::Output {
        path: config.output_dir.clone(),
        source,
    })?;

    let deck = build_deck();
    let limit = if config.first_only { 1 } else { deck.len() };
    let mut cards = Vec::with_capacity(limit);

    for (i, card) in deck.iter().take(limit).enumerate() {
        let prompt = prompt_for(card);
        if config.is_test_mode() {
            info!("[{:03}/{}] test mode: {} -> using test background", i + 1, DECK_SIZE, card);
        } else {
            info!("[{:03}/{}] {} -> {}", i + 1, DECK_SIZE, card, prompt);
        }

        let art = provider
            .fetch(card, &prompt)
            .map_err(|source| Error::Provider { card: *card, source })?;
        let rendered = render(card, &art, assets, &config.render)
            .map_err(|source| Error::Render { card: *card, source })?;
        let file = rendered.save(&config.output_dir).map_err(|source| Error::SaveCard {
            path: config.output_dir.join(card.file_name()),
            source,
        })?;
        cards.push(file);
    }

    if config.first_only {
        info!("Stopping after first card (first-only mode)");
    }
    info!(
        "Generated {} card images at {}",
        cards.len(),
        config.output_dir.display()
    );

    let pdf_path = config.pdf_path();
    info!("Building PDF: {}", pdf_path.display());
    let pages = layout::pack(cards.clone(), config.card_size, &config.sheet)?;
    let pages = pdf::write_pdf(&pages, config.card_size, config.sheet.page, &pdf_path)?;

    Ok(RunSummary {
        cards,
        pdf_path,
        pages,
    })
}
