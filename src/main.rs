//! `composer` command-line entry point

mod cli;

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{CliArgs, Command, RunConfig};
use feed_composer::emoji::{search, DataMapResolver, EmojiDataMap, EmojiRecord, FileStore};
use feed_composer::{detect, ComposerConfig, FrequencyStore, Pipeline};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    feed_composer::tracing::init(args.verbose);

    let config = args
        .into_config(ComposerConfig::load())
        .map_err(anyhow::Error::msg)?;
    run(config)
}

fn run(config: RunConfig) -> Result<()> {
    tracing::debug!("Running {:?}", config.command);

    let composer = &config.composer;

    match config.command {
        Command::Detect { text, caret } => {
            let caret = caret.unwrap_or_else(|| text.chars().count());
            match detect(&text, caret) {
                Some(m) => println!(
                    "{} query={:?} span={}..{}",
                    m.trigger_char(),
                    m.query,
                    m.start_offset,
                    m.end_offset
                ),
                None => println!("no trigger"),
            }
        }
        Command::Search { query, .. } => {
            let data = load_data(composer)?;
            for record in search(&data, &query, composer.max_results) {
                print_record(record);
            }
        }
        Command::Frequent => {
            let data = load_data(composer)?;
            let mut frequency = open_frequency()?;
            for id in frequency.list(composer.max_frequent_rows, composer.per_line) {
                match data.get(&id) {
                    Some(record) => print_record(record),
                    None => println!("{}", id),
                }
            }
        }
        Command::Record { id, skin } => {
            let data = load_data(composer)?;
            let record = data
                .get(&id)
                .with_context(|| format!("Unknown emoji: {}", id))?;
            let mut frequency = open_frequency()?;
            frequency.record(&record.id);
            if let Some(skin) = skin {
                frequency.set_skin_tone(skin);
            }
            frequency.flush().context("Failed to save emoji usage")?;
            println!("{} used {} times", record.id, frequency.count(&record.id));
        }
        Command::Convert { input } => {
            let markdown = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };
            let data = Arc::new(load_data(composer)?);
            convert(&data, composer, &markdown);
        }
    }

    Ok(())
}

fn load_data(config: &ComposerConfig) -> Result<EmojiDataMap> {
    config.load_data().context("Failed to load emoji data")
}

fn open_frequency() -> Result<FrequencyStore> {
    let store = FileStore::open_default().context("Failed to open usage store")?;
    Ok(FrequencyStore::load(Box::new(store)))
}

fn convert(data: &Arc<EmojiDataMap>, config: &ComposerConfig, markdown: &str) {
    let resolver = DataMapResolver::new(Arc::clone(data), config.emoji_set.clone())
        .with_url_template(config.image_url.clone());
    let pipeline = Pipeline::new(Arc::new(resolver));

    let document = pipeline.import_document(markdown);
    for (i, node) in document.nodes().iter().enumerate() {
        println!("{:>3} {:<12} {:?}", i, node.kind_name(), node.plain_text());
    }
    println!("{}", pipeline.export_document(&document));
}

fn print_record(record: &EmojiRecord) {
    let glyph = record
        .native
        .as_deref()
        .or(record.src.as_deref())
        .unwrap_or("");
    println!("{}  {}  {}  {}", glyph, record.shortcode, record.id, record.name);
}
