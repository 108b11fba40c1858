use clap::{Parser, Subcommand, ValueEnum};
use occard_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "occard")]
#[command(about = "Image occlusion flashcard manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a card from an image file
    Add {
        /// Card title
        #[arg(long)]
        title: String,

        /// Path to the source image
        #[arg(long)]
        image: PathBuf,

        /// Answer text
        #[arg(long, default_value = "")]
        answer: String,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List all cards, most recently updated first
    List,

    /// Show one card in full
    Show { id: u64 },

    /// Search cards by title or tag
    Search { query: String },

    /// Edit a card's fields
    Edit {
        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        answer: Option<String>,

        /// Replace the tag list (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a card (study sessions for it are kept)
    Delete { id: u64 },

    /// Study session operations
    Study {
        #[command(subcommand)]
        command: StudyCommands,
    },

    /// Export all cards to a file
    Export {
        #[arg(long, value_enum)]
        format: ExportFormat,

        /// Output file path
        #[arg(long)]
        output: PathBuf,

        /// Leave image data out of the export
        #[arg(long)]
        no_images: bool,
    },
}

#[derive(Subcommand)]
enum StudyCommands {
    /// Start a session against a card
    Start { card_id: u64 },

    /// End a session with a score
    End {
        session_id: u64,

        #[arg(long)]
        score: f64,
    },

    /// List sessions for a card, most recent first
    Sessions { card_id: u64 },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportFormat {
    Anki,
    Json,
    Csv,
}

fn main() -> Result<()> {
    occard_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store = Store::open(&data_dir)?;

    match cli.command {
        Commands::Add {
            title,
            image,
            answer,
            tags,
        } => cmd_add(&store, title, image, answer, tags),
        Commands::List => cmd_list(&store),
        Commands::Show { id } => cmd_show(&store, id),
        Commands::Search { query } => cmd_search(&store, &query),
        Commands::Edit {
            id,
            title,
            answer,
            tags,
        } => cmd_edit(&store, id, title, answer, tags),
        Commands::Delete { id } => cmd_delete(&store, id),
        Commands::Study { command } => match command {
            StudyCommands::Start { card_id } => cmd_study_start(&store, card_id),
            StudyCommands::End { session_id, score } => cmd_study_end(&store, session_id, score),
            StudyCommands::Sessions { card_id } => cmd_study_sessions(&store, card_id),
        },
        Commands::Export {
            format,
            output,
            no_images,
        } => cmd_export(&store, &config, format, output, no_images),
    }
}

fn cmd_add(
    store: &Store,
    title: String,
    image: PathBuf,
    answer: String,
    tags: Vec<String>,
) -> Result<()> {
    let ext = image
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mime = media::mime_for_extension(ext)
        .ok_or_else(|| Error::Media(format!("Unsupported image extension: {:?}", ext)))?;

    let bytes = std::fs::read(&image)?;
    let image_data = media::to_data_uri(mime, &bytes);

    let service = CardService::new(store);
    let id = service.create_card(NewCard {
        title,
        image_data,
        occlusions: vec![],
        answer,
        tags,
    })?;

    println!("✓ Created card {}", id);
    Ok(())
}

fn cmd_list(store: &Store) -> Result<()> {
    let service = CardService::new(store);
    let cards = service.all_cards()?;

    if cards.is_empty() {
        println!("No cards yet.");
        return Ok(());
    }

    for card in &cards {
        print_card_line(card);
    }
    println!("\n{} card(s)", cards.len());
    Ok(())
}

fn cmd_show(store: &Store, id: u64) -> Result<()> {
    let service = CardService::new(store);
    match service.get_card(id)? {
        Some(card) => {
            println!("Card {}", id);
            println!("  Title:      {}", card.title);
            println!("  Answer:     {}", card.answer);
            println!("  Tags:       {}", card.tags.join(", "));
            println!("  Occlusions: {}", card.occlusions.len());
            println!("  Created:    {}", card.created_at.to_rfc3339());
            println!("  Updated:    {}", card.updated_at.to_rfc3339());
            Ok(())
        }
        None => {
            println!("Card {} not found.", id);
            Ok(())
        }
    }
}

fn cmd_search(store: &Store, query: &str) -> Result<()> {
    let service = CardService::new(store);
    let cards = service.search_cards(query)?;

    for card in &cards {
        print_card_line(card);
    }
    println!("\n{} match(es)", cards.len());
    Ok(())
}

fn cmd_edit(
    store: &Store,
    id: u64,
    title: Option<String>,
    answer: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let service = CardService::new(store);

    if service.get_card(id)?.is_none() {
        println!("Card {} not found.", id);
        return Ok(());
    }

    let patch = CardPatch {
        title,
        answer,
        tags: if tags.is_empty() { None } else { Some(tags) },
        ..Default::default()
    };
    service.update_card(id, patch)?;

    println!("✓ Updated card {}", id);
    Ok(())
}

fn cmd_delete(store: &Store, id: u64) -> Result<()> {
    let service = CardService::new(store);
    service.delete_card(id)?;
    println!("✓ Deleted card {}", id);
    Ok(())
}

fn cmd_study_start(store: &Store, card_id: u64) -> Result<()> {
    let service = StudyService::new(store);
    let id = service.start_session(card_id)?;
    println!("✓ Started session {} for card {}", id, card_id);
    Ok(())
}

fn cmd_study_end(store: &Store, session_id: u64, score: f64) -> Result<()> {
    let service = StudyService::new(store);
    service.end_session(session_id, score)?;
    println!("✓ Ended session {} with score {}", session_id, score);
    Ok(())
}

fn cmd_study_sessions(store: &Store, card_id: u64) -> Result<()> {
    let service = StudyService::new(store);
    let sessions = service.sessions_for_card(card_id)?;

    for session in &sessions {
        let status = match session.end_time {
            Some(end) => format!("ended {} score {}", end.to_rfc3339(), session.score),
            None => "in progress".to_string(),
        };
        println!(
            "  [{}] started {}  {}",
            session.id.unwrap_or_default(),
            session.start_time.to_rfc3339(),
            status
        );
    }
    println!("\n{} session(s) for card {}", sessions.len(), card_id);
    Ok(())
}

fn cmd_export(
    store: &Store,
    config: &Config,
    format: ExportFormat,
    output: PathBuf,
    no_images: bool,
) -> Result<()> {
    let service = CardService::new(store);
    let cards = service.all_cards()?;

    let mut options = config.export_options();
    if no_images {
        options.include_images = false;
    }

    let bytes = match format {
        ExportFormat::Anki => export_to_anki(&cards, &options)?,
        ExportFormat::Json => export_to_json(&cards, &options)?,
        ExportFormat::Csv => export_to_csv(&cards, &options)?,
    };

    std::fs::write(&output, &bytes)?;
    println!("✓ Exported {} card(s) to {}", cards.len(), output.display());
    Ok(())
}

fn print_card_line(card: &OcclusionCard) {
    println!(
        "  [{}] {}  ({} occlusion(s), tags: {})",
        card.id.unwrap_or_default(),
        card.title,
        card.occlusions.len(),
        card.tags.join(", ")
    );
}
