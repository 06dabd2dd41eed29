use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use bookvibe_core::browse::BrowseState;
use bookvibe_core::catalog::{BookLookup, CatalogQuery};
use bookvibe_core::config::{apply_env, config_path, data_dir, load_config, set_config_key, AppConfig};
use bookvibe_core::display::{main_subject, truncate_text, BookType};
use bookvibe_core::filename::download_filename;
use bookvibe_core::prefs::Preferences;
use bookvibe_core::record::{DisplayRecord, PageResult};
use bookvibe_core::store::DirStore;
use bookvibe_core::CatalogClient;

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "bookvibe")]
#[command(about = "Browse, search, and download books from the Project Gutenberg catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all books
    List {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// List books ordered by download count
    Popular {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Search titles and authors
    Search {
        /// Free-text query
        #[arg(required = true)]
        query: String,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// List books in a language
    Language {
        /// Language code (en, fr, de, ...)
        #[arg(required = true)]
        code: String,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// List books on a topic (subject or bookshelf)
    Topic {
        /// Topic text
        #[arg(required = true)]
        topic: String,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Show one book and add it to the reading history
    Show {
        /// Book id
        id: u64,
    },

    /// Download a book in its best available format
    Download {
        /// Book id
        id: u64,

        /// Output file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Manage favorite books
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Show the reading history
    History {
        /// Forget all entries
        #[arg(long)]
        clear: bool,
    },

    /// Manage user settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite book ids
    List,
    /// Add a book
    Add { id: u64 },
    /// Remove a book
    Remove { id: u64 },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show current settings
    Show,
    /// Set a value (preferred_language, theme, font_size)
    Set { key: String, value: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize default config file
    Init,
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Key (dot-separated path)
        key: String,
        /// Value
        value: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut config = load_config();
    apply_env(&mut config);
    tracing::debug!(base_url = %config.api.base_url, data_dir = ?config.storage.data_dir, "Resolved config");

    let json = cli.json;
    let result = match cli.command {
        Commands::List { page } => run_page(&config, CatalogQuery::All, page, json).await,
        Commands::Popular { page } => run_page(&config, CatalogQuery::Popular, page, json).await,
        Commands::Search { query, page } => run_page(&config, CatalogQuery::Search(query), page, json).await,
        Commands::Language { code, page } => run_page(&config, CatalogQuery::Language(code), page, json).await,
        Commands::Topic { topic, page } => run_page(&config, CatalogQuery::Topic(topic), page, json).await,
        Commands::Show { id } => run_show(&config, id, json).await,
        Commands::Download { id, output } => run_download(&config, id, output.as_deref(), json).await,
        Commands::Favorites { action } => run_favorites(&config, &action, json),
        Commands::History { clear } => run_history(&config, clear, json),
        Commands::Settings { action } => run_settings(&config, &action, json),
        Commands::Config { action } => run_config(&config, &action, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn preferences(config: &AppConfig) -> Result<Preferences<DirStore>, Box<dyn std::error::Error + Send + Sync>> {
    let dir = data_dir(&config.storage).ok_or("Could not determine data directory")?;
    Ok(Preferences::new(DirStore::new(dir)))
}

async fn run_page(config: &AppConfig, query: CatalogQuery, page: u32, json: bool) -> CliResult {
    let client = CatalogClient::from_config(&config.api)?;
    let mut state = BrowseState::new(query);
    state.set_page(page);
    let result = client.query(&state.query, state.page).await?;
    state.apply(&result);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    print_page(&result, &state, config.api.items_per_page);
    Ok(())
}

fn print_page(result: &PageResult, state: &BrowseState, per_page: u32) {
    if result.is_empty() {
        println!("No books found");
    }
    for book in &result.books {
        println!(
            "{:>6}  {}  by {} ({}, {} downloads)",
            book.id,
            truncate_text(&book.title, 60),
            book.author,
            book.language,
            book.views
        );
    }
    let more = if state.has_more { ", more available" } else { "" };
    println!(
        "Page {} of {}, {} books total{}",
        state.page,
        state.total_pages(per_page),
        state.total,
        more
    );
}

async fn run_show(config: &AppConfig, id: u64, json: bool) -> CliResult {
    let client = CatalogClient::from_config(&config.api)?;
    let book = match client.fetch_book(id).await {
        BookLookup::Found(book) => book,
        BookLookup::NotFound => return Err(format!("Book not found: {}", id).into()),
        BookLookup::Unavailable(e) => return Err(format!("Book not found: {} ({})", id, e).into()),
    };

    let prefs = preferences(config)?;
    prefs.record_read(book.id);
    let favorite = prefs.is_favorite(book.id);

    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
        return Ok(());
    }
    print_book(&book, favorite);
    Ok(())
}

fn print_book(book: &DisplayRecord, favorite: bool) {
    let star = if favorite { " *" } else { "" };
    println!("{}{}", book.title, star);
    println!("Author: {}", book.author);
    println!("Year: {}", book.year);
    println!("Language: {}", book.language);
    println!("Subject: {}", main_subject(&book.subjects));
    println!("Format: {}", BookType::from_formats(&book.formats));
    println!("Downloads: {}", book.views);
    println!("Cover: {}", book.cover);
    if let Some(url) = &book.read_url {
        println!("Read: {}", url);
    }
    if let Some(url) = &book.download_url {
        println!("Download: {}", url);
    }
}

async fn run_download(config: &AppConfig, id: u64, output: Option<&str>, json: bool) -> CliResult {
    let client = CatalogClient::from_config(&config.api)?;
    let book = client
        .fetch_book(id)
        .await
        .into_option()
        .ok_or_else(|| format!("Book not found: {}", id))?;
    let url = book
        .download_url
        .as_deref()
        .ok_or_else(|| format!("No downloadable format for \"{}\"", book.title))?;

    let data = client.download(url).await?;
    let out_path = match output {
        Some(p) => PathBuf::from(p),
        None => {
            let name = download_filename(&book, &config.download.template);
            match &config.download.output_dir {
                Some(dir) => Path::new(dir).join(name),
                None => PathBuf::from(name),
            }
        }
    };
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    tracing::debug!(path = %out_path.display(), bytes = data.len(), "Writing download");
    std::fs::write(&out_path, &data)?;

    if json {
        let info = serde_json::json!({
            "id": book.id,
            "path": out_path.display().to_string(),
            "bytes": data.len(),
            "url": url,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Saved {} ({} bytes)", out_path.display(), data.len());
    }
    Ok(())
}

fn run_favorites(config: &AppConfig, action: &FavoritesAction, json: bool) -> CliResult {
    let prefs = preferences(config)?;
    let favorites = match action {
        FavoritesAction::List => prefs.favorites(),
        FavoritesAction::Add { id } => prefs.add_favorite(*id),
        FavoritesAction::Remove { id } => prefs.remove_favorite(*id),
    };
    print_ids(&favorites, "No favorites", json)
}

fn run_history(config: &AppConfig, clear: bool, json: bool) -> CliResult {
    let prefs = preferences(config)?;
    if clear {
        prefs.clear_history();
        if !json {
            println!("Cleared reading history");
            return Ok(());
        }
    }
    print_ids(&prefs.history(), "No books read yet", json)
}

fn print_ids(ids: &[u64], empty: &str, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string(ids)?);
    } else if ids.is_empty() {
        println!("{}", empty);
    } else {
        for id in ids {
            println!("{}", id);
        }
    }
    Ok(())
}

fn run_settings(config: &AppConfig, action: &SettingsAction, json: bool) -> CliResult {
    let prefs = preferences(config)?;
    match action {
        SettingsAction::Show => {
            let settings = prefs.settings();
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("{}", toml::to_string_pretty(&settings)?);
            }
        }
        SettingsAction::Set { key, value } => {
            let mut settings = prefs.settings();
            settings.set(key, value)?;
            prefs.save_settings(&settings);
            if !json {
                println!("Updated {}", key);
            }
        }
    }
    Ok(())
}

fn run_config(config: &AppConfig, action: &ConfigAction, json: bool) -> CliResult {
    match action {
        ConfigAction::Init => {
            let path = config_path().ok_or("Could not determine config directory")?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let toml = toml::to_string_pretty(&AppConfig::default())?;
            std::fs::write(&path, toml)?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Show => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("{}", toml::to_string_pretty(config)?);
            }
        }
        ConfigAction::Set { key, value } => {
            let path = config_path().ok_or("Could not determine config directory")?;
            let mut cfg: AppConfig = if path.exists() {
                let s = std::fs::read_to_string(&path)?;
                toml::from_str(&s).map_err(|e| format!("Invalid config {}: {}", path.display(), e))?
            } else {
                AppConfig::default()
            };

            set_config_key(&mut cfg, key, value)?;

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, toml::to_string_pretty(&cfg)?)?;
            if !json {
                println!("Updated {}", key);
            }
        }
    }
    Ok(())
}
