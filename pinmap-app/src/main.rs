use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pinmap::{
    auth::LandingOutcome,
    category::registry,
    core::constants::MAP_CENTER,
    http::{HttpTransport, ReqwestTransport},
    sitemap,
    storage::{Environment, FileStorage, PreferenceStore},
    AppConfig, DataLoader, LatLng, Language, MapData, TourMap,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line driver for the tourism map data pipeline
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File holding persisted preferences and the session
    #[arg(long, env = "PINMAP_STATE", default_value = "pinmap-state.json")]
    state: PathBuf,

    /// Display language (`en` or `zh-TW`); persisted when given
    #[arg(long)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the feed and list the locations of the selected categories
    List,
    /// Show the category filter, or flip one category
    Categories {
        #[arg(long)]
        toggle: Option<String>,
    },
    /// Ranked search over the loaded locations
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Locations closest to a position (defaults to the map center)
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
        #[arg(short, long, default_value_t = 5)]
        count: usize,
    },
    /// Print the popup content of one location
    Show { id: String },
    /// Print the hosted login URL
    LoginUrl,
    /// Complete a login from the URL the identity provider redirected to
    Landing { url: String },
    /// Forget the stored session
    Logout,
    /// List the signed-in user's favorites
    Favorites,
    /// Add or remove a favorite
    Favorite { pin_id: String },
    /// Override the feed URL (omit to reset to the configured one)
    Source { url: Option<String> },
    /// Write sitemap.xml for the guide site
    Sitemap {
        #[arg(short, long, default_value = "public/sitemap.xml")]
        out: PathBuf,
    },
    /// Fetch the map feed and the guide data side by side and report
    Check,
}

fn print_load_state(map: &TourMap) {
    if let Some(banner) = map.banner() {
        eprintln!("! {}", banner);
    }
}

async fn load(map: &mut TourMap) -> anyhow::Result<()> {
    if let MapData::Failed { message } = map.reload().await {
        bail!("could not load locations: {}", message);
    }
    print_load_state(map);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new());

    let backend = FileStorage::open(&cli.state)
        .with_context(|| format!("cannot open state file {}", cli.state.display()))?;
    let store = PreferenceStore::new(Arc::new(backend), Environment::Production);

    let mut map = TourMap::new(config.clone(), transport.clone(), store);
    if let Some(language) = cli.lang {
        map.set_language(language);
    }
    let language = map.language();

    match cli.command {
        Commands::List => {
            load(&mut map).await?;
            for location in map.visible() {
                println!(
                    "{:>6}  {:<20}  {}",
                    location.id,
                    map.language_store().t(location.category().name_key),
                    location.title_for(language)
                );
            }
        }
        Commands::Categories { toggle } => {
            if let Some(id) = toggle {
                if !registry::is_known(&id) {
                    bail!("unknown category '{}'", id);
                }
                map.toggle_category(&id);
            }
            for category in registry::all() {
                let mark = if map.selection().contains(category.id) { "x" } else { " " };
                println!("[{}] {}  {}", mark, category.id, map.language_store().t(category.name_key));
            }
        }
        Commands::Search { query } => {
            load(&mut map).await?;
            let query = query.join(" ");
            let hits = map.search(&query);
            if hits.is_empty() {
                println!("{}", map.language_store().t("message.noResults"));
            }
            for hit in hits {
                println!("{:>4}  {:>6}  {}", hit.score, hit.location.id, hit.location.title_for(language));
            }
        }
        Commands::Nearby { lat, lng, count } => {
            load(&mut map).await?;
            let here = LatLng::new(lat.unwrap_or(MAP_CENTER.0), lng.unwrap_or(MAP_CENTER.1));
            for (location, meters) in map.nearby(&here, count) {
                println!("{:>8.0} m  {:>6}  {}", meters, location.id, location.title_for(language));
            }
        }
        Commands::Show { id } => {
            load(&mut map).await?;
            map.refresh_favorites().await;
            let popup = map
                .popup(&id, None)
                .with_context(|| format!("no location with id '{}'", id))?;
            println!("{}", serde_json::to_string_pretty(&popup)?);
        }
        Commands::LoginUrl => println!("{}", map.login_url()?),
        Commands::Landing { url } => match map.handle_landing(&url).await? {
            LandingOutcome::SignedIn { user, url } => {
                println!("signed in as {}", user.email.as_deref().unwrap_or(&user.sub));
                println!("continue at {}", url);
            }
            LandingOutcome::Restored(user) => {
                println!("session restored for {}", user.email.as_deref().unwrap_or(&user.sub))
            }
            LandingOutcome::Anonymous => println!("not signed in"),
        },
        Commands::Logout => {
            map.logout();
            println!("signed out");
        }
        Commands::Favorites => {
            load(&mut map).await?;
            map.refresh_favorites().await;
            for location in map.favorite_locations() {
                println!("{:>10}  {}", location.pin_id, location.title_for(language));
            }
        }
        Commands::Favorite { pin_id } => {
            map.refresh_favorites().await;
            let toast = map.toggle_favorite(&pin_id).await;
            println!("{}", toast.message);
        }
        Commands::Source { url } => match url {
            Some(url) => {
                map.preferences().set_geojson_url(&url)?;
                println!("feed: {}", map.preferences().geojson_url());
            }
            None => {
                map.preferences().reset_geojson_url();
                println!("feed: {}", map.preferences().geojson_url());
            }
        },
        Commands::Sitemap { out } => {
            let xml = sitemap::build(transport.as_ref(), &config.feed, &config.site).await;
            if let Some(dir) = out.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("cannot create {}", dir.display()))?;
            }
            std::fs::write(&out, &xml).with_context(|| format!("cannot write {}", out.display()))?;
            println!("Sitemap generated successfully at {}", out.display());
        }
        Commands::Check => {
            let loader = DataLoader::new(transport.clone(), config.feed.clone());
            let feed_url = map.preferences().geojson_url();
            let (report, guide) = futures::join!(
                loader.load(&feed_url, language),
                sitemap::fetch_guide_items(transport.as_ref(), &config.feed)
            );
            match report {
                Ok(report) => println!(
                    "map feed: {} locations, {} skipped",
                    report.locations.len(),
                    report.skipped
                ),
                Err(e) => println!("map feed: {}", e),
            }
            println!("guide feed: {} items", guide.len());
        }
    }

    Ok(())
}
