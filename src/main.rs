use clap::{Parser, Subcommand};
use paintshop::config::{self, PortfolioConfig};
use paintshop::derive::{self, GalleryJob};
use paintshop::favicon::{self, FaviconJob};
use paintshop::og_image::{self, OgImageJob};
use paintshop::report::AggregateReport;
use paintshop::output;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "paintshop")]
#[command(about = "Image derivatives for an art portfolio site")]
#[command(long_about = "\
Image derivatives for an art portfolio site

Turns a folder of painting photographs into web-ready tiers, and one logo
into a favicon set plus a social-sharing image.

Default layout (all paths relative to --root):

  images/
  ├── paintings/                   # Sources (flat; .jpg .jpeg .png)
  │   └── featured.jpg             # OG image source
  ├── logo.png                     # Favicon source
  ├── originals/                   # Byte-identical backups
  ├── thumbs/                      # ≤600px wide, progressive JPEG q85
  ├── optimized/                   # ≤1200px wide, progressive JPEG q90
  ├── favicon-*.png, favicon.ico   # Favicon set
  ├── site.webmanifest
  └── og-image.jpg                 # 1200x630

Sources are never modified. Images narrower than a tier are re-encoded at
their native size, never enlarged.

Run 'paintshop gen-config' to generate a documented paintshop.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site root; every configured path resolves against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/paintshop.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write backup, thumbnail and optimized tiers for every painting
    Derive,
    /// Write the favicon set and web app manifest
    Favicons,
    /// Write the social-sharing image
    OgImage,
    /// Run derive, favicons and og-image in sequence
    All,
    /// List the source paintings a derive run would process
    Check,
    /// Print a stock paintshop.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let root = cli.root;
    let config_path = cli
        .config
        .unwrap_or_else(|| root.join(config::CONFIG_FILENAME));
    let load = || config::load_config(&config_path);

    match cli.command {
        Command::Derive => run_derive(&load()?, &root)?,
        Command::Favicons => run_favicons(&load()?, &root)?,
        Command::OgImage => run_og_image(&load()?, &root)?,
        Command::All => {
            let site_config = load()?;
            println!("==> Gallery derivatives");
            run_derive(&site_config, &root)?;
            println!("==> Favicons");
            run_favicons(&site_config, &root)?;
            println!("==> OG image");
            run_og_image(&site_config, &root)?;
        }
        Command::Check => {
            let site_config = load()?;
            let job = GalleryJob::from_config(&site_config.gallery, &root);
            println!("==> Checking {}", job.source_dir.display());
            let report = derive::check_sources(&job)?;
            output::print_check_output(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_derive(site_config: &PortfolioConfig, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    init_thread_pool(&site_config.processing);
    let job = GalleryJob::from_config(&site_config.gallery, root);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_derive_event(&event);
        }
    });
    let result = derive::derive(&job, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    let (results, failures) = result?.partition();
    let report = AggregateReport::from_results(&job.tiers, &results);
    output::print_derive_report(&report, &results, &failures);
    Ok(())
}

fn run_favicons(site_config: &PortfolioConfig, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    init_thread_pool(&site_config.processing);
    let job = FaviconJob::from_config(&site_config.favicons, root);
    let result = favicon::generate_favicons(&job)?;
    output::print_favicon_output(&result);
    Ok(())
}

fn run_og_image(site_config: &PortfolioConfig, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let job = OgImageJob::from_config(&site_config.og_image, root);
    let outcome = og_image::generate_og_image(&job)?;
    output::print_geometry_outcomes(std::slice::from_ref(&outcome));
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores.
/// A second call (the `all` command) is a no-op.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
