use clap::{Parser, Subcommand};
use sitefuse::{build, config, output, paths::ProjectPaths};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "sitefuse")]
#[command(about = "Static site build tool composing HTML from partial templates")]
#[command(long_about = "\
Static site build tool composing HTML from partial templates

Templates reference fragments with include directives:

  <!-- INCLUDE: components/header -->

References resolve against the shared source tree first, then the templates
area; the .html suffix is optional. Expansion is recursive, so fragments may
include other fragments — cycles are detected and reported with the full
include chain.

Project layout (configurable via sitefuse.toml):

  site/
  ├── sitefuse.toml                # Build config (optional)
  ├── src/
  │   ├── templates/index.html     # Entry template
  │   ├── components/              # Include fragments
  │   ├── assets/                  # Images, fonts
  │   ├── styles/                  # CSS
  │   ├── scripts/                 # JS
  │   └── vendor/                  # Third-party bundles
  └── dist/                        # Build output

Every local asset the composed page references is copied under dist/,
mirroring its reference path. Missing assets are warnings, never failures.

Run 'sitefuse gen-config' to generate a documented sitefuse.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose the site into the distribution directory
    Build {
        /// Minify the composed HTML output
        #[arg(long)]
        minify: bool,
        /// Emit a provenance map (JSON) next to the composed page
        #[arg(long)]
        sourcemap: bool,
    },
    /// Validate templates and assets without writing output
    Check,
    /// Print a stock sitefuse.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { minify, sourcemap } => {
            let config = config::load_config(&cli.root)?;
            let paths = ProjectPaths::new(&cli.root, &config);

            println!(
                "==> Building {} (minify={} sourcemap={})",
                paths.rel(&paths.entry_template(&config)),
                minify,
                sourcemap
            );
            let report = build::run(&paths, &config, build::BuildOptions { minify, sourcemap })?;
            output::print_build_report(&report, &paths);
            println!("==> Build complete: {}", paths.rel(&report.output_path));
        }
        Command::Check => {
            let config = config::load_config(&cli.root)?;
            let paths = ProjectPaths::new(&cli.root, &config);

            println!("==> Checking {}", cli.root.display());
            let report = build::check(&paths, &config)?;
            output::print_check_report(&report, &paths);
            println!("==> Templates are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
