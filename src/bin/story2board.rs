//! CLI binary for story2board.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `StoryboardConfig`, shows a scene preview and writes the script.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use story2board::pipeline::input::DEFAULT_MIN_INPUT_CHARS;
use story2board::{
    check_input, download_images, generate, read_text_file, write_script, InputCheck,
    ProgressCallback, Storyboard, StoryboardConfig, StoryboardProgressCallback, SCRIPT_FILE_NAME,
};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per scene.
struct CliProgressCallback {
    bar: ProgressBar,
    fallbacks: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_generation_start` reports the scene count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Processing text…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            fallbacks: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} scenes  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Finding images");
    }
}

impl StoryboardProgressCallback for CliProgressCallback {
    fn on_generation_start(&self, total_scenes: usize) {
        self.activate_bar(total_scenes);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processed text into {total_scenes} scenes"))
        ));
    }

    fn on_scene_start(&self, scene_num: usize, total_scenes: usize) {
        self.bar
            .set_message(format!("scene {scene_num}/{total_scenes}"));
    }

    fn on_scene_fallback(&self, scene_num: usize, _total: usize, reason: &str) {
        self.fallbacks.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} Scene {:>3}  {}",
            yellow("↺"),
            scene_num,
            dim(&format!("placeholder images ({reason})")),
        ));
    }

    fn on_scene_complete(&self, scene_num: usize, total: usize, image_count: usize) {
        self.bar.println(format!(
            "  {} Scene {:>3}/{:<3}  {}",
            green("✓"),
            scene_num,
            total,
            dim(&format!("{image_count} images")),
        ));
        self.bar.inc(1);
    }

    fn on_generation_complete(&self, total_scenes: usize, fallback_scenes: usize) {
        self.bar.finish_and_clear();
        if fallback_scenes == 0 {
            eprintln!(
                "{} {} scenes ready",
                green("✔"),
                bold(&total_scenes.to_string())
            );
        } else {
            eprintln!(
                "{} {} scenes ready  ({} with placeholder images)",
                cyan("⚠"),
                bold(&total_scenes.to_string()),
                yellow(&fallback_scenes.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Preview a story file (placeholder images without an API key)
  story2board story.txt

  # Write the script, three images per scene, six seconds each
  story2board story.txt -o video_script.txt --images-per-scene 3 --duration 6

  # Inline text, real photos
  PEXELS_API_KEY=... story2board --text "The brave astronaut found a glowing crystal."

  # Pipe from stdin, JSON output
  cat story.txt | story2board --json > storyboard.json

  # Save every scene image next to the script
  story2board story.txt -o out/video_script.txt --download-images out/images

ENVIRONMENT VARIABLES:
  PEXELS_API_KEY            Pexels API key (free at https://www.pexels.com/api/)
  STORY2BOARD_DURATION      Seconds per scene (2–10)
  STORY2BOARD_IMAGES        Images per scene (1–3)
  RUST_LOG                  Override the log filter
"#;

/// Turn a story into a storyboard: scenes, keywords, stock photos and a script.
#[derive(Parser, Debug)]
#[command(
    name = "story2board",
    version,
    about = "Turn prose into a storyboard script with stock photos",
    long_about = "Split a story into sentence scenes, derive search keywords for each scene, \
fetch landscape photos from Pexels (or placeholder images when no key is configured) and \
write a plain-text video script.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Plain-text story file. Reads stdin when neither a file nor --text is given.
    input: Option<PathBuf>,

    /// Story text given inline.
    #[arg(short, long, conflicts_with = "input")]
    text: Option<String>,

    /// Write the script to this file (conventionally video_script.txt).
    #[arg(short, long, env = "STORY2BOARD_OUTPUT")]
    output: Option<PathBuf>,

    /// Pexels API key. Without one every scene gets placeholder images.
    #[arg(long, env = "PEXELS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Duration per scene in seconds (2–10).
    #[arg(short, long, env = "STORY2BOARD_DURATION", default_value_t = 4,
          value_parser = clap::value_parser!(u32).range(2..=10))]
    duration: u32,

    /// Images per scene (1–3).
    #[arg(short, long, env = "STORY2BOARD_IMAGES", default_value_t = 1,
          value_parser = clap::value_parser!(u8).range(1..=3))]
    images_per_scene: u8,

    /// Per-request image search timeout in seconds.
    #[arg(long, env = "STORY2BOARD_TIMEOUT", default_value_t = 10)]
    timeout: u64,

    /// Scenes searched at once (results keep story order).
    #[arg(short, long, env = "STORY2BOARD_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Minimum story length in characters before generating.
    #[arg(long, default_value_t = DEFAULT_MIN_INPUT_CHARS)]
    min_chars: usize,

    /// Title line of the script.
    #[arg(long, default_value = "Video Script")]
    title: String,

    /// Download every scene image into this directory.
    #[arg(long)]
    download_images: Option<PathBuf>,

    /// Output the storyboard as JSON instead of the preview.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "STORY2BOARD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "STORY2BOARD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} Error generating storyboard: {e:#}", red("✘"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar gives all the feedback that matters, so library INFO
    // logs are muted while it is shown.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read input ───────────────────────────────────────────────────────
    let text = read_story(&cli).await?;

    match check_input(&text, cli.min_chars) {
        InputCheck::Empty => {
            anyhow::bail!("No story text given. Pass a file, --text, or pipe text on stdin.")
        }
        InputCheck::TooShort { len, min } => {
            eprintln!(
                "{} Please enter at least {min} characters for better results (got {len}).",
                yellow("⚠")
            );
            return Ok(());
        }
        InputCheck::Ok => {}
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn StoryboardProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    if config.credential.is_none() && !cli.quiet {
        eprintln!("{} No Pexels API key: using placeholder images", dim("ℹ"));
    }

    // ── Generate ─────────────────────────────────────────────────────────
    let board = generate(&text, &config).await;

    if board.is_empty() {
        eprintln!(
            "{} Could not process the text. Please try with longer sentences.",
            yellow("⚠")
        );
        return Ok(());
    }

    // ── Output ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&board).context("Failed to serialise storyboard")?;
        println!("{json}");
    } else if !cli.quiet {
        print_preview(&board).context("Failed to write preview to stdout")?;
    }

    if let Some(ref output_path) = cli.output {
        write_script(&board, output_path, &config)
            .await
            .context("Failed to write script")?;
        if !cli.quiet {
            eprintln!(
                "{} Script: {}  ({} scenes, {}s)",
                green("✔"),
                bold(&output_path.display().to_string()),
                board.stats.total_scenes,
                board.stats.total_duration_secs,
            );
        }
    } else if !cli.quiet && !cli.json {
        eprintln!(
            "{}",
            dim(&format!("Tip: add -o {SCRIPT_FILE_NAME} to save the script"))
        );
    }

    if let Some(ref dir) = cli.download_images {
        let stats = download_images(&board, dir, &config)
            .await
            .context("Failed to download images")?;
        if !cli.quiet {
            eprintln!(
                "{} {} images saved to {}{}",
                green("✔"),
                stats.saved.len(),
                bold(&dir.display().to_string()),
                if stats.failed > 0 {
                    red(&format!("  ({} failed)", stats.failed))
                } else {
                    String::new()
                }
            );
        }
    }

    Ok(())
}

/// Story text from `--text`, the input file, or stdin.
async fn read_story(cli: &Cli) -> Result<String> {
    if let Some(ref text) = cli.text {
        return Ok(text.clone());
    }
    if let Some(ref path) = cli.input {
        return read_text_file(path)
            .await
            .with_context(|| format!("Failed to read story from {}", path.display()));
    }
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read story from stdin")?;
    Ok(text)
}

/// Map CLI args to `StoryboardConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<StoryboardConfig> {
    let mut builder = StoryboardConfig::builder()
        .images_per_scene(cli.images_per_scene as usize)
        .scene_duration_secs(cli.duration)
        .api_timeout_secs(cli.timeout)
        .concurrency(cli.concurrency)
        .script_title(cli.title.clone());

    if let Some(ref key) = cli.api_key {
        builder = builder.credential(key.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Print the scene-by-scene preview to stdout.
fn print_preview(board: &Storyboard) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{}", bold("Storyboard Preview"))?;
    writeln!(out, "{}", "─".repeat(50))?;
    for (i, scene) in board.scenes.iter().enumerate() {
        writeln!(out, "{}", bold(&format!("Scene {}", i + 1)))?;
        writeln!(out, "  Narration: {}", scene.text)?;
        writeln!(out, "  Keywords:  {}", cyan(&scene.keywords))?;
        writeln!(out, "  Duration:  {} seconds", scene.duration)?;
        if scene.images.is_empty() {
            writeln!(out, "  {}", yellow("No images found for this scene"))?;
        }
        for (j, image) in scene.images.iter().enumerate() {
            writeln!(out, "  Image {}:   {}  {}", j + 1, image.url, dim(&image.alt))?;
        }
        writeln!(out, "{}", "─".repeat(50))?;
    }
    writeln!(
        out,
        "{} scenes, {} seconds total",
        board.stats.total_scenes, board.stats.total_duration_secs
    )?;
    Ok(())
}
