use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use tracing::info;

use product_gallery::ui::keybindings::Key;
use product_gallery::ui::{MainView, ScrollState, SharedViewport};
use product_gallery::{GalleryConfig, GalleryFixture, GallerySession};

const USAGE: &str = "usage: product-gallery [--config <file>] [--width <px>] <fixture.toml> [action...]

actions: next | prev | select:<n> | click | fail | key:<Escape|ArrowLeft|ArrowRight> | resize:<px>";

/// Default viewport width for replayed sessions.
const DEFAULT_WIDTH: u32 = 1440;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("product_gallery=info".parse()?),
        )
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = GalleryConfig::load(args.config.as_deref()).context("Failed to load config")?;
    let fixture = GalleryFixture::from_file(&args.fixture)
        .with_context(|| format!("Failed to load fixture {:?}", args.fixture))?;

    let viewport = SharedViewport::new(args.width);
    let scroll = Rc::new(ScrollState::new());
    let mut session = GallerySession::new(
        &config,
        fixture.primary,
        fixture.secondary,
        Rc::new(viewport.clone()),
        scroll.clone(),
    );
    session.connect_active_image_changed(|url| info!(%url, "Active image changed"));
    if fixture.active_image_override.is_some() {
        session.set_active_image_override(fixture.active_image_override);
    }

    for (index, item) in session.collection().iter().enumerate() {
        println!(
            "{index:>2} {:<5} {:<9} {}{}",
            format!("{:?}", item.kind).to_lowercase(),
            item.source,
            item.display_url,
            item.playback_url
                .as_deref()
                .map(|p| format!(" -> {p}"))
                .unwrap_or_default()
        );
    }
    print_state(&session, &scroll);

    for action in &args.actions {
        apply(&mut session, &viewport, action)?;
        println!("> {action}");
        print_state(&session, &scroll);
    }

    Ok(())
}

fn apply(session: &mut GallerySession, viewport: &SharedViewport, action: &str) -> Result<()> {
    let (verb, arg) = action.split_once(':').unwrap_or((action, ""));
    match verb {
        "next" => {
            session.next();
        }
        "prev" => {
            session.previous();
        }
        "select" => {
            let index = arg
                .parse()
                .with_context(|| format!("Invalid index in {action:?}"))?;
            session.select(index);
        }
        "click" => {
            session.click_main_viewer();
        }
        "fail" => {
            session.main_image_failed();
        }
        "key" => {
            session.key_pressed(Key::from_name(arg));
        }
        "resize" => {
            let width = arg
                .parse()
                .with_context(|| format!("Invalid width in {action:?}"))?;
            viewport.resize(width);
        }
        _ => bail!("Unknown action {action:?}\n{USAGE}"),
    }
    Ok(())
}

fn print_state(session: &GallerySession, scroll: &ScrollState) {
    let gallery = session.gallery();
    let main = match gallery.main_view() {
        MainView::Placeholder(src) => format!("placeholder {src}"),
        MainView::Image(src) => format!("image {src}"),
        MainView::Video { player_src, .. } => format!("video {player_src}"),
    };
    let dots: String = gallery
        .dot_strip()
        .iter()
        .map(|d| if d.active { '●' } else { '○' })
        .collect();
    println!("  index {} {dots} main: {main}", gallery.current_index());
    for thumb in gallery.thumbnail_rail().iter().filter(|t| t.active) {
        println!("  rail [{}] {:?} {}", thumb.index, thumb.kind, thumb.src);
    }

    if let Some(frame) = session.overlay().frame() {
        println!(
            "  overlay {}/{} {:?} {} (scroll locked: {})",
            frame.position + 1,
            frame.len,
            frame.kind,
            frame.src,
            scroll.is_suspended()
        );
    }
}

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    width: u32,
    fixture: PathBuf,
    actions: Vec<String>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut config = None;
        let mut width = DEFAULT_WIDTH;
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    config = Some(PathBuf::from(args.next().context("--config needs a path")?));
                }
                "--width" => {
                    width = args
                        .next()
                        .context("--width needs a value")?
                        .parse()
                        .context("--width must be a number of pixels")?;
                }
                "-h" | "--help" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let Some(fixture) = positional.next() else {
            bail!("{USAGE}");
        };

        Ok(Self {
            config,
            width,
            fixture: PathBuf::from(fixture),
            actions: positional.collect(),
        })
    }
}
