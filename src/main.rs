use std::path::PathBuf;

use clap::Parser;

use pagesnip::config::Config;
use pagesnip::overlay::SelectionRect;
use pagesnip::replay::{ReplayOptions, run_replay};
use pagesnip::util;

#[derive(Parser, Debug)]
#[command(name = "pagesnip")]
#[command(version, about = "Region screenshot capture engine for embedded page views")]
struct Cli {
    /// Stored viewport raster to replay against (PNG or JPEG)
    #[arg(long, value_name = "FILE")]
    raster: Option<PathBuf>,

    /// Viewport size in CSS pixels, e.g. 1000x800
    #[arg(long, value_name = "WxH")]
    viewport: Option<String>,

    /// Scroll offset at finalize time, e.g. 0,340
    #[arg(long, value_name = "X,Y", default_value = "0,0")]
    scroll: String,

    /// Device pixel ratio of the raster (0 = unreported, use config fallback)
    #[arg(long, value_name = "RATIO", default_value_t = 0.0)]
    dpr: f64,

    /// Selection rectangle in page coordinates, e.g. 100,50,200x150
    #[arg(long, value_name = "X,Y,WxH")]
    selection: Option<String>,

    /// Output directory for the replayed artifacts
    #[arg(long, value_name = "DIR", default_value = "./captures")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let (Some(raster), Some(viewport), Some(selection)) =
        (&cli.raster, &cli.viewport, &cli.selection)
    else {
        // No replay requested: show usage
        println!("pagesnip: region screenshot capture engine for embedded page views");
        println!();
        println!("The library is embedded by a host application; this binary replays");
        println!("the cropping and annotation stages over a stored viewport raster.");
        println!();
        println!("Usage:");
        println!("  pagesnip --raster page.png --viewport 1000x800 --selection 100,50,200x150");
        println!("  pagesnip --raster page.png --viewport 1000x800 --scroll 0,340 --dpr 2 \\");
        println!("           --selection 100,390,200x150 --out-dir ./captures");
        println!("  pagesnip --help");
        println!();
        println!("The selection is given in page coordinates (scroll offset included),");
        println!("exactly as the overlay reports it.");
        return Ok(());
    };

    let viewport = util::parse_size(viewport)
        .ok_or_else(|| anyhow::anyhow!("invalid --viewport '{viewport}', expected WxH"))?;
    let scroll = util::parse_pair(&cli.scroll)
        .ok_or_else(|| anyhow::anyhow!("invalid --scroll '{}', expected X,Y", cli.scroll))?;
    let (origin_x, origin_y, width, height) = util::parse_rect(selection)
        .ok_or_else(|| anyhow::anyhow!("invalid --selection '{selection}', expected X,Y,WxH"))?;

    let config = Config::load()?;
    let options = ReplayOptions {
        raster_path: raster.clone(),
        viewport,
        scroll,
        device_pixel_ratio: cli.dpr,
        selection: SelectionRect {
            origin_x,
            origin_y,
            width,
            height,
        },
        out_dir: cli.out_dir.clone(),
    };

    let summary = run_replay(&options, &config)?;

    match &summary.primary_path {
        Some(path) => println!("primary:   {}", path.display()),
        None => println!("primary:   (degenerate selection, omitted)"),
    }
    println!("secondary: {}", summary.secondary_path.display());
    println!("scale:     {:.2}", summary.scale_factor);

    Ok(())
}
