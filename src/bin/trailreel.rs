use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use trailreel::{
    encode_frames, snake_path_discover, Canvas, DiscoverConfig, FfmpegSink, FfmpegSinkOpts,
    GeoPoint, PhotoCandidate, Rgb8, Route, RouteParams, TrackSample,
};

#[derive(Parser, Debug)]
#[command(name = "trailreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full reveal animation as an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Write a single fully-revealed PNG of the first route's zoom box.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

/// Scene document: pre-parsed track samples and photo metadata plus the
/// canvas inputs and configuration records. GPX and EXIF extraction
/// happen upstream of this file.
#[derive(Debug, serde::Deserialize)]
struct SceneDoc {
    base_map: PathBuf,
    discovery_map: PathBuf,
    top_left: GeoPoint,
    bot_right: GeoPoint,
    #[serde(default)]
    route_params: RouteParams,
    #[serde(default)]
    config: DiscoverConfig,
    routes: Vec<RouteDoc>,
    #[serde(default)]
    outlines: Vec<OutlineDoc>,
}

#[derive(Debug, serde::Deserialize)]
struct RouteDoc {
    track: Vec<TrackSample>,
    #[serde(default)]
    photos: Vec<PhotoDoc>,
}

#[derive(Debug, serde::Deserialize)]
struct PhotoDoc {
    path: PathBuf,
    lat: f64,
    lon: f64,
    taken_at: DateTime<Utc>,
}

#[derive(Debug, serde::Deserialize)]
struct OutlineDoc {
    vertices: Vec<GeoPoint>,
    #[serde(default = "default_outline_color")]
    color: Rgb8,
    #[serde(default = "default_outline_thickness")]
    thickness: i64,
}

fn default_outline_color() -> Rgb8 {
    [255, 0, 0]
}

fn default_outline_thickness() -> i64 {
    1
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<SceneDoc> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let r = BufReader::new(f);
    let scene: SceneDoc = serde_json::from_reader(r).with_context(|| "parse scene JSON")?;
    Ok(scene)
}

fn load_rgb(path: &Path) -> anyhow::Result<image::RgbImage> {
    let img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    Ok(img.to_rgb8())
}

/// Resolve a scene-relative path against the scene file's directory.
fn resolve(scene_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        scene_dir.join(path)
    }
}

fn build_scene(scene: &SceneDoc, scene_dir: &Path) -> anyhow::Result<(Canvas, Vec<Route>)> {
    let base = load_rgb(&resolve(scene_dir, &scene.base_map))?;
    let discovery = load_rgb(&resolve(scene_dir, &scene.discovery_map))?;

    let mut canvas = Canvas::new(base, discovery, scene.top_left, scene.bot_right)?;

    for outline in &scene.outlines {
        canvas.draw_outline(&outline.vertices, outline.thickness, outline.color);
    }

    let mut routes = Vec::with_capacity(scene.routes.len());
    for route_doc in &scene.routes {
        let mut photos = Vec::with_capacity(route_doc.photos.len());
        for p in &route_doc.photos {
            photos.push(PhotoCandidate {
                image: load_rgb(&resolve(scene_dir, &p.path))?,
                position: GeoPoint::new(p.lat, p.lon),
                taken_at: p.taken_at,
            });
        }
        routes.push(Route::build(&canvas, &route_doc.track, photos, &scene.route_params)?);
    }

    Ok((canvas, routes))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = read_scene_json(&args.in_path)?;
    scene.config.validate()?;

    let scene_dir = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let (mut canvas, routes) = build_scene(&scene, scene_dir)?;

    snake_path_discover(&mut canvas, &routes, &scene.config)?;

    let frames = canvas.take_frames();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&args.out));
    encode_frames(&frames, scene.config.fps, &mut sink)?;

    eprintln!("wrote {} ({} frames)", args.out.display(), frames.len());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = read_scene_json(&args.in_path)?;
    scene.config.validate()?;

    let scene_dir = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let (mut canvas, routes) = build_scene(&scene, scene_dir)?;

    let first = routes
        .first()
        .context("scene must contain at least one route")?;
    for route in &routes {
        canvas.reveal_route(route);
    }

    let sub = first.zoom.extract(canvas.base());
    let final_width =
        ((f64::from(scene.config.final_height) * canvas.aspect_ratio()) as u32).max(1);
    let out_img = image::imageops::resize(
        &sub,
        final_width,
        scene.config.final_height,
        image::imageops::FilterType::Triangle,
    );

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    out_img
        .save(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
