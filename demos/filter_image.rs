// demos/filter_image.rs — Sharpen + Laplacian edge detection on one image.
//
// Runs the two-stage chain a classic edge detector uses:
//
//   image ──► sharpening (threshold 255) ──► Laplacian (threshold 200)
//
// then draws a connector for every Laplacian detection, from its padded
// position to its unpadded position, on top of the original image.
//
// Output: minifb window with two panels, or PNG files with --output.
//
//   ┌───────────────────────────┬───────────────────────────┐
//   │ original + connectors     │ Laplacian response        │
//   └───────────────────────────┴───────────────────────────┘
//
// MODES
// ─────
//   cargo run --example filter_image
//       Synthetic scene (bright shapes on a gradient).
//
//   cargo run --example filter_image -- photo.png
//       Any format the `image` crate decodes.
//
//   cargo run --example filter_image -- photo.png --output out/
//       Headless: writes out/annotated.png and out/laplacian.png.
//
// RUST_LOG=debug shows per-stage geometry and detection counts.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;
use minifb::{Key, Window, WindowOptions};

use edgeconv::chain::{FilterChain, FilterStage};
use edgeconv::convert::f32_to_u8;
use edgeconv::image::{Image, Rgb};
use edgeconv::kernel::Kernel;
use edgeconv::rescale::RescaleMode;
use edgeconv::Detection;

/// Connector colour (blue).
const CONNECTOR: Rgb = [0, 0, 255];
/// Connector half-width in pixels.
const CONNECTOR_RADIUS: isize = 1;

#[derive(Parser)]
#[command(author, version, about = "Sharpen + Laplacian edge detection", long_about = None)]
struct Cli {
    /// Input image. A synthetic scene is used when omitted.
    input: Option<PathBuf>,

    /// Write PNGs to this directory instead of opening a window.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Threshold of the sharpening stage.
    #[arg(long, default_value = "255")]
    sharpen_threshold: f32,

    /// Threshold of the Laplacian stage.
    #[arg(long, default_value = "200")]
    laplacian_threshold: f32,

    /// Min-max stretch the Laplacian output instead of clipping to [0, 255].
    #[arg(long)]
    adaptive: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let img = match &cli.input {
        Some(path) => load_rgb(path)?,
        None => make_scene(320, 240),
    };
    info!("input {}×{}", img.width(), img.height());

    let sharpening = Kernel::from_array([
        [-2.0, -2.0, -2.0],
        [-2.0, 29.0, -2.0],
        [-2.0, -2.0, -2.0],
    ])?;
    let laplacian = Kernel::from_array([
        [0.0, 1.0, 0.0],
        [1.0, -4.0, 1.0],
        [0.0, 1.0, 0.0],
    ])?;

    let mut laplacian_stage = FilterStage::new(laplacian, cli.laplacian_threshold);
    if cli.adaptive {
        laplacian_stage = laplacian_stage.with_rescale(RescaleMode::Adaptive);
    }
    let chain = FilterChain::new(vec![
        FilterStage::new(sharpening, cli.sharpen_threshold),
        laplacian_stage,
    ])?;

    let result = chain.run(&img)?;
    info!(
        "detections per stage: sharpen {}, laplacian {}",
        result.stage_counts[0], result.stage_counts[1]
    );

    let mut annotated = img.clone();
    for d in &result.detections {
        draw_connector(&mut annotated, d);
    }
    let filtered = f32_to_u8(&result.output);

    match &cli.output {
        Some(dir) => save_pngs(dir, &annotated, &filtered)?,
        None => show_window(&annotated, &filtered)?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Image I/O
// ---------------------------------------------------------------------------

/// Decode any format supported by the `image` crate into interleaved RGB.
fn load_rgb(path: &Path) -> Result<Image<Rgb>, Box<dyn Error>> {
    let rgb = image::open(path)?.to_rgb8();
    let (w, h) = rgb.dimensions();
    let pixels: Vec<Rgb> = rgb
        .into_raw()
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    Ok(Image::from_vec(w as usize, h as usize, pixels))
}

fn save_pngs(dir: &Path, annotated: &Image<Rgb>, filtered: &Image<u8>) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;

    let (w, h) = (annotated.width() as u32, annotated.height() as u32);
    let raw: Vec<u8> = annotated.as_slice().iter().flatten().copied().collect();
    image::RgbImage::from_raw(w, h, raw)
        .ok_or("annotated buffer size mismatch")?
        .save(dir.join("annotated.png"))?;

    image::GrayImage::from_raw(w, h, filtered.as_slice().to_vec())
        .ok_or("filtered buffer size mismatch")?
        .save(dir.join("laplacian.png"))?;

    info!("wrote {}", dir.display());
    Ok(())
}

/// Bright rectangles and a disc on a horizontal gradient.
fn make_scene(w: usize, h: usize) -> Image<Rgb> {
    let mut img = Image::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let v = (20 + x * 60 / w) as u8;
            img.set(x, y, [v, v, v]);
        }
    }
    for &(rx, ry, rw, rh, c) in &[
        (30, 30, 80, 60, [200u8, 60, 60]),
        (170, 50, 100, 40, [60, 200, 60]),
        (60, 150, 50, 70, [220, 220, 220]),
    ] {
        for y in ry..(ry + rh).min(h) {
            for x in rx..(rx + rw).min(w) {
                img.set(x, y, c);
            }
        }
    }
    let (cx, cy, r) = (220.0f32, 170.0f32, 35.0f32);
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r * r {
                img.set(x, y, [90, 90, 230]);
            }
        }
    }
    img
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Thick line from the padded to the unpadded position (Bresenham).
fn draw_connector(img: &mut Image<Rgb>, d: &Detection) {
    let ((x0, y0), (x1, y1)) = d.connector();
    let (mut x, mut y) = (x0 as isize, y0 as isize);
    let (x1, y1) = (x1 as isize, y1 as isize);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        stamp(img, x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Paint a square brush, clipped to the image.
fn stamp(img: &mut Image<Rgb>, cx: isize, cy: isize) {
    let (w, h) = (img.width() as isize, img.height() as isize);
    for y in (cy - CONNECTOR_RADIUS)..=(cy + CONNECTOR_RADIUS) {
        for x in (cx - CONNECTOR_RADIUS)..=(cx + CONNECTOR_RADIUS) {
            if x >= 0 && y >= 0 && x < w && y < h {
                img.set(x as usize, y as usize, CONNECTOR);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Framebuffer rendering (minifb, ARGB u32)
// ---------------------------------------------------------------------------

fn show_window(annotated: &Image<Rgb>, filtered: &Image<u8>) -> Result<(), Box<dyn Error>> {
    let (w, h) = (annotated.width(), annotated.height());
    let gap = 4usize;
    let win_w = 2 * w + gap;
    let mut fb = vec![0xFF1A_1A2Eu32; win_w * h];

    for y in 0..h {
        for x in 0..w {
            let [r, g, b] = annotated.get(x, y);
            fb[y * win_w + x] = argb(r, g, b);
            let v = filtered.get(x, y);
            fb[y * win_w + w + gap + x] = argb(v, v, v);
        }
    }

    let mut window = Window::new(
        "edgeconv — original + connectors | Laplacian",
        win_w,
        h,
        WindowOptions::default(),
    )?;
    window.set_target_fps(60);

    eprintln!("[filter_image] window open — press Escape or close to exit");
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&fb, win_w, h)?;
    }
    Ok(())
}

#[inline]
fn argb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}
