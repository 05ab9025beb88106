//! Text, shapes, scoped transforms and image paint on one canvas
//!
//! Run with:
//! `cargo run -p waah_canvas --example example1 -- <image> <font> [out.png]`

use std::sync::Arc;

use anyhow::Context;
use waah_canvas::{Canvas, FontFace, FontStyle, Image};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waah_canvas=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let image_path = args.next().context("usage: example1 <image> <font> [out.png]")?;
    let font_path = args.next().context("usage: example1 <image> <font> [out.png]")?;
    let out = args.next().unwrap_or_else(|| "example1.png".to_string());

    let img = Arc::new(Image::load(&image_path)?);
    let font = Arc::new(FontFace::load(&font_path)?);

    let mut c = Canvas::new(800, 800)?;

    c.color(0, 0, 0);
    c.text(10.0, 10.0, "Rust rules");
    c.fill()?;

    c.font_family("Serif", FontStyle::NORMAL.bold());
    c.text(10.0, 20.0, "Rust rules");
    c.fill()?;

    c.font_family("Sans Serif", FontStyle::NORMAL.italic());
    c.text(10.0, 30.0, "Rust rules");
    c.fill()?;

    // Everything in the closure is rotated, then the transform is restored
    c.with_rotate(0.5, |c| {
        c.rect(20.0, 20.0, 600.0, 600.0);
        c.color(0xff, 0, 0);
        c.stroke()
    })?;

    c.with_translate(150.0, 10.0, |c| {
        c.circle(150.0, 150.0, 100.0);
        c.image(&img, 0.0, 0.0);
        c.fill()
    })?;

    c.image(&img, 0.0, 0.0);
    c.font(font).font_size(50.0);
    c.text(5.0, 260.0, "The sky is");
    c.fill()?;

    c.text(5.0, 300.0, "the limit");
    c.fill()?;

    c.snapshot()?.to_png(&out)?;
    tracing::info!("Wrote {}", out);
    Ok(())
}
