use canvas2d::render::backends::cairo::CairoBackend;
use canvas2d::render::ColorStop;
use canvas2d::resize::ResizeNotifier;
use canvas2d::surface::HostBox;
use canvas2d::{Canvas2D, CanvasConfig, Color, FillStyle, FixedDensity, LinearGradient, StrokeStyle, Vector};
use std::fs::File;
use std::io::BufWriter;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "canvas.png".to_string());

    let backend = CairoBackend::new();
    let mut notifier = ResizeNotifier::new();
    let canvas = Canvas2D::new(CanvasConfig::with_layers(1), &backend, Box::new(FixedDensity(1.0)), &mut notifier)?;
    canvas.display().attach(HostBox::new(500.0, 500.0));
    notifier.poll();

    let renderer = canvas.renderer()?;
    renderer.clear(Some(&FillStyle::parse("black")?))?;
    renderer.draw_circle(Vector::new(100.0, 100.0), 30.0, Some(&FillStyle::parse("red")?), None)?;

    let gradient = LinearGradient {
        from: Vector::new(200.0, 200.0),
        to: Vector::new(300.0, 300.0),
        color_stops: vec![ColorStop::new(0.0, Color::parse("green")?), ColorStop::new(1.0, Color::parse("blue")?)],
    };
    renderer.draw_polygon(
        &[Vector::new(200.0, 200.0), Vector::new(300.0, 200.0), Vector::new(250.0, 300.0)],
        Some(&gradient.into()),
        Some(&StrokeStyle::new(2.0, Color::parse("red")?)),
    )?;

    let palette = [Color::parse("#e41a1c")?, Color::parse("#377eb8")?, Color::parse("#4daf4a")?];
    renderer.draw_arcs(&[1.5, 4.0, std::f64::consts::TAU], &palette)?;

    let image = canvas.snapshot(0)?;
    image.write_png(BufWriter::new(File::create(&path)?))?;
    println!("wrote {}x{} image to {}", image.width, image.height, path);

    Ok(())
}
