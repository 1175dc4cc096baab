use canvas2d::render::backends::recording::RecordingBackend;
use canvas2d::resize::ResizeNotifier;
use canvas2d::surface::HostBox;
use canvas2d::{Canvas2D, CanvasConfig, Color, DrawError, FillStyle, Scale, StrokeStyle, TextAlign, Vector};

fn main() -> Result<(), DrawError> {
    env_logger::init();

    // One layer is all this demo needs. The builder validates the values before
    // anything is created.
    let config = CanvasConfig::builder().layers(1).build()?;

    // The recording backend keeps every drawing call in a command list instead
    // of rasterizing, so the demo runs anywhere.
    let backend = RecordingBackend::new();
    let mut notifier = ResizeNotifier::new();
    let canvas = Canvas2D::new(config, &backend, Box::new(canvas2d::FixedDensity(2.0)), &mut notifier)?;

    // Place the surface into a 500x500 host and let the notifier pick up the change.
    let stage = HostBox::new(500.0, 500.0);
    canvas.display().attach(stage.clone());
    notifier.poll();
    println!("surface is {}x{} device pixels", canvas.display_width(), canvas.display_height());

    let renderer = canvas.renderer()?;
    renderer.clear(Some(&FillStyle::parse("black")?))?;
    renderer.draw_circle(Vector::new(100.0, 100.0), 30.0, Some(&FillStyle::parse("red")?), None)?;
    renderer.draw_polygon(
        &[Vector::new(200.0, 200.0), Vector::new(300.0, 200.0), Vector::new(250.0, 300.0)],
        Some(&FillStyle::parse("green")?),
        Some(&StrokeStyle::new(2.0, Color::parse("red")?)),
    )?;

    // Map a data range onto the surface width.
    let x = Scale::generate((0.0, 10.0), (0.0, renderer.rendering_width()))?;
    let points: Vec<Vector> = (0..=10)
        .map(|i| Vector::new(x.get_target(i as f64), 400.0 + 20.0 * (i as f64).sin()))
        .collect();
    renderer.draw_polyline(&points, &StrokeStyle::new(1.0, Color::WHITE).dashed([4.0, 2.0]))?;
    renderer.draw_text(Vector::new(500.0, 20.0), "hello canvas", Color::WHITE, 24.0, TextAlign::Center)?;

    if let Some(log) = backend.log(0) {
        for command in log.borrow().items.iter() {
            println!("{:?}", command);
        }
    }

    // Resize the host; the next poll resizes the surface. Renderers are sized at
    // creation, so acquire a new one afterwards.
    stage.set_size(250.0, 250.0);
    notifier.poll();
    println!("surface is now {}x{}", canvas.display_width(), canvas.display_height());

    Ok(())
}
