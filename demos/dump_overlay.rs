use keytrack::cache::{DetectionsCache, FsLoader};
use keytrack::render::{DisplaySize, OverlayOptions, Renderer, Shape};
use keytrack::scene::Scene;
use keytrack::OverlayConfig;

fn main() -> Result<(), keytrack::Error> {
    tracing_subscriber::fmt()
        .with_env_filter("keytrack=debug")
        .init();

    let mut args = std::env::args();

    let _ = args.next();
    let root = args.next().unwrap_or_else(|| ".".to_string());
    let src = args.next().unwrap_or_else(|| "/videos/sample.mp4".to_string());
    let config = match args.next() {
        Some(path) => OverlayConfig::load(path)?,
        None => OverlayConfig::default(),
    };

    let mut cache = DetectionsCache::new(FsLoader::new(root));
    let detections = cache.load(&src)?;

    let options = OverlayOptions {
        show_ids: true,
        show_confidence: true,
        ..Default::default()
    };
    let renderer = Renderer::new(&config, options);
    let display = DisplaySize::new(
        detections.info().width as f32 / 2.0,
        detections.info().height as f32 / 2.0,
    );

    let mut scene = Scene::new(detections.clone(), &config)?;
    let last = detections.last_frame().unwrap_or(0);

    for frame_number in 0..=last {
        let frame = match scene.frame_data(frame_number as i64) {
            Some(frame) => frame,
            None => continue,
        };

        for shape in renderer.render(&frame, &detections, display) {
            if let Shape::Rect { bbox, track_id } = shape {
                println!(
                    "{} {} {} {:.1} {:.1} {:.1} {:.1}",
                    frame_number,
                    if frame.is_keyframe { "K" } else { "i" },
                    track_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                    bbox.left(),
                    bbox.top(),
                    bbox.width(),
                    bbox.height(),
                );
            }
        }
    }

    for rejected in detections.rejected() {
        eprintln!("skipped frame {} ({:?}): {}", rejected.frame, rejected.index, rejected.reason);
    }

    Ok(())
}
