//! End-to-end: spec, render, export.

use iconmaker::{
    EncodeError, ExportFormat, GenerationError, GlyphKind, IconGenerator, IconRenderer, IconSpec,
    PREVIEW_SIZES, ProceduralGenerator, RasterImage, RenderOptions, export, file_name,
    generate_with_fallback, read_ico_header,
};

fn spec(description: &str, size: u32) -> IconSpec {
    IconSpec::from_hex(description, "#6366f1", "#ffffff", size).unwrap()
}

struct RateLimitedRemote;

impl IconGenerator for RateLimitedRemote {
    async fn generate(&self, _spec: &IconSpec) -> Result<RasterImage, GenerationError> {
        Err(iconmaker::classify_status(429, "Rate limit exceeded."))
    }
}

/// Mirrors the CLI: export fully, then write.
async fn generate_and_write(
    remote: Option<&RateLimitedRemote>,
    spec: &IconSpec,
    dir: &std::path::Path,
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let generated = generate_with_fallback(remote, &ProceduralGenerator::default(), spec).await?;
    let out = export(&generated.image, spec.size, "star", ExportFormat::Ico)?;
    let path = dir.join(out.file_name);
    std::fs::write(&path, out.bytes)?;
    Ok(path)
}

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("iconmaker-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn render_then_export_ico_32() {
    let spec = spec("a star", 32);
    let raster = IconRenderer::new().render(&spec);
    let out = export(&raster, spec.size, "Star", ExportFormat::Ico).unwrap();

    assert_eq!(out.file_name, "Star_32x32.ico");
    assert_eq!(out.mime_type, "image/x-icon");
    assert_eq!(out.bytes.len(), 4286);
    assert_eq!(&out.bytes[..6], &[0, 0, 1, 0, 1, 0]);
    assert_eq!((out.bytes[6], out.bytes[7]), (32, 32));
}

#[test]
fn export_256_ico_header() {
    let spec = spec("home", 256);
    let raster = IconRenderer::new().render(&spec);
    let out = export(&raster, 256, "", ExportFormat::Ico).unwrap();
    let header = read_ico_header(&out.bytes).unwrap();

    assert_eq!(out.file_name, "icon_256x256.ico");
    assert_eq!((header.entry.width, header.entry.height), (0, 0));
    assert_eq!((header.bitmap.width, header.bitmap.height), (256, 512));
}

#[test]
fn ico_pixels_start_with_bottom_row() {
    // Flat background, no glyph or shadow in the bottom-left corner.
    let mut renderer = IconRenderer::new();
    renderer.pipeline.glyph.set_enabled(false);
    let raster = renderer.render(&spec("anything", 16)).resized(16);
    let out = export(&raster, 16, "flat", ExportFormat::Ico).unwrap();

    let bottom_left = raster.pixel(0, 15);
    let first = &out.bytes[62..66];
    assert_eq!(
        first,
        &[bottom_left[2], bottom_left[1], bottom_left[0], bottom_left[3]]
    );
}

#[test]
fn png_export_round_trips_through_decoder() {
    let raster = IconRenderer::new().render(&spec("camera", 128));
    let out = export(&raster, 128, "cam", ExportFormat::Png).unwrap();
    let decoded = RasterImage::decode(&out.bytes, 128).unwrap();
    assert_eq!(decoded, raster.resized(128));
}

#[test]
fn renders_are_deterministic_per_options() {
    let spec = spec("heart", 64);
    let options = RenderOptions::default().with_grain(12);
    let a = IconRenderer::with_options(&options).render(&spec);
    let b = IconRenderer::with_options(&options).render(&spec);
    assert_eq!(a, b);
}

#[test]
fn nonsense_description_still_renders() {
    let (raster, glyph) = IconRenderer::new().render_with_glyph(&spec("xyz nonsense", 64));
    assert_eq!(glyph, GlyphKind::Geometric);
    assert!(export(&raster, 64, "x", ExportFormat::Png).is_ok());
}

#[test]
fn previews_cover_all_sizes() {
    let raster = IconRenderer::new().render(&spec("music", 256));
    let sizes: Vec<u32> = raster.previews().iter().map(|p| p.size()).collect();
    assert_eq!(sizes, PREVIEW_SIZES);
}

#[test]
fn blank_names_fall_back_to_icon() {
    assert_eq!(file_name("\t", 48, ExportFormat::Png), "icon_48x48.png");
}

#[test]
fn encode_errors_surface() {
    let raster = RasterImage::filled(16, [0, 0, 0, 255]).unwrap();
    assert!(matches!(
        export(&raster, 0, "x", ExportFormat::Ico),
        Err(EncodeError::EmptyImage)
    ));
}

#[tokio::test]
async fn rate_limit_writes_no_file() {
    let dir = scratch_dir("ratelimit");
    let spec = spec("star", 32);

    let err = generate_and_write(Some(&RateLimitedRemote), &spec, &dir)
        .await
        .unwrap_err();
    let err = err.downcast::<GenerationError>().unwrap();
    assert!(matches!(*err, GenerationError::RateLimited(_)));
    assert!(!dir.join("star_32x32.ico").exists());

    // Without a remote the procedural path writes the file.
    let path = generate_and_write(None, &spec, &dir).await.unwrap();
    assert!(path.ends_with("star_32x32.ico"));
    assert_eq!(std::fs::read(&path).unwrap().len(), 4286);

    std::fs::remove_dir_all(&dir).unwrap();
}
