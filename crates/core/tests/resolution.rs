use std::{
    future::Future,
    io,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use facepack_core::{
    AssetEmitter, DirEmitter, Error, FontFamilyManifest, FontFormat, FontLoader, FsReader,
    LoaderOptions, MemoryEmitter, QueryOptions, ResolutionPass, SourceReader, VariantQuery,
    convert,
};
use facepack_font_eot::is_eot;
use facepack_font_svg::svg_to_ttf;
use facepack_font_woff::is_woff;
use facepack_font_woff2::is_woff2;
use tempfile::TempDir;

const SVG_FONT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <font horiz-adv-x="600">
    <font-face font-family="Fixture" units-per-em="1000" ascent="800" descent="-200"/>
    <missing-glyph d="M50 0L550 0L550 700L50 700Z"/>
    <glyph unicode="A" d="M0 0L300 700L600 0Z"/>
    <glyph unicode="B" d="M0 0L0 700L400 700C600 700 600 350 400 350C600 350 600 0 400 0Z"/>
  </font>
</svg>"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ttf() -> Vec<u8> {
    svg_to_ttf(SVG_FONT.as_bytes()).expect("fixture font")
}

/// A temp directory holding the fixture under each of `names`.
fn sources(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        let data = if name.ends_with(".svg") { SVG_FONT.as_bytes().to_vec() } else { ttf() };
        std::fs::write(dir.path().join(name), data).unwrap();
    }
    dir
}

fn manifest(dir: &TempDir, json: &str) -> FontFamilyManifest {
    FontFamilyManifest::from_json(json, dir.path()).unwrap()
}

#[derive(Default)]
struct CountingReader {
    reads: AtomicUsize,
}

impl SourceReader for CountingReader {
    fn read(&self, path: &Path) -> impl Future<Output = io::Result<Vec<u8>>> + Send {
        self.reads.fetch_add(1, Ordering::SeqCst);
        FsReader.read(path)
    }
}

fn pass(
    manifest: FontFamilyManifest,
    query: VariantQuery,
) -> (ResolutionPass<FsReader>, Arc<MemoryEmitter>) {
    let emitter = Arc::new(MemoryEmitter::new());
    let pass = ResolutionPass::new(
        manifest,
        query,
        Arc::new(FsReader),
        Arc::clone(&emitter) as Arc<dyn AssetEmitter>,
    );
    (pass, emitter)
}

#[tokio::test]
async fn test_truetype_to_web_formats() {
    init_logging();
    let dir = sources(&["fixture.ttf"]);
    let manifest = manifest(
        &dir,
        r#"{"name": "Fixture", "files": [{"file": "fixture.ttf", "weight": 400, "style": "normal"}]}"#,
    );
    let (pass, emitter) = pass(
        manifest,
        VariantQuery::default().with_format([FontFormat::Woff, FontFormat::Woff2]),
    );

    let faces = pass.run().await.unwrap();
    assert_eq!(faces.len(), 1);
    let face = &faces[0];
    assert_eq!(face.weight, 400);
    assert_eq!((face.style.as_str(), face.stretch.as_str()), ("normal", "normal"));
    assert_eq!(face.files.len(), 2);
    assert!(is_woff(&face.files[0].data));
    assert!(is_woff2(&face.files[1].data));

    assert_eq!(emitter.len(), 2);
    for file in &face.files {
        assert_eq!(emitter.get(&file.file).as_deref(), Some(&*file.data));
    }
}

#[tokio::test]
async fn test_inferred_domains_pass_through() {
    init_logging();
    let dir = sources(&["regular.ttf", "bold.ttf"]);
    let manifest = manifest(
        &dir,
        r#"{"name": "Fixture", "files": [
            {"file": "regular.ttf", "weight": 400},
            {"file": "bold.ttf", "weight": 700}
        ]}"#,
    );
    let (pass, _) = pass(manifest, VariantQuery::default());

    let faces = pass.run().await.unwrap();
    assert_eq!(faces.iter().map(|f| f.weight).collect::<Vec<_>>(), vec![400, 700]);
    for face in &faces {
        assert_eq!(face.style, "regular");
        assert_eq!(face.files.len(), 1);
        assert_eq!(face.files[0].format(), FontFormat::Truetype);
        assert_eq!(&*face.files[0].data, ttf().as_slice());
    }
}

#[tokio::test]
async fn test_missing_weight_yields_no_faces() {
    init_logging();
    let dir = sources(&["regular.ttf"]);
    let manifest = manifest(
        &dir,
        r#"{"name": "Fixture", "files": [{"file": "regular.ttf", "weight": 400}]}"#,
    );
    let (pass, emitter) = pass(manifest, VariantQuery::default().with_weight([300]));

    assert!(pass.run().await.unwrap().is_empty());
    assert!(emitter.is_empty());
}

#[tokio::test]
async fn test_svg_to_embedded_opentype_is_unsupported() {
    init_logging();
    let dir = sources(&["fixture.svg"]);
    let manifest = manifest(&dir, r#"{"name": "Fixture", "files": [{"file": "fixture.svg"}]}"#);
    let (pass, emitter) = pass(
        manifest,
        VariantQuery::default().with_format([FontFormat::EmbeddedOpentype]),
    );

    let err = pass.run().await.unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedConversion {
            from: Some(FontFormat::Svg),
            to: FontFormat::EmbeddedOpentype,
        }
    ));
    assert!(emitter.is_empty());
}

#[tokio::test]
async fn test_partial_coverage_keeps_matched_faces() {
    init_logging();
    let dir = sources(&["regular.ttf", "italic.ttf"]);
    let manifest = manifest(
        &dir,
        r#"{"name": "Fixture", "files": [
            {"file": "regular.ttf", "weight": 400},
            {"file": "italic.ttf", "weight": 700, "style": "italic"}
        ]}"#,
    );
    let (pass, _) = pass(manifest, VariantQuery::default().with_format([FontFormat::Woff2]));

    // 2 weights × 2 styles, but only two of the four triples exist.
    let faces = pass.run().await.unwrap();
    let triples: Vec<_> = faces.iter().map(|f| (f.weight, f.style.clone())).collect();
    assert_eq!(triples, vec![(400, "regular".to_string()), (700, "italic".to_string())]);
}

#[tokio::test]
async fn test_shared_source_is_read_once() {
    init_logging();
    let dir = sources(&["fixture.ttf"]);
    let manifest = manifest(&dir, r#"{"name": "Fixture", "files": [{"file": "fixture.ttf"}]}"#);
    let reader = Arc::new(CountingReader::default());
    let pass = ResolutionPass::new(
        manifest,
        VariantQuery::default()
            .with_format([
                FontFormat::Truetype,
                FontFormat::Opentype,
                FontFormat::Woff,
                FontFormat::Woff2,
                FontFormat::EmbeddedOpentype,
            ])
            .with_stretch(["normal", "condensed"]),
        Arc::clone(&reader),
        Arc::new(MemoryEmitter::new()),
    );

    let faces = pass.run().await.unwrap();
    assert_eq!(faces.len(), 1);
    assert_eq!(faces[0].files.len(), 5);
    assert_eq!(reader.reads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_graph_edges_produce_recognizable_output() {
    let ttf = ttf();
    let path = Path::new("fixture");
    let svg =
        convert(path, Some(FontFormat::Svg), FontFormat::Truetype, SVG_FONT.as_bytes()).unwrap();
    assert_eq!(&svg[..4], &[0, 1, 0, 0]);

    for from in [FontFormat::Truetype, FontFormat::Opentype] {
        let woff = convert(path, Some(from), FontFormat::Woff, &ttf).unwrap();
        assert!(is_woff(&woff));
        let woff2 = convert(path, Some(from), FontFormat::Woff2, &ttf).unwrap();
        assert!(is_woff2(&woff2));
        let eot = convert(path, Some(from), FontFormat::EmbeddedOpentype, &ttf).unwrap();
        assert!(is_eot(&eot));
    }

    for (from, to) in [
        (FontFormat::Svg, FontFormat::Woff2),
        (FontFormat::Woff, FontFormat::Truetype),
        (FontFormat::EmbeddedOpentype, FontFormat::Woff),
    ] {
        let err = convert(path, Some(from), to, &ttf).unwrap_err();
        assert!(matches!(err, Error::UnsupportedConversion { .. }), "{from} -> {to}");
    }
}

#[tokio::test]
async fn test_loader_renders_stylesheet_and_writes_assets() {
    init_logging();
    let dir = sources(&["fixture.ttf"]);
    let out = tempfile::tempdir().unwrap();
    let loader = FontLoader::new(Arc::new(FsReader), Arc::new(DirEmitter::new(out.path())));

    let mut resource_query = QueryOptions::new();
    resource_query.insert("format", vec!["woff2", "embedded-opentype"]);
    resource_query.insert("weight", "500");
    let options = LoaderOptions {
        query: QueryOptions::parse("basePath=/fonts/").unwrap(),
        resource_query,
        root_context: dir.path().to_path_buf(),
        public_path: None,
    };
    let manifest_path = dir.path().join("fixture.font.json");
    let output = loader
        .process(
            &manifest_path,
            r#"{"name": "Fixture Sans", "files": [{"file": "fixture.ttf"}]}"#,
            &options,
        )
        .await
        .unwrap();

    assert_eq!(output.dependencies, vec![dir.path().join("fixture.ttf")]);
    assert_eq!(output.faces.len(), 1);
    let [woff2, eot] = &output.faces[0].files[..] else {
        panic!("expected two files");
    };
    assert!(woff2.file.starts_with("fixture-sans-regular-500-normal."));
    assert!(out.path().join(&woff2.file).exists());
    assert!(out.path().join(&eot.file).exists());

    let css = &output.content;
    assert!(css.contains("font-family: \"Fixture Sans\";"));
    assert!(css.contains(&format!("src: url(\"/fonts/{}\");", eot.file)));
    assert!(css.contains(&format!("url(\"/fonts/{}\") format(\"woff2\")", woff2.file)));
    assert!(css.contains("font-weight: 500;"));
}

#[tokio::test]
async fn test_loader_passes_stylesheets_through() {
    let loader = FontLoader::new(Arc::new(FsReader), Arc::new(MemoryEmitter::new()));
    let output = loader
        .process(Path::new("app.scss"), "body { color: red; }", &LoaderOptions::default())
        .await
        .unwrap();
    assert_eq!(output.content, "body { color: red; }");
    assert!(output.faces.is_empty());
}

#[tokio::test]
async fn test_invalid_weight_query_fails() {
    let dir = sources(&[]);
    let loader = FontLoader::new(Arc::new(FsReader), Arc::new(MemoryEmitter::new()));
    let options = LoaderOptions {
        resource_query: QueryOptions::parse("weight=bold").unwrap(),
        ..Default::default()
    };
    let err = loader
        .process(&dir.path().join("f.json"), r#"{"name": "X", "files": []}"#, &options)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidQuery { ref key, .. } if key == "weight"));
}
