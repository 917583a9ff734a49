use super::*;
use crate::test_fixtures::png_data_url;

fn def(id: &str, source: String) -> TextureDef {
    TextureDef {
        id: id.to_string(),
        source,
    }
}

#[test]
fn data_urls_decode_and_reencode_deterministically() {
    let defs = vec![def("skin", png_data_url([1, 2, 3, 255]))];
    let a = TextureStore::prepare(&defs, Path::new(".")).unwrap();
    let b = TextureStore::prepare(&defs, Path::new(".")).unwrap();
    let ta = a.get("skin").unwrap();
    assert_eq!((ta.width, ta.height), (2, 2));
    assert_eq!(ta, b.get("skin").unwrap());
    assert!(ta.png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn identical_content_shares_identity() {
    let defs = vec![
        def("a", png_data_url([9, 9, 9, 255])),
        def("b", png_data_url([9, 9, 9, 255])),
        def("c", png_data_url([0, 9, 9, 255])),
    ];
    let store = TextureStore::prepare(&defs, Path::new(".")).unwrap();
    assert_eq!(store.distinct_len(), 2);
    assert_eq!(
        store.get("a").unwrap().content_hash,
        store.get("b").unwrap().content_hash
    );
    assert_eq!(store.resolve("b").unwrap().id, "a");
    assert_eq!(store.get("b").unwrap().id, "b");
    assert_eq!(store.resolve("c").unwrap().id, "c");
    assert!(store.resolve("missing").is_none());
}

#[test]
fn same_pixels_in_another_shape_stay_distinct() {
    use base64::Engine as _;

    let wide = |w: u32, h: u32| {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([5, 5, 5, 255]));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(buf)
        )
    };
    let defs = vec![def("square", wide(2, 2)), def("strip", wide(4, 1))];
    let store = TextureStore::prepare(&defs, Path::new(".")).unwrap();
    assert_eq!(store.distinct_len(), 2);
    assert_eq!(store.resolve("strip").unwrap().id, "strip");
    assert_eq!(
        (store.get("strip").unwrap().width, store.get("strip").unwrap().height),
        (4, 1)
    );
}

#[test]
fn relative_paths_resolve_against_base_dir() {
    let tmp = std::env::temp_dir().join(format!(
        "cmdent_textures_test_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(tmp.join("tex")).unwrap();

    let img = image::RgbaImage::from_raw(1, 1, vec![1u8, 2u8, 3u8, 255u8]).unwrap();
    img.save_with_format(tmp.join("tex/skin.png"), image::ImageFormat::Png)
        .unwrap();

    let store =
        TextureStore::prepare(&[def("skin", "tex\\skin.png".to_string())], &tmp).unwrap();
    assert_eq!(store.get("skin").unwrap().width, 1);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn bad_sources_are_asset_errors_naming_the_texture() {
    let err = TextureStore::prepare(
        &[def("skin", "data:image/png;base64,!!!".to_string())],
        Path::new("."),
    )
    .unwrap_err()
    .to_string();
    assert!(err.contains("asset error"));
    assert!(err.contains("skin"));

    assert!(
        TextureStore::prepare(
            &[def("x", "data:image/jpeg;base64,AAAA".to_string())],
            Path::new(".")
        )
        .is_err()
    );
    assert!(TextureStore::prepare(&[def("x", "../escape.png".to_string())], Path::new(".")).is_err());
    assert!(
        TextureStore::prepare(
            &[def("x", "definitely-missing-file.png".to_string())],
            Path::new(".")
        )
        .is_err()
    );
}
