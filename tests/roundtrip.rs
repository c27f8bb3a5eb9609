use qrstyle::{generate, template::apply_template, QrCodeEcc, StyleConfig};

const URL: &str = "https://example.com/qr/abc123";

fn decode_png(png: &[u8]) -> Vec<String> {
    let gray = image::load_from_memory(png).unwrap().to_luma8();
    let (w, h) = gray.dimensions();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
        gray.get_pixel(x as u32, y as u32)[0]
    });
    prepared
        .detect_grids()
        .into_iter()
        .filter_map(|grid| grid.decode().ok().map(|(_, content)| content))
        .collect()
}

#[test]
fn square_modules_decode_back() {
    let style = StyleConfig::default()
        .with_size(370)
        .with_error_correction_level(QrCodeEcc::High);
    let image = generate(URL, &style).unwrap();
    assert_eq!(decode_png(image.png()), vec![URL.to_string()]);
}

#[test]
fn framed_corporate_template_decodes_back() {
    let style = apply_template("corporate").with_size(370);
    let image = generate(URL, &style).unwrap();
    assert_eq!(decode_png(image.png()), vec![URL.to_string()]);
}

#[test]
fn persisted_style_renders_identically() {
    let style = apply_template("vibrant");
    let restored = StyleConfig::from_json(&style.to_json().unwrap()).unwrap();
    assert_eq!(restored, style);
    assert_eq!(
        generate("persist", &style).unwrap().png(),
        generate("persist", &restored).unwrap().png()
    );
}
