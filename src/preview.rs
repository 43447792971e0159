use eframe::egui::ColorImage;

use crate::converter::Asset;

/// Module for decoding the bundled artwork shown next to a selected video.
pub fn placeholder_art() -> Option<ColorImage> {
    // Pull the placeholder tile out of the embedded assets
    let art = Asset::get("film.png")?;
    // Load image data into an image::DynamicImage and convert to RGBA8
    let img = image::load_from_memory(&art.data).ok()?.to_rgba8();
    // Determine the image dimensions for egui
    let size = [img.width() as usize, img.height() as usize];
    // Create a ColorImage from the raw RGBA bytes without premultiplying alpha
    Some(ColorImage::from_rgba_unmultiplied(size, &img))
}

#[cfg(test)]
mod tests {
    use super::placeholder_art;

    #[test]
    fn bundled_artwork_decodes() {
        let img = placeholder_art().expect("bundled artwork should decode");
        assert_eq!(img.size, [160, 90]);
    }
}
