//! Map View Widget
//! Central panel display of the rendered choropleth texture. The image is
//! re-rendered only when the (dataset, state, variable) key changes.

use crate::data::Variable;
use egui::RichText;

/// Cache key: dataset revision plus the selection that produced the image.
pub type MapKey = (u64, String, Variable);

pub struct MapView {
    texture: Option<egui::TextureHandle>,
    key: Option<MapKey>,
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

impl MapView {
    pub fn new() -> Self {
        Self {
            texture: None,
            key: None,
        }
    }

    pub fn needs_render(&self, key: &MapKey) -> bool {
        self.key.as_ref() != Some(key)
    }

    /// Drop the cached image, e.g. after a reload.
    pub fn clear(&mut self) {
        self.texture = None;
        self.key = None;
    }

    pub fn set_image(&mut self, ctx: &egui::Context, key: MapKey, image: image::RgbaImage) {
        let size = [image.width() as usize, image.height() as usize];
        let pixels = image.into_raw();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
        self.texture = Some(ctx.load_texture("choropleth", color_image, egui::TextureOptions::LINEAR));
        self.key = Some(key);
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        match &self.texture {
            Some(texture) => {
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Image::new(texture).max_size(ui.available_size()));
                });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0));
                });
            }
        }
    }
}
