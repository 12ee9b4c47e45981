//! Image manifest and preload bookkeeping
//!
//! Preloading never fails as a whole: an image that does not load is
//! replaced by a 100x100 pink placeholder and the game goes on.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::render::{ImageHandle, ImageKey, ImageSource};

/// Edge length of the placeholder square
pub const PLACEHOLDER_SIZE: f32 = 100.0;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load image {key:?} from '{path}'")]
    LoadFailed { key: ImageKey, path: String },

    #[error("image {key:?} loaded with zero size")]
    Empty { key: ImageKey },
}

/// Path of each image relative to the page
pub fn image_path(key: ImageKey) -> &'static str {
    match key {
        ImageKey::Background => "img/Nueva galaxia.png",
        ImageKey::Ship => "img/Nave espacial.png",
        ImageKey::Choripan => "img/Choripan.png",
        ImageKey::Vino => "img/Vino.png",
        ImageKey::Antofagasta => "img/Antofagasta.png",
        ImageKey::Ticket => "img/Ticket.png",
        ImageKey::Pokemon => "img/pokemon.png",
        ImageKey::Earth => "img/Planeta Tierra 2.png",
        ImageKey::Missile => "img/Misil.png",
        ImageKey::Enemy => "img/Diente malvado.png",
        ImageKey::Odin => "img/Odin.png",
    }
}

/// Outcome of a preload pass
#[derive(Debug, Default)]
pub struct PreloadReport {
    pub loaded: Vec<ImageKey>,
    pub substituted: Vec<(ImageKey, AssetError)>,
}

impl PreloadReport {
    pub fn is_clean(&self) -> bool {
        self.substituted.is_empty()
    }
}

/// Images known to be drawable, by key
#[derive(Debug, Default)]
pub struct ImageCatalog {
    images: BTreeMap<ImageKey, ImageHandle>,
    ready: bool,
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of loading one image, substituting a placeholder on error
    pub fn record(
        &mut self,
        key: ImageKey,
        result: Result<(f32, f32), AssetError>,
        report: &mut PreloadReport,
    ) {
        let result = result.and_then(|(w, h)| {
            if w > 0.0 && h > 0.0 {
                Ok((w, h))
            } else {
                Err(AssetError::Empty { key })
            }
        });
        match result {
            Ok((width, height)) => {
                self.images.insert(
                    key,
                    ImageHandle {
                        key,
                        width,
                        height,
                        placeholder: false,
                    },
                );
                report.loaded.push(key);
            }
            Err(err) => {
                log::warn!("{err}; using placeholder");
                self.images.insert(
                    key,
                    ImageHandle {
                        key,
                        width: PLACEHOLDER_SIZE,
                        height: PLACEHOLDER_SIZE,
                        placeholder: true,
                    },
                );
                report.substituted.push((key, err));
            }
        }
    }

    /// Mark the preload finished; lookups start answering after this
    pub fn finish(&mut self) {
        self.ready = true;
    }
}

impl ImageSource for ImageCatalog {
    fn image(&self, key: ImageKey) -> Option<ImageHandle> {
        if !self.ready {
            return None;
        }
        self.images.get(&key).copied()
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserImages, preload};

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::collections::BTreeMap;

    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlImageElement;

    use super::{AssetError, ImageCatalog, PreloadReport, image_path};
    use crate::render::{ImageHandle, ImageKey, ImageSource};

    /// Loaded `<img>` elements plus their catalog entries
    #[derive(Default)]
    pub struct BrowserImages {
        pub catalog: ImageCatalog,
        elements: BTreeMap<ImageKey, HtmlImageElement>,
    }

    impl BrowserImages {
        pub fn element(&self, key: ImageKey) -> Option<&HtmlImageElement> {
            self.elements.get(&key)
        }
    }

    impl ImageSource for BrowserImages {
        fn image(&self, key: ImageKey) -> Option<ImageHandle> {
            self.catalog.image(key)
        }
    }

    fn load_promise(img: &HtmlImageElement) -> js_sys::Promise {
        js_sys::Promise::new(&mut |resolve, reject| {
            img.set_onload(Some(&resolve));
            img.set_onerror(Some(&reject));
        })
    }

    /// Load every image in parallel; failures become placeholders
    pub async fn preload() -> (BrowserImages, PreloadReport) {
        let mut pending = Vec::with_capacity(ImageKey::ALL.len());
        for key in ImageKey::ALL {
            match HtmlImageElement::new() {
                Ok(img) => {
                    let promise = load_promise(&img);
                    img.set_src(image_path(key));
                    pending.push((key, Some((img, promise))));
                }
                Err(err) => {
                    log::warn!("could not create <img> for {key:?}: {err:?}");
                    pending.push((key, None));
                }
            }
        }

        let mut images = BrowserImages::default();
        let mut report = PreloadReport::default();
        for (key, entry) in pending {
            let result = match entry {
                Some((img, promise)) => match JsFuture::from(promise).await {
                    Ok(_) => {
                        let size = (img.natural_width() as f32, img.natural_height() as f32);
                        images.elements.insert(key, img);
                        Ok(size)
                    }
                    Err(_) => Err(AssetError::LoadFailed {
                        key,
                        path: image_path(key).to_owned(),
                    }),
                },
                None => Err(AssetError::LoadFailed {
                    key,
                    path: image_path(key).to_owned(),
                }),
            };
            images.catalog.record(key, result, &mut report);
        }
        images.catalog.finish();

        log::info!(
            "preloaded {} images ({} placeholders)",
            report.loaded.len(),
            report.substituted.len()
        );
        (images, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_load_becomes_placeholder() {
        let mut catalog = ImageCatalog::new();
        let mut report = PreloadReport::default();
        catalog.record(ImageKey::Ship, Ok((64.0, 48.0)), &mut report);
        catalog.record(
            ImageKey::Missile,
            Err(AssetError::LoadFailed {
                key: ImageKey::Missile,
                path: image_path(ImageKey::Missile).to_owned(),
            }),
            &mut report,
        );
        catalog.record(ImageKey::Odin, Ok((0.0, 0.0)), &mut report);

        // Nothing is served before the preload finishes
        assert!(catalog.image(ImageKey::Ship).is_none());
        catalog.finish();

        let ship = catalog.image(ImageKey::Ship).expect("ship loaded");
        assert!(!ship.placeholder);
        assert_eq!((ship.width, ship.height), (64.0, 48.0));

        let missile = catalog.image(ImageKey::Missile).expect("placeholder");
        assert!(missile.placeholder);
        assert_eq!(missile.width, PLACEHOLDER_SIZE);

        assert!(catalog.image(ImageKey::Odin).expect("placeholder").placeholder);
        assert!(catalog.image(ImageKey::Vino).is_none());

        assert_eq!(report.loaded, vec![ImageKey::Ship]);
        assert_eq!(report.substituted.len(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_every_key_has_a_path() {
        for key in ImageKey::ALL {
            assert!(image_path(key).starts_with("img/"));
        }
    }
}
