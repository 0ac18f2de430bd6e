//! # Template Catalogue
//!
//! A read-only set of named reference images used as shape-similarity
//! baselines. Build it once, share it behind an `Arc`, never mutate it.
//!
//! ```rust
//! use templates::TemplateCatalogue;
//!
//! let catalogue = TemplateCatalogue::builtin();
//! assert!(catalogue.get("circle").is_some());
//! assert!(catalogue.get("lenna").is_none());
//! ```

pub mod builtin;
pub mod error;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use image::DynamicImage;
use tracing::debug;

pub use error::{Result, TemplateError};

/// Immutable mapping from template name to reference image
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalogue {
    templates: BTreeMap<String, DynamicImage>,
}

impl TemplateCatalogue {
    /// Create a new catalogue builder
    pub fn builder() -> TemplateCatalogueBuilder {
        TemplateCatalogueBuilder::new()
    }

    /// Catalogue holding only the synthetic built-in shapes
    pub fn builtin() -> Self {
        Self::builder().with_builtins().build()
    }

    /// Look up a template image by name
    pub fn get(&self, name: &str) -> Option<&DynamicImage> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DynamicImage)> {
        self.templates.iter().map(|(name, image)| (name.as_str(), image))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Builder collecting templates before the catalogue is frozen
#[derive(Debug, Default)]
pub struct TemplateCatalogueBuilder {
    templates: BTreeMap<String, DynamicImage>,
}

impl TemplateCatalogueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the synthetic shapes from [`builtin`]
    pub fn with_builtins(mut self) -> Self {
        for (name, image) in builtin::all() {
            self.templates.insert(name.to_string(), image);
        }
        self
    }

    /// Add (or replace) a template
    pub fn add(mut self, name: impl Into<String>, image: DynamicImage) -> Self {
        self.templates.insert(name.into(), image);
        self
    }

    /// Load a single image file, named after its file stem
    pub fn load_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = template_name(path)?;
        let image = image::open(path)?;
        debug!("Loaded template '{}' from {}", name, path.display());
        Ok(self.add(name, image))
    }

    /// Load every decodable image in `dir`, named after file stems.
    ///
    /// Entries that are not images are skipped, so they resolve exactly like
    /// unknown names.
    pub fn load_dir(mut self, dir: impl AsRef<Path>) -> Result<Self> {
        let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        paths.sort();

        for path in paths.into_iter().filter(|p| p.is_file()) {
            match image::open(&path) {
                Ok(image) => {
                    let name = template_name(&path)?;
                    debug!("Loaded template '{}' from {}", name, path.display());
                    self.templates.insert(name, image);
                }
                Err(err) => {
                    debug!("Skipping {}: {}", path.display(), err);
                }
            }
        }
        Ok(self)
    }

    pub fn build(self) -> TemplateCatalogue {
        TemplateCatalogue {
            templates: self.templates,
        }
    }
}

fn template_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TemplateError::InvalidName(path.to_path_buf()))
}
