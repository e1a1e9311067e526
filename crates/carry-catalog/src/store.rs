//! # Catalog Store
//!
//! An in-memory index of products, loaded from a directory of definitions.
//!
//! ## Loading
//! ```text
//! catalog/
//! ├── rank-boost.json   ──┐
//! ├── leveling.toml     ──┤  parse ProductDef
//! └── README.md           │  (other files are skipped)
//!                         ▼
//!                    normalize(def)
//!                         │
//!                         ▼
//!                 Product::try_from(def)  ── INVALID_GROUP_CONFIG ──► error
//!                         │
//!                         ▼
//!                 index by product id     ── duplicate id ──► error
//! ```
//!
//! Files are read in name order so errors are reported deterministically.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use carry_core::definition::ProductDef;
use carry_core::Product;
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::normalize::normalize;

/// Definition file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

/// Products indexed by id.
///
/// ## Usage
/// ```rust,no_run
/// use carry_catalog::Catalog;
///
/// let catalog = Catalog::load_dir("catalog")?;
/// let product = catalog.get("rank-boost")?;
/// println!("{} groups", product.option_groups.len());
/// # Ok::<(), carry_catalog::CatalogError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<String, Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` and `*.toml` definition in a directory.
    ///
    /// Subdirectories are not searched.
    pub fn load_dir(dir: impl AsRef<Path>) -> CatalogResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(CatalogError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let io_err = |source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut files: Vec<(PathBuf, Format)> = fs::read_dir(dir)
            .map_err(io_err)?
            .map(|entry| entry.map(|e| e.path()).map_err(io_err))
            .collect::<CatalogResult<Vec<_>>>()?
            .into_iter()
            .filter(|path| path.is_file())
            .filter_map(|path| Format::from_path(&path).map(|format| (path, format)))
            .collect();
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut catalog = Catalog::new();
        for (path, format) in files {
            let product = load_file(&path, format)?;
            debug!(
                id = %product.id,
                groups = product.option_groups.len(),
                path = %path.display(),
                "Loaded product"
            );
            catalog.insert(product)?;
        }

        info!(dir = %dir.display(), count = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Adds a product, rejecting duplicate ids and invalid products.
    pub fn insert(&mut self, product: Product) -> CatalogResult<()> {
        product.check()?;
        if self.products.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct { id: product.id });
        }
        self.products.insert(product.id.clone(), product);
        Ok(())
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &str) -> CatalogResult<&Product> {
        self.products.get(id).ok_or_else(|| CatalogError::not_found(id))
    }

    /// All products, ordered by id.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Parses, normalizes and converts one definition file.
fn load_file(path: &Path, format: Format) -> CatalogResult<Product> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let def: ProductDef = match format {
        Format::Json => serde_json::from_str(&text).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        Format::Toml => toml::from_str(&text).map_err(|source| CatalogError::Toml {
            path: path.to_path_buf(),
            source,
        })?,
    };

    Product::try_from(normalize(def)).map_err(|source| CatalogError::InvalidProduct {
        path: path.to_path_buf(),
        source,
    })
}
