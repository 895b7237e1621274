use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use crate::models::{ClothingItem, Gender, PLACEHOLDER_COLOR};
use crate::services::postgres::{PostgresClient, PostgresError};

/// Directory names never descended into when scanning for catalog files
const SKIPPED_DIRS: [&str; 3] = ["node_modules", ".next", "__pycache__"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] PostgresError),

    #[error("Catalog load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawColors {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

/// Catalog item as found on disk, before defaults are applied
#[derive(Debug, Deserialize)]
struct RawClothingItem {
    id: Option<RawId>,
    brand: Option<String>,
    category: Option<String>,
    gender: Option<String>,
    colors: Option<RawColors>,
    style: Option<String>,
    price_eur: Option<RawPrice>,
    url: Option<String>,
}

impl RawClothingItem {
    /// Apply field defaults; items without an id are dropped
    fn normalize(self) -> Option<ClothingItem> {
        let id = match self.id? {
            RawId::Text(s) if s.trim().is_empty() => return None,
            RawId::Text(s) => s.trim().to_string(),
            RawId::Number(n) => n.to_string(),
        };

        let colors = match self.colors {
            Some(RawColors::One(c)) => vec![c],
            Some(RawColors::Many(cs)) => cs,
            None => Vec::new(),
        };

        let price_eur = match self.price_eur {
            Some(RawPrice::Number(p)) => p,
            Some(RawPrice::Text(s)) => s.trim().parse().unwrap_or(0.0),
            None => 0.0,
        };

        Some(ClothingItem {
            id,
            brand: non_blank(self.brand).unwrap_or_else(|| "unknown".to_string()),
            category: non_blank(self.category).unwrap_or_else(|| "unknown".to_string()),
            gender: self
                .gender
                .as_deref()
                .map(Gender::from_catalog)
                .unwrap_or(Gender::Unisex),
            colors: normalize_colors(colors),
            style: non_blank(self.style).unwrap_or_else(|| "casual".to_string()),
            price_eur: if price_eur.is_finite() { price_eur.max(0.0) } else { 0.0 },
            url: non_blank(self.url),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Lower-case and trim colors; an empty list becomes the placeholder
pub fn normalize_colors(colors: Vec<String>) -> Vec<String> {
    let colors: Vec<String> = colors
        .into_iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();

    if colors.is_empty() {
        vec![PLACEHOLDER_COLOR.to_string()]
    } else {
        colors
    }
}

/// Parse one catalog file: a list, `{"items": [...]}`, or a single item
pub fn parse_catalog_json(contents: &str) -> Result<Vec<ClothingItem>, serde_json::Error> {
    let value: Value = serde_json::from_str(contents)?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(entries)) => entries,
            Some(_) => Vec::new(),
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    };

    Ok(entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| serde_json::from_value::<RawClothingItem>(entry).ok())
        .filter_map(RawClothingItem::normalize)
        .collect())
}

/// All `*.json` files below `dir`, sorted for a stable catalog order
fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if path.is_dir() {
            if !SKIPPED_DIRS.contains(&name) {
                collect_json_files(&path, files)?;
            }
        } else if path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json")) {
            files.push(path);
        }
    }

    Ok(())
}

/// Load every catalog file below `dir`
///
/// Unreadable or malformed files are logged and skipped.
pub fn load_json_dir(dir: &Path) -> Result<Vec<ClothingItem>, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    collect_json_files(dir, &mut files)?;

    let mut items = Vec::new();
    for file in &files {
        let parsed = fs::read_to_string(file)
            .map_err(|e| e.to_string())
            .and_then(|contents| parse_catalog_json(&contents).map_err(|e| e.to_string()));

        match parsed {
            Ok(mut file_items) => items.append(&mut file_items),
            Err(e) => tracing::warn!("Skipping catalog file {}: {}", file.display(), e),
        }
    }

    tracing::info!("Loaded {} items from {} JSON files", items.len(), files.len());

    Ok(items)
}

enum CatalogBackend {
    Json(PathBuf),
    Postgres(Arc<PostgresClient>),
    Fixed,
}

/// Clothing catalog loaded once and shared read-only afterwards
pub struct CatalogStore {
    backend: CatalogBackend,
    items: OnceCell<Arc<Vec<ClothingItem>>>,
}

impl CatalogStore {
    pub fn json(dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: CatalogBackend::Json(dir.into()),
            items: OnceCell::new(),
        }
    }

    pub fn postgres(client: Arc<PostgresClient>) -> Self {
        Self {
            backend: CatalogBackend::Postgres(client),
            items: OnceCell::new(),
        }
    }

    /// Catalog over an in-memory item list
    pub fn from_items(items: Vec<ClothingItem>) -> Self {
        Self {
            backend: CatalogBackend::Fixed,
            items: OnceCell::new_with(Some(Arc::new(items))),
        }
    }

    /// The catalog, loading it on first use
    pub async fn items(&self) -> Result<Arc<Vec<ClothingItem>>, CatalogError> {
        self.items
            .get_or_try_init(|| async {
                let items = match &self.backend {
                    CatalogBackend::Json(dir) => {
                        let dir = dir.clone();
                        tokio::task::spawn_blocking(move || load_json_dir(&dir)).await??
                    }
                    CatalogBackend::Postgres(client) => client.load_items().await?,
                    CatalogBackend::Fixed => Vec::new(),
                };
                Ok::<_, CatalogError>(Arc::new(items))
            })
            .await
            .map(Arc::clone)
    }

    /// Item count if the catalog has been loaded
    pub fn loaded_len(&self) -> Option<usize> {
        self.items.get().map(|items| items.len())
    }

    pub async fn health_check(&self) -> bool {
        match &self.backend {
            CatalogBackend::Postgres(client) => client.health_check().await.unwrap_or(false),
            CatalogBackend::Json(dir) => dir.is_dir(),
            CatalogBackend::Fixed => true,
        }
    }
}

/// Import a JSON catalog directory into Postgres, keeping existing rows
pub async fn seed_postgres(client: &PostgresClient, dir: &Path) -> Result<u64, CatalogError> {
    let dir = dir.to_path_buf();
    let items = tokio::task::spawn_blocking(move || load_json_dir(&dir)).await??;
    Ok(client.insert_items(&items).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let items = parse_catalog_json(r#"[{"id": 7}, {"brand": "zara"}, "junk"]"#).unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, "7");
        assert_eq!(item.brand, "unknown");
        assert_eq!(item.category, "unknown");
        assert_eq!(item.gender, Gender::Unisex);
        assert_eq!(item.colors, vec![PLACEHOLDER_COLOR]);
        assert_eq!(item.style, "casual");
        assert_eq!(item.price_eur, 0.0);
        assert_eq!(item.url, None);
    }

    #[test]
    fn test_lenient_fields() {
        let items = parse_catalog_json(
            r#"{"items": [
                {"id": "a", "colors": " Navy ", "price_eur": "19.95", "url": ""},
                {"id": "b", "colors": ["Black", ""], "price_eur": "n/a", "gender": "men"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(items[0].colors, vec!["navy"]);
        assert_eq!(items[0].price_eur, 19.95);
        assert_eq!(items[0].url, None);
        assert_eq!(items[1].colors, vec!["black"]);
        assert_eq!(items[1].price_eur, 0.0);
        assert_eq!(items[1].gender, Gender::Man);
    }

    #[test]
    fn test_single_object_file() {
        let items = parse_catalog_json(r#"{"id": "x1", "category": "hoodie"}"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "hoodie");
    }

    #[test]
    fn test_missing_directory() {
        let err = load_json_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, CatalogError::MissingDirectory(_)));
    }

    #[test]
    fn test_scan_skips_vendor_dirs_and_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("zara.json"), r#"[{"id": "z1"}]"#).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        fs::write(dir.path().join("notes.txt"), r#"[{"id": "t1"}]"#).unwrap();
        fs::create_dir_all(dir.path().join("hm/shirts")).unwrap();
        fs::write(dir.path().join("hm/shirts/items.json"), r#"[{"id": "h1"}]"#).unwrap();
        fs::create_dir_all(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/x.json"), r#"[{"id": "n1"}]"#).unwrap();

        let ids: Vec<String> = load_json_dir(dir.path())
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["h1", "z1"]);
    }

    #[tokio::test]
    async fn test_store_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"id": "1"}, {"id": "2"}]"#).unwrap();

        let store = CatalogStore::json(dir.path());
        assert_eq!(store.loaded_len(), None);
        assert_eq!(store.items().await.unwrap().len(), 2);

        fs::write(dir.path().join("b.json"), r#"[{"id": "3"}]"#).unwrap();
        assert_eq!(store.items().await.unwrap().len(), 2);
        assert_eq!(store.loaded_len(), Some(2));
    }
}
