use query_engine::Document;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageField {
    field: String,
    folder: String,
    multiple: bool,
}

/// Response-side rewriting of stored documents.
///
/// Stored image fields hold bare filenames; responses carry
/// `{base_url}/{folder}/{filename}`. Hidden fields never leave the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
    base_url: String,
    images: Vec<ImageField>,
    hidden: Vec<String>,
}

impl Presentation {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// A single filename stored under `field`.
    pub fn image(mut self, field: &str, folder: &str) -> Self {
        self.images.push(ImageField {
            field: field.to_string(),
            folder: folder.to_string(),
            multiple: false,
        });
        self
    }

    /// A list of filenames stored under `field`.
    pub fn images(mut self, field: &str, folder: &str) -> Self {
        self.images.push(ImageField {
            field: field.to_string(),
            folder: folder.to_string(),
            multiple: true,
        });
        self
    }

    pub fn hide(mut self, field: &str) -> Self {
        self.hidden.push(field.to_string());
        self
    }

    /// Fields never returned, and so never filterable or sortable.
    pub fn hidden(&self) -> Vec<&str> {
        self.hidden.iter().map(String::as_str).collect()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn apply(&self, mut document: Document) -> Document {
        for field in &self.hidden {
            document.remove(field);
        }

        for image in &self.images {
            let Some(value) = document.get_mut(&image.field) else {
                continue;
            };
            match value {
                Value::String(file) if !image.multiple => {
                    *file = self.url(&image.folder, file);
                }
                Value::Array(files) if image.multiple => {
                    for file in files.iter_mut() {
                        if let Value::String(name) = file {
                            *name = self.url(&image.folder, name);
                        }
                    }
                }
                _ => {}
            }
        }

        document
    }

    fn url(&self, folder: &str, file: &str) -> String {
        if file.is_empty() || file.contains("://") {
            return file.to_string();
        }
        format!("{}/{}/{}", self.base_url, folder, file)
    }
}
