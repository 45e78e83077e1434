//! Ordered class-name catalog loaded from a labels file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::ids::CategoryId;
use super::model::Category;
use crate::error::PrepError;

/// Ordered list of class names. Line N of the labels file is class id N.
///
/// The name lookup is injective: loading rejects duplicate names so that a
/// VOC object name always maps back to exactly one id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassCatalog {
    names: Vec<String>,
    ids_by_name: HashMap<String, CategoryId>,
}

impl ClassCatalog {
    /// Read a labels file with one class name per line.
    pub fn load(path: &Path) -> Result<Self, PrepError> {
        if !path.is_file() {
            return Err(PrepError::LabelsNotFound {
                path: path.to_path_buf(),
            });
        }

        let data = fs::read_to_string(path).map_err(PrepError::Io)?;
        let names: Vec<String> = data.lines().map(str::to_string).collect();

        for (line_idx, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                log::warn!(
                    "{} line {} is blank; class id {} gets an empty name",
                    path.display(),
                    line_idx + 1,
                    line_idx
                );
            }
        }

        Self::from_names(names).map_err(|message| PrepError::ClassCatalogInvalid {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Build a catalog from names already in memory.
    pub fn from_names<I, S>(names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut ids_by_name = HashMap::with_capacity(names.len());

        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                continue;
            }
            if let Some(previous) = ids_by_name.insert(name.clone(), CategoryId::from(index)) {
                return Err(format!(
                    "class '{}' appears on line {} and line {}",
                    name,
                    previous.as_u64() + 1,
                    index + 1
                ));
            }
        }

        Ok(Self { names, ids_by_name })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name for a YOLO class index, if in range.
    pub fn name(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    /// Id for a class name, if present.
    pub fn id_of(&self, name: &str) -> Option<CategoryId> {
        self.ids_by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The full catalog as aggregate-document categories, in id order.
    pub fn categories(&self) -> Vec<Category> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| Category::new(index, name.clone()))
            .collect()
    }
}
