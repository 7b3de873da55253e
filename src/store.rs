/*!
 * Content store: path-keyed side table of readable handles
 */

use std::collections::HashMap;

use crate::error::ContentError;
use crate::source::SharedHandle;

/// Reads the text content of a file by tree path
pub trait ContentReader: Sync {
    fn read_content(&self, path: &str) -> Result<String, ContentError>;
}

impl<F> ContentReader for F
where
    F: Fn(&str) -> Result<String, ContentError> + Sync,
{
    fn read_content(&self, path: &str) -> Result<String, ContentError> {
        self(path)
    }
}

/// Handles for every file of one ingested tree.
///
/// Kept outside the tree so filtered views stay cheap to build and compare.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    handles: HashMap<String, SharedHandle>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, handle: SharedHandle) {
        self.handles.insert(path.into(), handle);
    }

    pub fn get(&self, path: &str) -> Option<&SharedHandle> {
        self.handles.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.handles.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drop every handle
    pub fn clear(&mut self) {
        self.handles.clear();
    }

    /// Replace the whole content with `handles`
    pub fn replace<I>(&mut self, handles: I)
    where
        I: IntoIterator<Item = (String, SharedHandle)>,
    {
        self.clear();
        self.handles.extend(handles);
    }
}

impl ContentReader for ContentStore {
    fn read_content(&self, path: &str) -> Result<String, ContentError> {
        let handle = self
            .get(path)
            .ok_or_else(|| ContentError::NotFound(path.to_string()))?;

        handle.read_text().map_err(|source| ContentError::Read {
            path: path.to_string(),
            source,
        })
    }
}
