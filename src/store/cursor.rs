//! Opaque pagination tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use super::attribute::Item;
use super::error::StoreError;

/// Position after the last item of a page, as reported by the engine.
///
/// Callers get it as an opaque URL-safe token; only the engine interprets
/// the key inside.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    last_evaluated_key: Item,
}

impl PageCursor {
    pub fn new(last_evaluated_key: Item) -> Self {
        Self { last_evaluated_key }
    }

    pub fn key(&self) -> &Item {
        &self.last_evaluated_key
    }

    pub fn into_key(self) -> Item {
        self.last_evaluated_key
    }

    pub fn encode(&self) -> Result<String, StoreError> {
        let json = serde_json::to_vec(&self.last_evaluated_key)
            .map_err(|e| StoreError::InvalidCursor(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn decode(token: &str) -> Result<Self, StoreError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| StoreError::InvalidCursor(e.to_string()))?;
        let key: Item =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::InvalidCursor(e.to_string()))?;
        if key.is_empty() {
            return Err(StoreError::InvalidCursor("empty key".into()));
        }
        Ok(Self::new(key))
    }
}
