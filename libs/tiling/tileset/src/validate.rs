// This file is part of Nitrogen.
//
// Nitrogen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Nitrogen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Nitrogen.  If not, see <http://www.gnu.org/licenses/>.

//! The validation pass spec.md §6 calls out as "performed by a separate
//! collaborator" and lists as a CI gate and CLI option: walk `tileset.json`,
//! confirm every `content.uri` resolves, and confirm each resolved file
//! parses as a structurally valid GLB.

use std::path::Path;

use serde_json::Value;

use crate::error::TilingError;

/// Parses `tileset.json` under `out_dir`, then recursively visits every
/// tile, checking that `content.uri` (when present) resolves to a file on
/// disk and that the file's first 12 bytes form a valid GLB header.
pub fn validate_tileset(out_dir: &Path) -> Result<(), TilingError> {
    let tileset_path = out_dir.join("tileset.json");
    let bytes = std::fs::read(&tileset_path).map_err(|e| TilingError::Validation {
        reason: format!("cannot read {}: {e}", tileset_path.display()),
    })?;
    let document: Value = serde_json::from_slice(&bytes).map_err(|e| TilingError::Validation {
        reason: format!("tileset.json is not valid JSON: {e}"),
    })?;

    let version = document["asset"]["version"].as_str();
    if version != Some("1.1") {
        return Err(TilingError::Validation {
            reason: format!("asset.version is {version:?}, expected \"1.1\""),
        });
    }

    let root = document.get("root").ok_or_else(|| TilingError::Validation {
        reason: "tileset.json has no root tile".to_string(),
    })?;
    visit_tile(root, out_dir)
}

fn visit_tile(tile: &Value, out_dir: &Path) -> Result<(), TilingError> {
    if let Some(content) = tile.get("content") {
        let uri = content["uri"].as_str().ok_or_else(|| TilingError::Validation {
            reason: "a tile's content has no uri".to_string(),
        })?;
        validate_glb_file(&out_dir.join(uri))?;
    }
    if let Some(children) = tile.get("children").and_then(Value::as_array) {
        for child in children {
            visit_tile(child, out_dir)?;
        }
    }
    Ok(())
}

fn validate_glb_file(path: &Path) -> Result<(), TilingError> {
    let bytes = std::fs::read(path).map_err(|e| TilingError::Validation {
        reason: format!("content.uri {} does not resolve: {e}", path.display()),
    })?;
    if bytes.len() < 12 {
        return Err(TilingError::Validation {
            reason: format!("{} is smaller than a GLB header", path.display()),
        });
    }
    if &bytes[0..4] != b"glTF" {
        return Err(TilingError::Validation {
            reason: format!("{} has no glTF magic", path.display()),
        });
    }
    let declared_length = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
    if declared_length != bytes.len() {
        return Err(TilingError::Validation {
            reason: format!(
                "{} declares length {declared_length} but is {} bytes",
                path.display(),
                bytes.len()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_file_without_the_glb_magic() {
        let dir = std::env::temp_dir().join("tileset_validate_test_not_glb");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.glb");
        std::fs::write(&path, b"not a glb").unwrap();
        let err = validate_glb_file(&path).unwrap_err();
        assert!(matches!(err, TilingError::Validation { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }
}
