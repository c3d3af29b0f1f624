//! Button and status icons embedded at build time.

use std::sync::Arc;

use crate::color::Color;
use crate::mesh::MeshData;
use crate::ply::{self, PlyError};

const ADD_PLY: &str = include_str!("../assets/add.ply");
const REMOVE_PLY: &str = include_str!("../assets/remove.ply");
const REFRESH_PLY: &str = include_str!("../assets/refresh.ply");
const ERROR_PLY: &str = include_str!("../assets/error.ply");
const BARS_PLY: &str = include_str!("../assets/bars.ply");
const CANDLES_PLY: &str = include_str!("../assets/candles.ply");

/// Decoded icon meshes, each in `[-1, 1]^2` model space.
#[derive(Debug, Clone)]
pub struct Icons {
    pub add: Arc<MeshData>,
    pub remove: Arc<MeshData>,
    pub refresh: Arc<MeshData>,
    pub error: Arc<MeshData>,
    pub bars: Arc<MeshData>,
    pub candles: Arc<MeshData>,
}

impl Icons {
    /// Decode every embedded icon.
    pub fn load() -> Result<Self, PlyError> {
        let load = |src: &str, color: Color| ply::decode(src, color).map(Arc::new);
        Ok(Self {
            add: load(ADD_PLY, Color::WHITE)?,
            remove: load(REMOVE_PLY, Color::WHITE)?,
            refresh: load(REFRESH_PLY, Color::WHITE)?,
            error: load(ERROR_PLY, Color::RED)?,
            bars: load(BARS_PLY, Color::WHITE)?,
            candles: load(CANDLES_PLY, Color::WHITE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_icons_decode() {
        let icons = Icons::load().unwrap();
        for mesh in [&icons.add, &icons.remove, &icons.refresh, &icons.error, &icons.bars, &icons.candles] {
            assert!(!mesh.is_empty());
            assert!(mesh
                .vertices
                .iter()
                .all(|v| v.position[0].abs() <= 1.0 && v.position[1].abs() <= 1.0));
        }
        assert_eq!(icons.add.triangle_count(), 4);
        assert_eq!(icons.refresh.line_count(), 24);
        assert_eq!(icons.error.vertices[0].color, Color::RED.0);
    }
}
