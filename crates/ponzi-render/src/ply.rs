//! ASCII PLY decoder for embedded icon meshes.
//!
//! Supports `vertex` elements with `x`, `y` (any `z` is ignored) and optional
//! `red`/`green`/`blue`/`alpha` properties, `face` elements with a vertex
//! index list (fan-triangulated), and `edge` elements with `vertex1` and
//! `vertex2` (emitted as lines). Both PLY type vocabularies are accepted:
//! `float`/`uchar`/`int`/`uint` and `float32`/`uint8`/`int32`/`uint32`.

use thiserror::Error;

use crate::color::Color;
use crate::gpu_types::Vertex;
use crate::mesh::MeshData;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlyError {
    #[error("invalid PLY header: {0}")]
    Header(String),
    #[error("unsupported PLY format: {0}")]
    UnsupportedFormat(String),
    #[error("unknown PLY property type: {0}")]
    UnknownType(String),
    #[error("PLY body line {line}: {message}")]
    Body { line: usize, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarType {
    Int,
    Float,
}

impl ScalarType {
    fn parse(name: &str) -> Result<Self, PlyError> {
        match name {
            "char" | "uchar" | "short" | "ushort" | "int" | "uint" | "int8" | "uint8" | "int16"
            | "uint16" | "int32" | "uint32" => Ok(ScalarType::Int),
            "float" | "double" | "float32" | "float64" => Ok(ScalarType::Float),
            other => Err(PlyError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Property {
    Scalar { name: String, ty: ScalarType },
    List { name: String },
}

impl Property {
    fn name(&self) -> &str {
        match self {
            Property::Scalar { name, .. } | Property::List { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

/// One parsed body row: scalar values plus list values in property order.
#[derive(Debug, Default)]
struct Row {
    scalars: Vec<(String, f64, ScalarType)>,
    lists: Vec<(String, Vec<u32>)>,
}

impl Row {
    fn scalar(&self, name: &str) -> Option<(f64, ScalarType)> {
        self.scalars
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, v, t)| (*v, *t))
    }

    fn list(&self) -> Option<&[u32]> {
        self.lists.first().map(|(_, l)| l.as_slice())
    }
}

fn parse_header<'a>(lines: &mut impl Iterator<Item = (usize, &'a str)>) -> Result<Vec<Element>, PlyError> {
    match lines.next() {
        Some((_, l)) if l.trim() == "ply" => {}
        _ => return Err(PlyError::Header("missing magic".to_string())),
    }

    let mut elements: Vec<Element> = Vec::new();
    for (_, line) in lines.by_ref() {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("format") => {
                let fmt = words.next().unwrap_or_default();
                if fmt != "ascii" {
                    return Err(PlyError::UnsupportedFormat(fmt.to_string()));
                }
            }
            Some("comment") | Some("obj_info") | None => {}
            Some("element") => {
                let name = words
                    .next()
                    .ok_or_else(|| PlyError::Header("element without name".to_string()))?;
                let count = words
                    .next()
                    .and_then(|c| c.parse().ok())
                    .ok_or_else(|| PlyError::Header(format!("element {name} without count")))?;
                elements.push(Element {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            Some("property") => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| PlyError::Header("property before element".to_string()))?;
                let parts: Vec<&str> = words.collect();
                let property = match parts.as_slice() {
                    ["list", count_ty, item_ty, name] => {
                        ScalarType::parse(count_ty)?;
                        ScalarType::parse(item_ty)?;
                        Property::List {
                            name: name.to_string(),
                        }
                    }
                    [ty, name] => Property::Scalar {
                        name: name.to_string(),
                        ty: ScalarType::parse(ty)?,
                    },
                    _ => return Err(PlyError::Header(format!("bad property line: {line}"))),
                };
                element.properties.push(property);
            }
            Some("end_header") => return Ok(elements),
            Some(other) => return Err(PlyError::Header(format!("unexpected keyword {other}"))),
        }
    }
    Err(PlyError::Header("missing end_header".to_string()))
}

fn parse_row(element: &Element, line_no: usize, line: &str) -> Result<Row, PlyError> {
    let err = |message: String| PlyError::Body {
        line: line_no,
        message,
    };
    let mut tokens = line.split_whitespace();
    let mut row = Row::default();
    for property in &element.properties {
        match property {
            Property::Scalar { name, ty } => {
                let token = tokens
                    .next()
                    .ok_or_else(|| err(format!("missing value for {name}")))?;
                let value: f64 = token
                    .parse()
                    .map_err(|_| err(format!("bad number {token:?} for {name}")))?;
                row.scalars.push((name.clone(), value, *ty));
            }
            Property::List { name } => {
                let count: usize = tokens
                    .next()
                    .and_then(|t| t.parse().ok())
                    .ok_or_else(|| err(format!("missing list count for {name}")))?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    let token = tokens
                        .next()
                        .ok_or_else(|| err(format!("short list for {name}")))?;
                    let index: u32 = token
                        .parse()
                        .map_err(|_| err(format!("bad index {token:?} in {name}")))?;
                    items.push(index);
                }
                row.lists.push((name.clone(), items));
            }
        }
    }
    Ok(row)
}

fn channel(row: &Row, name: &str, default: f32) -> f32 {
    match row.scalar(name) {
        Some((v, ScalarType::Int)) => (v / 255.0) as f32,
        Some((v, ScalarType::Float)) => v as f32,
        None => default,
    }
}

/// Decode an ASCII PLY document into a mesh. Vertices without colour
/// properties use `default_color`.
pub fn decode(source: &str, default_color: Color) -> Result<MeshData, PlyError> {
    let mut lines = source.lines().enumerate().map(|(i, l)| (i + 1, l));
    let elements = parse_header(&mut lines)?;

    let mut vertices: Vec<Vertex> = Vec::new();
    let mut line_indices: Vec<u32> = Vec::new();
    let mut triangle_indices: Vec<u32> = Vec::new();

    let mut body = lines.filter(|(_, l)| !l.trim().is_empty());
    for element in &elements {
        for _ in 0..element.count {
            let (line_no, line) = body.next().ok_or_else(|| PlyError::Body {
                line: 0,
                message: format!("unexpected end of data in element {}", element.name),
            })?;
            let row = parse_row(element, line_no, line)?;
            match element.name.as_str() {
                "vertex" => {
                    let x = row.scalar("x").map(|(v, _)| v as f32).unwrap_or(0.0);
                    let y = row.scalar("y").map(|(v, _)| v as f32).unwrap_or(0.0);
                    let [dr, dg, db, da] = default_color.0;
                    let color = Color::rgba(
                        channel(&row, "red", dr),
                        channel(&row, "green", dg),
                        channel(&row, "blue", db),
                        channel(&row, "alpha", da),
                    );
                    vertices.push(Vertex::new(x, y, color));
                }
                "face" => {
                    let list = row.list().ok_or_else(|| PlyError::Body {
                        line: line_no,
                        message: "face without index list".to_string(),
                    })?;
                    for i in 1..list.len().saturating_sub(1) {
                        triangle_indices.extend_from_slice(&[list[0], list[i], list[i + 1]]);
                    }
                }
                "edge" => {
                    let a = row.scalar("vertex1");
                    let b = row.scalar("vertex2");
                    match (a, b) {
                        (Some((a, _)), Some((b, _))) => {
                            line_indices.extend_from_slice(&[a as u32, b as u32]);
                        }
                        _ => {
                            return Err(PlyError::Body {
                                line: line_no,
                                message: "edge without vertex1/vertex2".to_string(),
                            })
                        }
                    }
                }
                // Unknown elements are skipped row by row.
                _ => {}
            }
        }
    }

    let count = vertices.len() as u32;
    if let Some(bad) = line_indices.iter().chain(&triangle_indices).find(|i| **i >= count) {
        return Err(PlyError::Body {
            line: 0,
            message: format!("index {bad} out of range for {count} vertices"),
        });
    }

    log::debug!(
        "decoded PLY mesh: {} vertices, {} lines, {} triangles",
        vertices.len(),
        line_indices.len() / 2,
        triangle_indices.len() / 3
    );
    Ok(MeshData::new(vertices, line_indices, triangle_indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_FLOAT32: &str = "ply
format ascii 1.0
comment exported
element vertex 4
property float32 x
property float32 y
property float32 z
property uint8 red
property uint8 green
property uint8 blue
element face 1
property list uint8 uint32 vertex_indices
end_header
-1 -1 0 255 0 0
1 -1 0 255 0 0
1 1 0 255 0 0
-1 1 0 255 0 0
4 0 1 2 3
";

    const LINES_FLOAT: &str = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element edge 2
property int vertex1
property int vertex2
end_header
0 0 0
1 0 0
1 1 0

0 1
1 2
";

    #[test]
    fn test_decode_faces_with_colors() {
        let mesh = decode(QUAD_FLOAT32, Color::WHITE).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_decode_edges_default_color() {
        let mesh = decode(LINES_FLOAT, Color::YELLOW).unwrap();
        assert_eq!(mesh.line_indices, vec![0, 1, 1, 2]);
        assert_eq!(mesh.vertices[2].position, [1.0, 1.0]);
        assert_eq!(mesh.vertices[2].color, Color::YELLOW.0);
    }

    #[test]
    fn test_rejects_binary_and_bad_indices() {
        let binary = "ply\nformat binary_little_endian 1.0\nend_header\n";
        assert!(matches!(decode(binary, Color::WHITE), Err(PlyError::UnsupportedFormat(_))));

        let bad = LINES_FLOAT.replace("1 2\n", "1 7\n");
        assert!(matches!(decode(&bad, Color::WHITE), Err(PlyError::Body { .. })));

        assert!(matches!(decode("hello", Color::WHITE), Err(PlyError::Header(_))));
    }

    #[test]
    fn test_unknown_type() {
        let src = "ply\nformat ascii 1.0\nelement vertex 1\nproperty quad x\nend_header\n0\n";
        assert_eq!(decode(src, Color::WHITE), Err(PlyError::UnknownType("quad".to_string())));
    }
}
