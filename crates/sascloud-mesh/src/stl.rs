//! STL (stereolithography) triangle-soup reading and writing.
//!
//! Supports both the binary layout (80-byte header, u32 triangle count,
//! 50-byte records) and the ASCII `solid`/`facet`/`vertex` grammar.
//! Detection prefers the binary layout when the declared record count
//! matches the file size exactly, since binary files are allowed to start
//! with the bytes `solid`.

use sascloud_math::Point3;

use crate::error::{MeshError, Result};
use crate::Triangle;

const BINARY_HEADER_LEN: usize = 80;
const BINARY_RECORD_LEN: usize = 50;

/// Parse STL bytes into a triangle list, auto-detecting the format.
pub fn parse_stl(bytes: &[u8]) -> Result<Vec<Triangle>> {
    if looks_binary(bytes) {
        parse_binary(bytes)
    } else if bytes.trim_ascii_start().starts_with(b"solid") {
        parse_ascii(bytes)
    } else {
        Err(MeshError::MalformedStl(
            "not a binary or ASCII STL file".into(),
        ))
    }
}

fn looks_binary(bytes: &[u8]) -> bool {
    if bytes.len() < BINARY_HEADER_LEN + 4 {
        return false;
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    bytes.len() == BINARY_HEADER_LEN + 4 + count * BINARY_RECORD_LEN
}

fn parse_binary(bytes: &[u8]) -> Result<Vec<Triangle>> {
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    let mut triangles = Vec::with_capacity(count);
    let mut offset = BINARY_HEADER_LEN + 4;
    for _ in 0..count {
        // Skip the 12-byte facet normal; it is derived data.
        let v = read_f32s::<9>(&bytes[offset + 12..offset + 48]);
        triangles.push(Triangle::new(
            Point3::new(v[0] as f64, v[1] as f64, v[2] as f64),
            Point3::new(v[3] as f64, v[4] as f64, v[5] as f64),
            Point3::new(v[6] as f64, v[7] as f64, v[8] as f64),
        ));
        offset += BINARY_RECORD_LEN;
    }
    Ok(triangles)
}

fn read_f32s<const N: usize>(bytes: &[u8]) -> [f32; N] {
    let mut out = [0.0f32; N];
    for (i, chunk) in bytes.chunks_exact(4).take(N).enumerate() {
        out[i] = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    out
}

fn parse_ascii(bytes: &[u8]) -> Result<Vec<Triangle>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| MeshError::MalformedStl("ASCII STL is not valid UTF-8".into()))?;

    let mut vertices: Vec<Point3> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let mut words = line.split_whitespace();
        if words.next() != Some("vertex") {
            continue;
        }
        let mut coord = [0.0f64; 3];
        for c in &mut coord {
            let word = words.next().ok_or_else(|| {
                MeshError::MalformedStl(format!("line {}: vertex needs 3 coordinates", lineno + 1))
            })?;
            *c = word.parse::<f64>().map_err(|_| {
                MeshError::MalformedStl(format!("line {}: bad coordinate '{}'", lineno + 1, word))
            })?;
        }
        vertices.push(Point3::new(coord[0], coord[1], coord[2]));
    }

    if vertices.is_empty() || vertices.len() % 3 != 0 {
        return Err(MeshError::MalformedStl(format!(
            "expected a multiple of 3 vertices, found {}",
            vertices.len()
        )));
    }

    Ok(vertices
        .chunks_exact(3)
        .map(|v| Triangle::new(v[0], v[1], v[2]))
        .collect())
}

/// Serialize triangles as a binary STL byte buffer.
pub fn write_binary_stl(triangles: &[Triangle], header_name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(BINARY_HEADER_LEN + 4 + triangles.len() * BINARY_RECORD_LEN);

    let mut header = [0u8; BINARY_HEADER_LEN];
    let name = header_name.as_bytes();
    let n = name.len().min(header.len());
    header[..n].copy_from_slice(&name[..n]);
    out.extend_from_slice(&header);

    out.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for tri in triangles {
        let n = facet_normal(tri);
        for v in n {
            out.extend_from_slice(&(v as f32).to_le_bytes());
        }
        for p in tri.vertices() {
            out.extend_from_slice(&(p.x as f32).to_le_bytes());
            out.extend_from_slice(&(p.y as f32).to_le_bytes());
            out.extend_from_slice(&(p.z as f32).to_le_bytes());
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }
    out
}

fn facet_normal(tri: &Triangle) -> [f64; 3] {
    let n = (tri.b - tri.a).cross(&(tri.c - tri.a));
    let len = n.norm();
    if len <= f64::EPSILON {
        return [0.0, 0.0, 0.0];
    }
    [n.x / len, n.y / len, n.z / len]
}
