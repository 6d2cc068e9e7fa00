//! STL serialization.
//!
//! Binary layout: 80-byte header, little-endian u32 triangle count, then per
//! triangle a facet normal and three vertices as little-endian f32 followed by
//! a zero u16 attribute. Facet normals are taken from the triangle itself, so
//! they follow any deformation applied to the mesh.

use std::io::{self, Write};

use crate::geom::{GeomMesh, Point3, Vec3};

pub const HEADER_SIZE: usize = 80;
/// Bytes per triangle record in a binary file.
pub const TRIANGLE_RECORD_SIZE: usize = 50;

/// Serialize `mesh` as binary STL into a new buffer.
#[must_use]
pub fn binary_stl(mesh: &GeomMesh, name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + 4 + mesh.triangle_count() * TRIANGLE_RECORD_SIZE);
    if let Err(err) = write_binary_stl(mesh, name, &mut out) {
        log::warn!("binary STL for {name} is incomplete: {err}");
    }
    out
}

/// Serialize `mesh` as ASCII STL into a new string.
#[must_use]
pub fn ascii_stl(mesh: &GeomMesh, name: &str) -> String {
    let mut out = Vec::new();
    if let Err(err) = write_ascii_stl(mesh, name, &mut out) {
        log::warn!("ASCII STL for {name} is incomplete: {err}");
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Write binary STL. The header carries `name`, space padded.
///
/// # Errors
/// Propagates failures of `writer`.
pub fn write_binary_stl<W: Write>(mesh: &GeomMesh, name: &str, mut writer: W) -> io::Result<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = format!("frame-engine {name}");
    let len = text.len().min(HEADER_SIZE);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
    writer.write_all(&header)?;

    let triangles: Vec<[Point3; 3]> = triangles(mesh).collect();
    #[allow(clippy::cast_possible_truncation)]
    let count = triangles.len() as u32;
    writer.write_all(&count.to_le_bytes())?;

    for tri in &triangles {
        let n = facet_normal(tri);
        write_f32_triple(&mut writer, n.x, n.y, n.z)?;
        for p in tri {
            write_f32_triple(&mut writer, p.x, p.y, p.z)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Write ASCII STL as `solid <name>` .. `endsolid <name>`.
///
/// # Errors
/// Propagates failures of `writer`.
pub fn write_ascii_stl<W: Write>(mesh: &GeomMesh, name: &str, mut writer: W) -> io::Result<()> {
    writeln!(writer, "solid {name}")?;
    for tri in triangles(mesh) {
        let n = facet_normal(&tri);
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for p in &tri {
            writeln!(writer, "      vertex {:e} {:e} {:e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;
    Ok(())
}

fn triangles(mesh: &GeomMesh) -> impl Iterator<Item = [Point3; 3]> + '_ {
    mesh.indices.chunks_exact(3).filter_map(|tri| {
        let a = mesh.positions.get(tri[0] as usize)?;
        let b = mesh.positions.get(tri[1] as usize)?;
        let c = mesh.positions.get(tri[2] as usize)?;
        Some([(*a).into(), (*b).into(), (*c).into()])
    })
}

fn facet_normal(tri: &[Point3; 3]) -> Vec3 {
    tri[1]
        .sub_point(tri[0])
        .cross(tri[2].sub_point(tri[0]))
        .normalized()
        .unwrap_or(Vec3::ZERO)
}

#[allow(clippy::cast_possible_truncation)]
fn write_f32_triple<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> io::Result<()> {
    writer.write_all(&(x as f32).to_le_bytes())?;
    writer.write_all(&(y as f32).to_le_bytes())?;
    writer.write_all(&(z as f32).to_le_bytes())
}
