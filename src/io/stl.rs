use crate::triangulated::Triangulated3D;
use std::fmt::Debug;
use std::io::Cursor;

/// Export to ASCII STL
/// Convert a triangulated shape to an **ASCII STL** string with the given `name`.
///
/// ```rust
/// # use hullforge::mesh::Mesh;
/// let mesh = Mesh::<()>::cuboid(1.0, 1.0, 1.0, None);
/// let text = mesh.to_stl_ascii("my_solid");
/// assert!(text.starts_with("solid my_solid"));
/// ```
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    shape.visit_triangles(|tri| {
        let n = tri[0].normal;
        out.push_str(&format!("  facet normal {:.6} {:.6} {:.6}\n", n.x, n.y, n.z));
        out.push_str("    outer loop\n");
        for v in &tri {
            let p = v.pos;
            out.push_str(&format!("      vertex {:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// Units are millimetres; facet winding follows the mesh orientation.
pub fn to_stl_binary<T: Triangulated3D>(shape: &T) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();

    shape.visit_triangles(|tri| {
        let n = tri[0].normal;
        triangles.push(Triangle {
            normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
            vertices: tri.map(|v| Vertex::new([v.pos.x as f32, v.pos.y as f32, v.pos.z as f32])),
        });
    });

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

impl<S: Clone + Debug + Send + Sync> crate::mesh::Mesh<S> {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }
    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::Mesh;

    #[test]
    fn binary_stl_has_one_record_per_triangle() {
        let cube: Mesh<()> = Mesh::cuboid(1.0, 1.0, 1.0, None);
        let bytes = cube.to_stl_binary().unwrap();
        // 80-byte header, u32 count, 50 bytes per facet
        assert_eq!(bytes.len(), 84 + 12 * 50);
        let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
        assert_eq!(count, 12);
    }

    #[test]
    fn ascii_stl_lists_every_facet() {
        let cube: Mesh<()> = Mesh::cuboid(1.0, 1.0, 1.0, None);
        let text = cube.to_stl_ascii("cube");
        assert_eq!(text.matches("facet normal").count(), 12);
        assert!(text.trim_end().ends_with("endsolid cube"));
    }
}
