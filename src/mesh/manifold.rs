//! Vertex welding, T-junction repair and topology analysis of polygon soups.
//!
//! BSP booleans leave T-junctions: a vertex of one face lies inside an edge
//! of its neighbour. [`Mesh::to_indexed`] welds vertices, splices every such
//! vertex into the loops of the faces whose edges it lies on and triangulates
//! the repaired loops. The triangles it returns are the ones exported, and
//! [`IndexedTriangles::topology`] counts their edges without any further
//! repair: every directed edge `u → v` must be matched by exactly one `v → u`.

use crate::float_types::{Real, tolerance};
use crate::mesh::Mesh;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::fmt::Debug;

/// Distance under which a vertex is treated as lying on an edge.
const T_JUNCTION_TOLERANCE: Real = 1e-4;

/// Cell size of the spatial hash used for on-edge vertex lookup.
const EDGE_GRID_CELL: Real = 2.0;

type CellKey = (i64, i64, i64);

/// Welded triangle mesh: shared vertex positions plus index triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedTriangles {
    pub vertices: Vec<Point3<Real>>,
    pub triangles: Vec<[u32; 3]>,
    /// Vertices spliced into a neighbouring face's edge while indexing.
    pub t_junctions: usize,
}

/// Counts describing the closedness and orientation of a surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyReport {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    /// Edges used by exactly one face.
    pub boundary_edges: usize,
    /// Edges whose two directions are used an unequal number of times.
    pub inconsistent_edges: usize,
    /// Edges shared by more than two faces.
    pub non_manifold_edges: usize,
    /// Vertices spliced into a neighbouring face's edge.
    pub t_junctions: usize,
    pub components: usize,
    pub euler_characteristic: i64,
    pub signed_volume: Real,
    pub surface_area: Real,
}

impl TopologyReport {
    pub const fn is_closed(&self) -> bool {
        self.boundary_edges == 0
    }

    pub const fn is_consistently_oriented(&self) -> bool {
        self.inconsistent_edges == 0
    }

    /// Closed, consistently oriented, two faces per edge, non-empty.
    pub const fn is_manifold(&self) -> bool {
        self.faces > 0
            && self.is_closed()
            && self.is_consistently_oriented()
            && self.non_manifold_edges == 0
    }
}

struct WeldGrid {
    cell: Real,
    cells: HashMap<CellKey, Vec<u32>>,
    points: Vec<Point3<Real>>,
}

impl WeldGrid {
    fn new(cell: Real) -> Self {
        WeldGrid { cell, cells: HashMap::new(), points: Vec::new() }
    }

    fn key(&self, p: &Point3<Real>) -> CellKey {
        (
            (p.x / self.cell).floor() as i64,
            (p.y / self.cell).floor() as i64,
            (p.z / self.cell).floor() as i64,
        )
    }

    /// Index of an existing point within `cell` of `p`, or a new one.
    fn insert(&mut self, p: Point3<Real>) -> u32 {
        let (kx, ky, kz) = self.key(&p);
        let limit = self.cell * self.cell;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(bucket) = self.cells.get(&(kx + dx, ky + dy, kz + dz)) {
                        for &index in bucket {
                            if (self.points[index as usize] - p).norm_squared() <= limit {
                                return index;
                            }
                        }
                    }
                }
            }
        }
        let index = self.points.len() as u32;
        self.points.push(p);
        self.cells.entry((kx, ky, kz)).or_default().push(index);
        index
    }
}

/// Spatial hash over welded vertices for on-edge lookups.
struct EdgeGrid {
    cells: HashMap<CellKey, Vec<u32>>,
}

impl EdgeGrid {
    fn key(p: &Point3<Real>) -> CellKey {
        (
            (p.x / EDGE_GRID_CELL).floor() as i64,
            (p.y / EDGE_GRID_CELL).floor() as i64,
            (p.z / EDGE_GRID_CELL).floor() as i64,
        )
    }

    fn new(points: &[Point3<Real>]) -> Self {
        let mut cells: HashMap<CellKey, Vec<u32>> = HashMap::new();
        for (i, p) in points.iter().enumerate() {
            cells.entry(Self::key(p)).or_default().push(i as u32);
        }
        EdgeGrid { cells }
    }

    /// Vertices lying strictly inside segment `u → v`, sorted from `u`.
    fn on_edge(&self, points: &[Point3<Real>], u: u32, v: u32) -> Vec<u32> {
        let (a, b) = (points[u as usize], points[v as usize]);
        let d = b - a;
        let len2 = d.norm_squared();
        if len2 <= Real::EPSILON {
            return Vec::new();
        }
        let margin = Vector3::repeat(T_JUNCTION_TOLERANCE);
        let (lo, hi) = (Self::key(&(a.inf(&b) - margin)), Self::key(&(a.sup(&b) + margin)));
        let mut found = Vec::new();
        for cx in lo.0..=hi.0 {
            for cy in lo.1..=hi.1 {
                for cz in lo.2..=hi.2 {
                    let Some(bucket) = self.cells.get(&(cx, cy, cz)) else {
                        continue;
                    };
                    for &w in bucket {
                        if w == u || w == v {
                            continue;
                        }
                        let p = points[w as usize];
                        let t = (p - a).dot(&d) / len2;
                        let inside = t > 0.0 && t < 1.0;
                        if inside && (a + d * t - p).norm() <= T_JUNCTION_TOLERANCE {
                            found.push((t, w));
                        }
                    }
                }
            }
        }
        found.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));
        found.into_iter().map(|(_, w)| w).collect()
    }
}

/// Directed edges of a closed walk; an edge walked both ways cancels out.
fn directed_edges(walk: &[u32]) -> Vec<(u32, u32)> {
    let mut directed: Vec<(u32, u32)> = Vec::with_capacity(walk.len());
    for k in 0..walk.len() {
        let (u, v) = (walk[k], walk[(k + 1) % walk.len()]);
        if u == v {
            continue;
        }
        if let Some(pos) = directed.iter().position(|&(a, b)| a == v && b == u) {
            directed.swap_remove(pos);
        } else {
            directed.push((u, v));
        }
    }
    directed
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Weld vertices closer than `weld_tolerance`, repair T-junctions and
    /// triangulate.
    ///
    /// Untouched faces are fan-triangulated. A face that gained on-edge
    /// vertices, or whose welded loop folds back on itself, is fanned from
    /// its centroid over the remaining directed edges, so it shares every
    /// split edge with its neighbours.
    pub fn to_indexed(&self, weld_tolerance: Real) -> IndexedTriangles {
        let mut grid = WeldGrid::new(weld_tolerance.max(Real::EPSILON));
        let loops: Vec<Vec<u32>> = self
            .polygons
            .iter()
            .filter_map(|poly| {
                let mut face: Vec<u32> =
                    poly.vertices.iter().map(|v| grid.insert(v.pos)).collect();
                face.dedup();
                while face.len() > 1 && face.first() == face.last() {
                    face.pop();
                }
                (face.len() >= 3).then_some(face)
            })
            .collect();

        let mut vertices = grid.points;
        let edges = EdgeGrid::new(&vertices);
        let mut triangles = Vec::new();
        let mut t_junctions = 0;

        for face in &loops {
            let mut walk = Vec::with_capacity(face.len() + 4);
            for (k, &u) in face.iter().enumerate() {
                walk.push(u);
                let inserted = edges.on_edge(&vertices, u, face[(k + 1) % face.len()]);
                t_junctions += inserted.len();
                walk.extend(inserted);
            }
            let directed = directed_edges(&walk);
            if directed.is_empty() {
                continue;
            }

            if walk.len() == face.len() && directed.len() == face.len() {
                triangles.extend(
                    (1..face.len() - 1)
                        .map(|k| [face[0], face[k], face[k + 1]])
                        .filter(|[a, b, c]| a != b && b != c && c != a),
                );
            } else {
                let sum = walk
                    .iter()
                    .fold(Vector3::zeros(), |acc, &i| acc + vertices[i as usize].coords);
                let center = vertices.len() as u32;
                vertices.push(Point3::from(sum / walk.len() as Real));
                triangles.extend(directed.into_iter().map(|(u, v)| [center, u, v]));
            }
        }

        IndexedTriangles { vertices, triangles, t_junctions }
    }

    /// Topology of this mesh welded at the crate [`tolerance`].
    pub fn topology(&self) -> TopologyReport {
        self.to_indexed(tolerance()).topology()
    }

    /// Checks if the Mesh is a closed, consistently oriented 2-manifold.
    pub fn is_manifold(&self) -> bool {
        self.topology().is_manifold()
    }
}

impl IndexedTriangles {
    pub fn triangle(&self, index: usize) -> [Point3<Real>; 3] {
        self.triangles[index].map(|i| self.vertices[i as usize])
    }

    /// Enclosed volume by the divergence theorem; positive for outward winding.
    pub fn signed_volume(&self) -> Real {
        (0..self.triangles.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
            })
            .sum()
    }

    pub fn surface_area(&self) -> Real {
        (0..self.triangles.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                (b - a).cross(&(c - a)).norm() * 0.5
            })
            .sum()
    }

    /// Analyse closedness, orientation, components and Euler characteristic.
    pub fn topology(&self) -> TopologyReport {
        // (forward, backward) use counts keyed by (min, max) vertex
        let mut edge_uses: HashMap<(u32, u32), (u32, u32)> = HashMap::new();
        for tri in &self.triangles {
            for k in 0..3 {
                let (u, v) = (tri[k], tri[(k + 1) % 3]);
                if u == v {
                    continue;
                }
                let entry = edge_uses.entry((u.min(v), u.max(v))).or_insert((0, 0));
                if u < v {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
        }
        let faces = self.triangles.len();

        let mut boundary_edges = 0;
        let mut inconsistent_edges = 0;
        let mut non_manifold_edges = 0;
        let mut parent: Vec<u32> = (0..self.vertices.len() as u32).collect();
        let mut used = vec![false; self.vertices.len()];

        fn find(parent: &mut [u32], mut x: u32) -> u32 {
            while parent[x as usize] != x {
                parent[x as usize] = parent[parent[x as usize] as usize];
                x = parent[x as usize];
            }
            x
        }

        for (&(a, b), &(forward, backward)) in &edge_uses {
            let total = forward + backward;
            if total == 1 {
                boundary_edges += 1;
            } else if forward != backward {
                inconsistent_edges += 1;
            }
            if total > 2 {
                non_manifold_edges += 1;
            }
            used[a as usize] = true;
            used[b as usize] = true;
            let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
            if ra != rb {
                parent[ra.max(rb) as usize] = ra.min(rb);
            }
        }

        let vertex_count = used.iter().filter(|&&u| u).count();
        let components = (0..self.vertices.len() as u32)
            .filter(|&i| used[i as usize] && find(&mut parent, i) == i)
            .count();
        let edges = edge_uses.len();

        TopologyReport {
            vertices: vertex_count,
            edges,
            faces,
            boundary_edges,
            inconsistent_edges,
            non_manifold_edges,
            t_junctions: self.t_junctions,
            components,
            euler_characteristic: vertex_count as i64 - edges as i64 + faces as i64,
            signed_volume: self.signed_volume(),
            surface_area: self.surface_area(),
        }
    }
}
