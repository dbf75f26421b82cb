/// Parser for the triangle subset of Wavefront OBJ
///
/// Only `v x y z` and `f a b c` records are read; every other record is
/// skipped. Face indices are one-based and must name an existing vertex.
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, opt},
    multi::many1,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::MeshError;
use crate::geometry::{Mesh, Triangle};
use crate::vector::Vec3;

/// Read and parse an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mesh = parse_obj(&text)?;
    info!(path = %path.display(), triangles = mesh.len(), "loaded mesh");
    Ok(mesh)
}

/// Parse OBJ text into a mesh
pub fn parse_obj(input: &str) -> Result<Mesh, MeshError> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (n, raw) in input.lines().enumerate() {
        let line = n + 1;
        let record = raw.trim();
        match record.split_whitespace().next() {
            Some("v") => {
                let (_, (x, y, z)) = parse_vertex(record).map_err(|_| MeshError::Parse {
                    line,
                    message: format!("malformed vertex `{}`", record),
                })?;
                let vertex = Vec3::new(x, y, z);
                if !vertex.is_finite() {
                    return Err(MeshError::Parse {
                        line,
                        message: format!("non-finite vertex `{}`", record),
                    });
                }
                vertices.push(vertex);
            }
            Some("f") => {
                let (_, indices) = parse_face(record).map_err(|_| MeshError::Parse {
                    line,
                    message: format!("malformed face `{}`", record),
                })?;
                faces.push((line, indices));
            }
            _ => {}
        }
    }

    // Faces are resolved after all vertices are known
    let mut mesh = Mesh::with_capacity(faces.len());
    for (line, indices) in faces {
        if indices.len() != 3 {
            return Err(MeshError::UnsupportedFace {
                line,
                vertices: indices.len(),
            });
        }
        let mut corners = [Vec3::ORIGIN; 3];
        for (corner, &i) in corners.iter_mut().zip(&indices) {
            *corner = resolve(&vertices, line, i)?;
        }
        mesh.add_triangle(Triangle::new(corners[0], corners[1], corners[2]));
    }

    Ok(mesh)
}

fn resolve(vertices: &[Vec3], line: usize, i: i64) -> Result<Vec3, MeshError> {
    usize::try_from(i)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| vertices.get(i).copied())
        .ok_or(MeshError::FaceIndexOutOfRange {
            line,
            index: i,
            vertex_count: vertices.len(),
        })
}

fn parse_vertex(input: &str) -> IResult<&str, (f32, f32, f32)> {
    all_consuming(terminated(
        preceded(
            tag("v"),
            tuple((
                preceded(space1, float),
                preceded(space1, float),
                preceded(space1, float),
            )),
        ),
        // Optional homogeneous weight, ignored
        pair(opt(preceded(space1, float)), space0),
    ))(input)
}

fn parse_face(input: &str) -> IResult<&str, Vec<i64>> {
    all_consuming(terminated(
        preceded(tag("f"), many1(preceded(space1, face_index))),
        space0,
    ))(input)
}

/// A vertex index, ignoring any `/texture/normal` suffix
fn face_index(input: &str) -> IResult<&str, i64> {
    terminated(
        index,
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}
