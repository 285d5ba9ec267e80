/// Wavefront OBJ/MTL parser producing rasterizer-ready models
use nom::{
    character::complete::{char, i32 as index, multispace0, multispace1},
    combinator::opt,
    multi::many1,
    number::complete::float,
    sequence::{pair, preceded},
    IResult,
};

use crate::geometry::{Material, Mesh, Model, Vertex};
use crate::vector::{Vec2, Vec3};

/// One `v/vt/vn` reference within a face, before index resolution
#[derive(Debug, Clone, Copy)]
struct FaceIndex {
    position: i32,
    texcoord: Option<i32>,
    normal: Option<i32>,
}

/// Parse an OBJ document, resolving material names against an optional MTL
/// document.
///
/// Supports `v`, `vt`, `vn`, `f` (polygon faces are fan-triangulated;
/// indices may be 1-based or negative), `usemtl`, and tolerates the other
/// directives. Faces are expanded into the flat vertex-triple layout of
/// [`Mesh`], so every produced mesh has a vertex count divisible by 3.
pub fn parse_obj(obj: &str, mtl: Option<&str>) -> Result<Model, String> {
    let materials = match mtl {
        Some(source) => parse_mtl(source)?,
        None => Vec::new(),
    };

    let mut positions: Vec<Vec3> = Vec::new();
    let mut texcoords: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut meshes: Vec<Mesh> = Vec::new();
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut material = Material::default();

    for (line_number, raw_line) in obj.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (keyword, data) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match keyword {
            "v" => positions.push(parse_vector3(data, line_number)?),
            "vt" => texcoords.push(parse_vector2(data, line_number)?),
            "vn" => normals.push(parse_vector3(data, line_number)?),
            "f" => {
                let face = parse_face(data, line_number)?;
                triangulate(&face, &positions, &texcoords, &normals, &mut vertices)?;
            }
            "usemtl" => {
                // A material switch starts a new mesh for the triangles
                // that follow.
                if !vertices.is_empty() {
                    meshes.push(Mesh::new(std::mem::take(&mut vertices), material));
                }
                let name = data.trim();
                material = materials
                    .iter()
                    .find(|candidate| candidate.name == name)
                    .cloned()
                    .unwrap_or_else(|| Material::new(name, Vec3::new(1.0, 1.0, 1.0)));
            }
            // Object/group structure, smoothing, and library references do
            // not affect wireframe geometry.
            "o" | "g" | "s" | "mtllib" | "l" | "p" => {}
            _ => {}
        }
    }

    if !vertices.is_empty() {
        meshes.push(Mesh::new(vertices, material));
    }

    Ok(Model::new(meshes))
}

/// Parse an MTL document into its materials (`newmtl` and `Kd`; other keys
/// are skipped)
pub fn parse_mtl(input: &str) -> Result<Vec<Material>, String> {
    let mut materials: Vec<Material> = Vec::new();

    for (line_number, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (keyword, data) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match keyword {
            "newmtl" => materials.push(Material::new(data.trim(), Vec3::new(1.0, 1.0, 1.0))),
            "Kd" => {
                let diffuse = parse_vector3(data, line_number)?;
                match materials.last_mut() {
                    Some(current) => current.diffuse = diffuse,
                    None => {
                        return Err(format!(
                            "MTL line {}: Kd before any newmtl",
                            line_number + 1
                        ))
                    }
                }
            }
            _ => {}
        }
    }

    Ok(materials)
}

fn parse_vector3(data: &str, line_number: usize) -> Result<Vec3, String> {
    match parse_float3(data) {
        Ok((_, (x, y, z))) => Ok(Vec3::new(x, y, z)),
        Err(e) => Err(format!("line {}: {:?}", line_number + 1, e)),
    }
}

fn parse_vector2(data: &str, line_number: usize) -> Result<Vec2, String> {
    match parse_float2(data) {
        Ok((_, (x, y))) => Ok(Vec2::new(x, y)),
        Err(e) => Err(format!("line {}: {:?}", line_number + 1, e)),
    }
}

fn parse_face(data: &str, line_number: usize) -> Result<Vec<FaceIndex>, String> {
    match parse_index_groups(data) {
        Ok((_, face)) if face.len() >= 3 => Ok(face),
        Ok(_) => Err(format!(
            "line {}: face needs at least 3 vertices",
            line_number + 1
        )),
        Err(e) => Err(format!("line {}: {:?}", line_number + 1, e)),
    }
}

fn parse_float3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

fn parse_float2(input: &str) -> IResult<&str, (f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    // A third texture component is legal; ignore it.
    let (input, _) = opt(preceded(multispace1, float))(input)?;
    Ok((input, (x, y)))
}

fn parse_index_groups(input: &str) -> IResult<&str, Vec<FaceIndex>> {
    many1(preceded(multispace0, parse_index_group))(input)
}

/// Accepts the four OBJ reference forms: `v`, `v/vt`, `v//vn`, `v/vt/vn`
fn parse_index_group(input: &str) -> IResult<&str, FaceIndex> {
    let (input, position) = index(input)?;
    let (input, rest) = opt(preceded(
        char('/'),
        pair(opt(index), opt(preceded(char('/'), index))),
    ))(input)?;

    let (texcoord, normal) = match rest {
        Some((texcoord, normal)) => (texcoord, normal),
        None => (None, None),
    };

    Ok((
        input,
        FaceIndex {
            position,
            texcoord,
            normal,
        },
    ))
}

/// Fan-triangulates one face and appends the de-indexed vertices
fn triangulate(
    face: &[FaceIndex],
    positions: &[Vec3],
    texcoords: &[Vec2],
    normals: &[Vec3],
    vertices: &mut Vec<Vertex>,
) -> Result<(), String> {
    for i in 1..face.len() - 1 {
        for corner in [face[0], face[i], face[i + 1]] {
            vertices.push(resolve_vertex(corner, positions, texcoords, normals)?);
        }
    }
    Ok(())
}

fn resolve_vertex(
    corner: FaceIndex,
    positions: &[Vec3],
    texcoords: &[Vec2],
    normals: &[Vec3],
) -> Result<Vertex, String> {
    let position = positions[resolve_index(corner.position, positions.len())?];

    let texcoord = match corner.texcoord {
        Some(i) => texcoords[resolve_index(i, texcoords.len())?],
        None => Vec2::zero(),
    };

    let normal = match corner.normal {
        Some(i) => normals[resolve_index(i, normals.len())?],
        None => Vec3::zero(),
    };

    Ok(Vertex::new(position, normal, texcoord))
}

/// Maps a 1-based (or negative, end-relative) OBJ index to a vector offset
fn resolve_index(index: i32, len: usize) -> Result<usize, String> {
    if index > 0 && index as usize <= len {
        Ok(index as usize - 1)
    } else if index < 0 && index.unsigned_abs() as usize <= len {
        Ok(len - index.unsigned_abs() as usize)
    } else {
        Err(format!("face index {} out of range", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "\
# a single triangle
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";

    #[test]
    fn test_parse_single_triangle() {
        let model = parse_obj(TRIANGLE_OBJ, None).unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.triangle_count(), 1);
        let mesh = &model.meshes[0];
        assert_eq!(mesh.vertices[1].position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.material.name, "default");
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let model = parse_obj(obj, None).unwrap();
        assert_eq!(model.triangle_count(), 2);
        let mesh = &model.meshes[0];
        // Fan: (1,2,3) then (1,3,4), both anchored at the first corner.
        assert_eq!(mesh.vertices[0].position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[3].position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[5].position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_index_forms_and_attributes() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.5 0.25
vn 0 0 1
f 1/1/1 2//1 3/1
";
        let model = parse_obj(obj, None).unwrap();
        let mesh = &model.meshes[0];
        assert_eq!(mesh.vertices[0].texcoord, Vec2::new(0.5, 0.25));
        assert_eq!(mesh.vertices[0].normal, Vec3::new(0.0, 0.0, 1.0));
        // `v//vn` leaves the texcoord at zero.
        assert_eq!(mesh.vertices[1].texcoord, Vec2::zero());
        assert_eq!(mesh.vertices[1].normal, Vec3::new(0.0, 0.0, 1.0));
        // `v/vt` leaves the normal at zero.
        assert_eq!(mesh.vertices[2].normal, Vec3::zero());
    }

    #[test]
    fn test_negative_indices_resolve_from_end() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let model = parse_obj(obj, None).unwrap();
        let mesh = &model.meshes[0];
        assert_eq!(mesh.vertices[0].position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[2].position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let obj = "\
v 0 0 0
f 1 2 3
";
        let error = parse_obj(obj, None).unwrap_err();
        assert!(error.contains("out of range"));
    }

    #[test]
    fn test_usemtl_resolves_against_mtl() {
        let mtl = "\
newmtl red
Kd 1.0 0.0 0.0
newmtl half_grey
Kd 0.5 0.5 0.5
";
        let obj = "\
mtllib scene.mtl
v 0 0 0
v 1 0 0
v 0 1 0
usemtl red
f 1 2 3
usemtl half_grey
f 1 2 3
f 1 2 3
";
        let model = parse_obj(obj, Some(mtl)).unwrap();
        assert_eq!(model.meshes.len(), 2);
        assert_eq!(model.meshes[0].material.name, "red");
        assert_eq!(model.meshes[0].material.diffuse, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(model.meshes[1].material.name, "half_grey");
        assert_eq!(model.meshes[1].triangle_count(), 2);
    }

    #[test]
    fn test_unknown_material_falls_back_to_white() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
usemtl missing
f 1 2 3
";
        let model = parse_obj(obj, None).unwrap();
        assert_eq!(model.meshes[0].material.name, "missing");
        assert_eq!(model.meshes[0].material.diffuse, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_mtl_kd_before_newmtl_is_an_error() {
        assert!(parse_mtl("Kd 1 0 0\n").is_err());
    }

    #[test]
    fn test_vertex_counts_stay_multiple_of_three() {
        let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
f 1 2 3 4 5
";
        let model = parse_obj(obj, None).unwrap();
        for mesh in &model.meshes {
            assert_eq!(mesh.vertices.len() % 3, 0);
        }
        assert_eq!(model.triangle_count(), 3);
    }
}
