use bevy::prelude::Vec3;
use parry3d::{
    math::{Point, Real},
    shape::{SharedShape, TypedShape},
};

const SUBDIVISIONS: u32 = 5;

/// Vertices of ``shape`` in its local space.
///
/// Curved shapes are tessellated with a fixed amount of subdivisions. Returns ``None`` for shapes without a finite
/// set of vertices (half-spaces & custom shapes).
pub fn shape_vertices(shape: &SharedShape) -> Option<Vec<Vec3>> {
    let points = typed_shape_points(shape.as_typed_shape())?;

    Some(
        points
            .iter()
            .map(|point| Vec3::new(point.x, point.y, point.z))
            .collect(),
    )
}

fn typed_shape_points(shape: TypedShape) -> Option<Vec<Point<Real>>> {
    let points = match shape {
        TypedShape::Ball(ball) => ball.to_trimesh(SUBDIVISIONS, SUBDIVISIONS).0,
        TypedShape::Cuboid(cuboid) => cuboid.to_trimesh().0,
        TypedShape::Capsule(capsule) => capsule.to_trimesh(SUBDIVISIONS, SUBDIVISIONS).0,
        TypedShape::TriMesh(trimesh) => trimesh.vertices().to_vec(),
        TypedShape::HeightField(heightfield) => heightfield.to_trimesh().0,
        TypedShape::ConvexPolyhedron(polyhedron) => polyhedron.to_trimesh().0,
        TypedShape::Cylinder(cylinder) => cylinder.to_trimesh(SUBDIVISIONS).0,
        TypedShape::Cone(cone) => cone.to_trimesh(SUBDIVISIONS).0,
        TypedShape::RoundCuboid(round_cuboid) => round_cuboid.inner_shape.to_trimesh().0,
        TypedShape::RoundCylinder(round_cylinder) => {
            round_cylinder.inner_shape.to_trimesh(SUBDIVISIONS).0
        }
        TypedShape::RoundCone(round_cone) => round_cone.inner_shape.to_trimesh(SUBDIVISIONS).0,
        TypedShape::RoundConvexPolyhedron(round_polyhedron) => {
            round_polyhedron.inner_shape.to_trimesh().0
        }
        TypedShape::Triangle(triangle) => triangle.vertices().to_vec(),
        TypedShape::RoundTriangle(triangle) => triangle.inner_shape.vertices().to_vec(),
        TypedShape::Polyline(polyline) => polyline.vertices().to_vec(),
        TypedShape::Segment(segment) => vec![segment.a, segment.b],
        TypedShape::Compound(compound) => {
            let mut points = Vec::new();
            for (isometry, shape) in compound.shapes() {
                let Some(shape_points) = typed_shape_points(shape.as_typed_shape()) else {
                    continue;
                };
                points.extend(shape_points.iter().map(|point| isometry * point));
            }
            points
        }
        // This is like an infinite plane? It has no bounds.
        TypedShape::HalfSpace(_) => return None,
        TypedShape::Custom(_) => return None,
    };

    Some(points)
}
