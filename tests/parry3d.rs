use bevy::prelude::{Transform, Vec3};
use oxidized_navgrid::{
    clear_nav_mesh,
    document::NavMeshDocument,
    error::NavGridError,
    export_nav_mesh, generate_nav_mesh,
    host::{NavMeshKind, SceneHost},
    parry::{ParrySceneHost, SurfaceId},
    selection::SurfaceSelection,
    NavGridSettings,
};
use parry3d::shape::SharedShape;

struct TestWorld {
    host: ParrySceneHost,
    ground: SurfaceId,
    ceiling: SurfaceId,
}

fn setup_world() -> TestWorld {
    let mut host = ParrySceneHost::new();

    // Plane
    let ground = host.add_surface(Transform::IDENTITY, SharedShape::cuboid(10.0, 10.0, 0.1));

    // Cube
    host.add_surface(
        Transform::from_xyz(-5.0, -5.0, 1.25),
        SharedShape::cuboid(1.25, 1.25, 1.25),
    );

    // Low ceiling over the x=4..6 columns.
    let ceiling = host.add_surface(
        Transform::from_xyz(5.0, 0.0, 1.5),
        SharedShape::cuboid(1.5, 12.0, 0.1),
    );

    TestWorld {
        host,
        ground,
        ceiling,
    }
}

fn nav_grid_settings() -> NavGridSettings {
    // Probe starts below the ceiling so it doesn't shadow the ground.
    NavGridSettings::from_agent(0.5, 2.0)
        .with_cell_size(1.0)
        .with_probe_height(1.0)
}

#[test]
fn test_generation_classifies_ground() {
    let TestWorld {
        mut host,
        ground,
        ceiling,
    } = setup_world();
    let selection = SurfaceSelection::new(ground).with_walls([ceiling]);

    let report = generate_nav_mesh(&mut host, &selection, &nav_grid_settings()).unwrap();

    assert!(report.walkable_samples > 0);
    assert!(report.blocked_samples > 0);
    assert!(report.walkable_samples + report.blocked_samples <= 21 * 21);

    let walkable = host.nav_mesh(NavMeshKind::Walkable).unwrap();
    let blocked = host.nav_mesh(NavMeshKind::Blocked).unwrap();

    // Samples sit on top of the plane.
    assert!(walkable
        .vertices
        .iter()
        .all(|vertex| (vertex.z - 0.1).abs() < 1e-4));
    assert!(blocked
        .vertices
        .iter()
        .all(|vertex| (4.0..=6.0).contains(&vertex.x)));
    assert!(walkable
        .vertices
        .iter()
        .all(|vertex| !(4.0..=6.0).contains(&vertex.x)));
    // The cube shadows the ground below it.
    assert!(!walkable
        .vertices
        .iter()
        .any(|vertex| vertex.x == -5.0 && vertex.y == -5.0));

    assert_eq!(walkable.find_invalid_index(), None);
    assert_eq!(blocked.find_invalid_index(), None);
    assert!(!blocked.is_empty());
}

#[test]
fn test_ceiling_without_wall_is_walkable() {
    let TestWorld {
        mut host, ground, ..
    } = setup_world();

    let report = generate_nav_mesh(
        &mut host,
        &SurfaceSelection::new(ground),
        &nav_grid_settings(),
    )
    .unwrap();

    assert_eq!(report.blocked_samples, 0);
    assert!(host.nav_mesh(NavMeshKind::Blocked).is_none());
}

#[test]
fn test_export_round_trip() {
    let TestWorld {
        mut host,
        ground,
        ceiling,
    } = setup_world();
    let selection = SurfaceSelection::new(ground).with_walls([ceiling]);
    let export_path = std::env::temp_dir().join("oxidized_navgrid_export_round_trip.json");
    let nav_grid_settings = nav_grid_settings().with_export_path(&export_path);

    generate_nav_mesh(&mut host, &selection, &nav_grid_settings).unwrap();
    let report = export_nav_mesh(&mut host, &nav_grid_settings).unwrap();

    let json = std::fs::read_to_string(&export_path).unwrap();
    let _ = std::fs::remove_file(&export_path);

    let document = NavMeshDocument::from_json(&json).unwrap();
    let walkable = host.nav_mesh(NavMeshKind::Walkable).unwrap();

    assert_eq!(report.vertex_count, walkable.vertices.len());
    assert_eq!(report.triangle_count, walkable.triangles.len());
    assert_eq!(document.vertices.len(), walkable.vertices.len());
    assert_eq!(document.triangles.len(), walkable.triangles.len());
    assert_eq!(document.adjacency.len(), walkable.triangles.len());
    assert_eq!(document.adjacency.find_asymmetry(), None);

    // Z-up internally, Y-up in the document.
    assert!(document
        .vertices
        .iter()
        .all(|vertex| (vertex.y - 0.1).abs() < 1e-4));

    let reparsed = NavMeshDocument::from_json(&document.to_json(true).unwrap()).unwrap();
    assert_eq!(reparsed, document);

    assert!(document.find_triangle_at(Vec3::new(0.5, 0.0, 0.5)).is_some());
    // Under the cube & the ceiling there is no walkable triangle.
    assert!(document.find_triangle_at(Vec3::new(-5.0, 0.0, -5.0)).is_none());
    assert!(document.find_triangle_at(Vec3::new(5.0, 0.0, 0.0)).is_none());
}

#[test]
fn test_covered_ground_has_no_walkable_area() {
    let TestWorld {
        mut host, ground, ..
    } = setup_world();
    let roof = host.add_surface(
        Transform::from_xyz(0.0, 0.0, 5.0),
        SharedShape::cuboid(15.0, 15.0, 0.5),
    );

    generate_nav_mesh(
        &mut host,
        &SurfaceSelection::new(ground),
        &nav_grid_settings(),
    )
    .unwrap();

    // Default probe height starts above the roof.
    let result = generate_nav_mesh(
        &mut host,
        &SurfaceSelection::new(ground).with_walls([roof]),
        &NavGridSettings::default(),
    );

    assert!(matches!(result, Err(NavGridError::NoWalkableArea)));
    assert!(host.nav_mesh(NavMeshKind::Walkable).is_none());
    assert!(matches!(
        export_nav_mesh(&mut host, &NavGridSettings::default()),
        Err(NavGridError::NoWalkableMesh)
    ));
}

#[test]
fn test_removed_ground_is_empty() {
    let TestWorld {
        mut host, ground, ..
    } = setup_world();
    assert!(host.remove_surface(ground));

    let result = generate_nav_mesh(
        &mut host,
        &SurfaceSelection::new(ground),
        &nav_grid_settings(),
    );

    assert!(matches!(result, Err(NavGridError::EmptyGround)));
}

#[test]
fn test_scaled_transform_is_ignored() {
    let mut host = ParrySceneHost::new();
    let ground = host.add_surface(
        Transform::IDENTITY.with_scale(Vec3::splat(3.0)),
        SharedShape::cuboid(2.0, 2.0, 0.1),
    );

    let report = generate_nav_mesh(
        &mut host,
        &SurfaceSelection::new(ground),
        &nav_grid_settings(),
    )
    .unwrap();

    assert_eq!(report.grid_width, 5);
    assert_eq!(report.grid_height, 5);

    clear_nav_mesh(&mut host);
    assert!(host.nav_mesh(NavMeshKind::Walkable).is_none());
}
