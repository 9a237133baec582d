//! Demonstration of surface extraction

use rust_voxel_caves::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("Generating caves...");

    for size in [CaveSize::Small, CaveSize::Medium, CaveSize::Large] {
        let config = CaveConfigBuilder::new()
            .seed("basalt")
            .size(size)
            .build()?;

        let cave = Cave::generate(config)?;
        let mesh = extract_cave_mesh(&cave, &BlockFaceExtractor::default());

        let mem = mesh.positions.len() * 12 + mesh.normals.len() * 12 + mesh.indices.len() * 4;

        println!(
            "{}: {} rooms, {} passages, {} vertices, {} triangles, {:.2} MB",
            size.name(),
            cave.room_count(),
            cave.passages().len(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            mem as f32 / 1024.0 / 1024.0
        );
    }

    Ok(())
}
