//! Example: Generate a connected cave
//!
//! Demonstrates the basic usage of the generation pipeline.
//! Run with `RUST_LOG=debug` to see every stage.

use rust_voxel_caves::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("Voxel Cave Generation Example");
    println!("=============================\n");

    let config = CaveConfigBuilder::new()
        .seed("granite")
        .size(CaveSize::Small)
        .fill_percent(48)?
        .thresholds(13, 13)?
        .smoothing_iterations(4)
        .pruning(20, 20)
        .passageway_radius(1)?
        .build()?;

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Dimensions: {:?}", config.dimensions());
    println!("  Fill: {}%", config.fill_percent);
    println!(
        "  Thresholds: death < {}, birth > {}",
        config.death_threshold, config.birth_threshold
    );
    println!("  Smoothing passes: {}", config.smoothing_iterations);
    println!();

    println!("Generating cave...");
    let cave = match Cave::generate(config) {
        Ok(cave) => cave,
        Err(CaveError::NoSurvivingRoom) => {
            println!("Every open region was pruned; try a lower fill percent or another seed.");
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let grid = cave.grid();
    println!("Statistics:");
    println!(
        "  Open cells: {} of {} ({:.1}%)",
        grid.open_count(),
        grid.len(),
        grid.open_count() as f32 / grid.len() as f32 * 100.0
    );
    println!("  Rooms: {}", cave.room_count());
    println!("  Passages: {}", cave.passages().len());
    println!();

    println!("Largest rooms:");
    for (index, room) in cave.rooms().iter().enumerate().take(5) {
        println!(
            "  Room {}: {} tiles, {} edge tiles, connected to {:?}",
            index,
            room.size(),
            room.edge_tiles.len(),
            room.connected_rooms
        );
    }

    println!(
        "\nSpawn tile {:?} at world position {}",
        cave.spawn_tile(),
        cave.spawn_position()
    );
    println!("\nGeneration complete!");

    Ok(())
}
