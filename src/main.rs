//! Terminal world viewer.
//!
//! Renders a rectangle of generated chunks as ASCII, one glyph per tile.
//! Mostly a debugging aid for eyeballing biome shapes, rivers, and
//! villages at a given seed.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use tilelands::world::{ChunkLoader, WorldMap};
use tilelands::{GenerationConfig, TerrainType};

#[derive(Parser, Debug)]
#[command(name = "tilelands", about = "Render generated terrain as ASCII")]
struct Cli {
    /// World seed
    #[arg(long, default_value_t = 2137)]
    seed: u64,

    /// Width of the rendered area, in chunks
    #[arg(long, default_value_t = 4)]
    width: i32,

    /// Height of the rendered area, in chunks
    #[arg(long, default_value_t = 2)]
    height: i32,

    /// Chunk x coordinate of the top-left corner
    #[arg(long, default_value_t = 0)]
    cx: i32,

    /// Chunk y coordinate of the top-left corner
    #[arg(long, default_value_t = 0)]
    cy: i32,

    /// Village spawn probability per chunk
    #[arg(long, default_value_t = 0.03)]
    village_density: f64,

    /// Generate on background workers instead of inline
    #[arg(long)]
    background: bool,
}

fn glyph(terrain: TerrainType) -> char {
    match terrain {
        TerrainType::Grass => '.',
        TerrainType::TallGrass => ',',
        TerrainType::Forest => 't',
        TerrainType::DeepForest => 'T',
        TerrainType::Water => '~',
        TerrainType::ShallowWater => '-',
        TerrainType::Sand => ':',
        TerrainType::Rock => 'r',
        TerrainType::Mountain => '^',
        TerrainType::Snow => '*',
        TerrainType::Lava => '!',
        TerrainType::Basalt => 'b',
        TerrainType::Cliff => '#',
        TerrainType::Swamp => '%',
        TerrainType::Path => '=',
        TerrainType::House => 'H',
        TerrainType::VillageCenter => '@',
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = GenerationConfig {
        world_seed: cli.seed,
        village_density: cli.village_density,
        ..Default::default()
    };

    let map = match WorldMap::new(config) {
        Ok(map) => Arc::new(map),
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    if cli.background {
        let mut loader = ChunkLoader::new(Arc::clone(&map));
        let requests: Vec<(i32, i32, i32)> = (0..cli.height)
            .flat_map(|dy| (0..cli.width).map(move |dx| (cli.cx + dx, cli.cy + dy, dx * dx + dy * dy)))
            .collect();
        let total = requests.len();
        loader.request_batch(&requests);
        let mut done = 0;
        while done < total {
            done += loader.poll_ready(total - done).len();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        info!(chunks = total, workers = loader.worker_count(), "background generation finished");
    }

    let size = map.chunk_size();
    for ty in 0..cli.height * size {
        let mut line = String::with_capacity((cli.width * size) as usize);
        for tx in 0..cli.width * size {
            let terrain = map.terrain_at(cli.cx * size + tx, cli.cy * size + ty);
            line.push(glyph(terrain));
        }
        println!("{line}");
    }

    let mut villages = 0;
    for dy in 0..cli.height {
        for dx in 0..cli.width {
            if map.village_at(cli.cx + dx, cli.cy + dy).is_some() {
                villages += 1;
            }
        }
    }
    info!(
        chunks = map.loaded_chunk_count(),
        villages,
        seed = cli.seed,
        "rendered world view"
    );
}
