// Elevation bands (normalized height in [0, 1])
pub const OCEAN_BAND_MAX: f64 = 0.30;
pub const LOWLAND_BAND_MAX: f64 = 0.60;
pub const HIGHLAND_BAND_MAX: f64 = 0.75;
pub const SWAMP_BAND_MAX: f64 = 0.35;

// Hydrology bands
pub const LAKE_DEEP_MAX_HEIGHT: f64 = 0.28;
pub const LAKE_SHORE_MAX_HEIGHT: f64 = 0.31;
pub const RIVER_BANK_EPSILON: f64 = 0.04;

// Biome noise sub-ranges, fixed order: Tundra, Forest, Plains, Desert
pub const TUNDRA_BAND_MAX: f64 = 0.25;
pub const FOREST_BAND_MAX: f64 = 0.50;
pub const PLAINS_BAND_MAX: f64 = 0.75;
// Above the mountain threshold the same biome value splits Mountains/Volcanic
pub const MOUNTAIN_VOLCANIC_SPLIT: f64 = 0.60;
// Half-width of the soft border between adjacent biome bands
pub const BLEND_MARGIN: f64 = 0.04;

// Settlement constants
pub const SETTLEMENT_MARGIN: i32 = 4;
pub const VILLAGE_FOOTPRINT: i32 = 5;
pub const MIN_VILLAGE_BUILDINGS: usize = 5;
pub const MAX_VILLAGE_BUILDINGS: usize = 10;
pub const MIN_BUILDING_SIZE: i32 = 3;
pub const MAX_BUILDING_SIZE: i32 = 4;
pub const ISOLATED_BUILDING_CHANCE: f64 = 0.08;
pub const MAX_ISOLATED_BUILDINGS: usize = 3;
pub const BUILDING_PLACEMENT_ATTEMPTS: usize = 200;
pub const PATH_NOISE_THRESHOLD: f64 = 0.22;
pub const PATH_RADIUS_PAD: f64 = 4.0;

// Smoothing parameters
pub const WATER_SMOOTH_MIN_NEIGHBORS: usize = 4;
pub const LAVA_SMOOTH_MIN_NEIGHBORS: usize = 3;
pub const ROCK_SMOOTH_MIN_NEIGHBORS: usize = 5;
pub const SWAMP_SMOOTH_MIN_NEIGHBORS: usize = 3;
pub const PATH_CONTINUITY_ITERATIONS: usize = 2;

// Noise coordinates are clamped here before scaling; beyond this the f32
// sampling grid loses integer resolution
pub const COORD_LIMIT: i32 = 1 << 24;

// Loader constants
pub const MAX_PENDING_CHUNKS: usize = 256;
pub const RESULT_QUEUE_CAPACITY: usize = 64;
