pub mod ember;
pub mod geometry;
pub mod rng;
pub mod spectrum;
pub mod sampling;
pub mod closure;
pub mod scene;
pub mod camera;
pub mod context;
pub mod buffers;
pub mod adaptive;
pub mod scheduler;
