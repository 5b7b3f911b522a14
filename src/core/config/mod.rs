pub mod config;

pub use config::{
    AudioConfig, BalloonConfig, BoundaryConfig, GameConfig, GreetingConfig, InteractionConfig,
    ParticleConfig, PhysicsConfig, SpawnRange, WindowConfig,
};
