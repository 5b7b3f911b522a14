//! Pop feedback: particle bursts and the pop sound. Both react to `BalloonPopped`
//! and never touch the balloon population.
pub mod audio;
pub mod particles;

pub use audio::{PopAudioPlugin, PopSound, PopVoice};
pub use particles::{ParticleAssets, ParticlesPlugin, PopParticle};
