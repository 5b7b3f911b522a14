pub mod camera;

pub use camera::{BalloonCamera, CameraPlugin, GreetingCamera};
