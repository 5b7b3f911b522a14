pub mod camera;
pub mod greeting;
