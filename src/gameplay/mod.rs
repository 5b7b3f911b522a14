pub mod balloons;
