pub mod browse;
pub mod channels;
pub mod health;
pub mod status;
pub mod video;
