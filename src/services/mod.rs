pub mod feedback;
pub mod location;
pub mod prediction;
pub mod visualization;
