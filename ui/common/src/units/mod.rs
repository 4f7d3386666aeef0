pub mod distance;

pub use distance::{Distance, DistanceUnit};
