mod scale;
mod vector;

pub use scale::{Range, Scale};
pub use vector::Vector;
