pub mod drag;
pub mod geodesy;
pub mod lens;
pub mod projection;
pub mod vec;

pub use drag::*;
pub use geodesy::*;
pub use lens::*;
pub use projection::*;
pub use vec::*;
