pub mod journey_renderer;
pub use journey_renderer::JourneyRenderer;

pub mod surface;
pub use surface::{PixmapSurface, Surface};

pub mod utils;
