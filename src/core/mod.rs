pub mod frame;
pub mod params;
pub mod scale;
pub mod style;
pub mod ticks;
pub mod units;

pub use frame::{Affine, Extent, FrameId, FrameTree, ReferenceFrame, Span};
pub use params::{ParamValue, Params};
pub use scale::{LinearScale, fit_domain};
pub use style::{Color, Font};
pub use ticks::{Ticks, format_genomic_position, format_number, nice_ticks, tick_target_count};
pub use units::{CM, INCH, MM, PT, parse_length};
