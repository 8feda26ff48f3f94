//! Charts drawn as resolution independent vector graphics.
//!
//! Every chart type implements [`Chart`] and produces an
//! [`ods_types::Drawing`] sized in points, ready to be placed by the layout
//! engine and serialized by the PDF renderer.

mod axes;
mod bar;
mod error;
mod format;
mod line;
mod pie;
mod scale;
mod text;
mod theme;

pub use bar::{Bar, BarChart};
pub use error::ChartError;
pub use format::NumberFormat;
pub use line::{LineChart, LineSeries, Marker, ReferenceLine};
pub use pie::{PieChart, Slice};
pub use scale::{LinearScale, nice_ticks};
pub use text::wrap_text;
pub use theme::ChartTheme;

use ods_types::{Drawing, Size};

pub trait Chart {
    /// Draws the chart into a drawing of exactly `size`.
    fn draw(&self, size: Size) -> Result<Drawing, ChartError>;
}
