//! Trailreel renders an animated "reveal" of GPS walking routes over a
//! static map image.
//!
//! Starting from a full-map view, the engine zooms into a route's
//! bounding region, progressively uncovers pixels from a second
//! ("discovery") image along the walked path, overlays live distance and
//! elevation readouts, optionally intercuts photo zoom-ins at matching
//! waypoints, and zooms back out — producing an ordered sequence of
//! video frames that is streamed into a [`FrameSink`] (e.g. the bundled
//! ffmpeg MP4 sink).
//!
//! The typical flow:
//!
//! - Build a [`Canvas`] from a base map image, a same-sized discovery
//!   image, and the geographic corners of the mapped area
//! - Build one [`Route`] per walk from time-ordered track samples
//! - Run [`snake_path_discover`] with a validated [`DiscoverConfig`]
//! - Hand the accumulated frames to a sink with [`encode_frames`]
#![forbid(unsafe_code)]

pub mod canvas;
pub mod discover;
pub mod encode;
pub mod foundation;
pub mod geo;
pub mod overlay;
pub mod route;
pub mod viewport;

pub use canvas::Canvas;
pub use discover::{snake_path_discover, zoom_and_pan, DiscoverConfig, PhotoZoomParams};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use encode::sink::{encode_frames, FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{FrameIndex, GeoPoint, PixelIndex, Rgb8};
pub use foundation::error::{TrailreelError, TrailreelResult};
pub use geo::transform::DistanceUnit;
pub use overlay::distance::DistanceOverlay;
pub use overlay::elevation::{ElevationMode, ElevationOverlay};
pub use route::{PhotoCandidate, Route, RouteParams, Shape, TrackSample};
pub use viewport::ViewBox;
