//! # spanline
//!
//! An anti-aliased polygon and line rasterizer: vector outlines (filled
//! polygons with winding/even-odd rules) and stroked line segments of
//! arbitrary width become per-pixel coverage spans, handed to a consumer
//! callback for compositing.
//!
//! The crate ends at the span boundary. Producing outlines and blending
//! spans into a framebuffer are the caller's job.
//!
//! ## Architecture
//!
//! Rasterization is a three-stage pipeline:
//!
//! 1. **Input** — an [`outline::Outline`] of tagged vertices (line and cubic
//!    Bezier segments grouped into implicitly closed contours), or a raw
//!    segment plus a stroke width
//! 2. **Scan conversion** — curves are flattened ([`curve`]), edges are
//!    direction-normalized, clipped, and swept into spans
//!    ([`scan_converter`]); stroked segments take an exact analytic path
//!    instead ([`rasterizer`])
//! 3. **Output** — spans are batched ([`span::SpanBuffer`]) and flushed to a
//!    [`span::SpanConsumer`]
//!
//! All interior geometry is 16.16 fixed point ([`fixed::Fixed`]); outline
//! vertices cross into the converter on a 26.6 subpixel grid. Floating
//! point appears only at the public API boundary, so output is identical
//! across platforms.
//!
//! ## Example
//!
//! ```
//! use spanline::basics::{FillingRule, RectI};
//! use spanline::outline::Outline;
//! use spanline::rasterizer::Rasterizer;
//! use spanline::span::Span;
//!
//! let mut outline = Outline::new();
//! outline.move_to(0.0, 0.0);
//! outline.line_to(10.0, 0.0);
//! outline.line_to(0.0, 10.0);
//!
//! let mut rasterizer = Rasterizer::new();
//! rasterizer.clip_rect(RectI::new(0, 0, 63, 63));
//!
//! let mut spans: Vec<Span> = Vec::new();
//! let mut consumer = |batch: &[Span]| spans.extend_from_slice(batch);
//! rasterizer.rasterize(&outline, FillingRule::NonZero, &mut consumer);
//!
//! assert_eq!(spans.len(), 10);
//! ```

pub mod basics;
pub mod curve;
pub mod fixed;
pub mod outline;
pub mod rasterizer;
pub mod scan_converter;
pub mod span;
