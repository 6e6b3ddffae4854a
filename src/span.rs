//! Coverage span output: the consumer boundary and the batching buffer.

use crate::basics::{CoverType, RectI, COVER_FULL};

// ============================================================================
// Span
// ============================================================================

/// A horizontal run of pixels with uniform coverage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub x: i32,
    pub len: u32,
    pub y: i32,
    pub coverage: CoverType,
}

// ============================================================================
// SpanConsumer
// ============================================================================

/// Receives batches of rasterized spans.
///
/// Within one scanline spans arrive in increasing X order, and scanlines
/// arrive in increasing Y order. Where a batch boundary falls carries no
/// meaning; consumers must treat the concatenation of all batches as one
/// stream.
pub trait SpanConsumer {
    fn process_spans(&mut self, spans: &[Span]);
}

/// Closures work directly as consumers.
impl<F: FnMut(&[Span])> SpanConsumer for F {
    fn process_spans(&mut self, spans: &[Span]) {
        self(spans)
    }
}

// ============================================================================
// SpanBuffer
// ============================================================================

/// Capacity of the span batch buffer.
pub const SPAN_BUFFER_SIZE: usize = 256;

/// Fixed-capacity span batcher bound to a consumer for the duration of one
/// rasterize call.
///
/// Flushes to the consumer when full and once more on drop, so every exit
/// path delivers the buffered tail exactly once. Empty flushes are
/// suppressed.
pub struct SpanBuffer<'a> {
    spans: [Span; SPAN_BUFFER_SIZE],
    count: usize,
    clip_rect: RectI,
    consumer: &'a mut dyn SpanConsumer,
}

impl<'a> SpanBuffer<'a> {
    pub fn new(consumer: &'a mut dyn SpanConsumer, clip_rect: RectI) -> SpanBuffer<'a> {
        SpanBuffer {
            spans: [Span::default(); SPAN_BUFFER_SIZE],
            count: 0,
            clip_rect,
            consumer,
        }
    }

    /// Appends one span. Zero-length and zero-coverage spans are dropped;
    /// everything else must already lie inside the clip rectangle.
    #[inline]
    pub fn add_span(&mut self, x: i32, len: i32, y: i32, coverage: u32) {
        if coverage == 0 || len <= 0 {
            return;
        }
        debug_assert!(coverage <= COVER_FULL as u32);
        debug_assert!(y >= self.clip_rect.y1 && y <= self.clip_rect.y2);
        debug_assert!(x >= self.clip_rect.x1);
        debug_assert!(x + len - 1 <= self.clip_rect.x2);

        self.spans[self.count] = Span {
            x,
            len: len as u32,
            y,
            coverage: coverage as CoverType,
        };
        self.count += 1;
        if self.count == SPAN_BUFFER_SIZE {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.count > 0 {
            self.consumer.process_spans(&self.spans[..self.count]);
            self.count = 0;
        }
    }
}

impl Drop for SpanBuffer<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn clip() -> RectI {
        RectI::new(0, 0, 1000, 1000)
    }

    #[test]
    fn test_drop_flushes_tail() {
        let mut out: Vec<Span> = Vec::new();
        {
            let mut consumer = |spans: &[Span]| out.extend_from_slice(spans);
            let mut buffer = SpanBuffer::new(&mut consumer, clip());
            buffer.add_span(3, 5, 7, 200);
        }
        assert_eq!(out, vec![Span { x: 3, len: 5, y: 7, coverage: 200 }]);
    }

    #[test]
    fn test_flushes_when_full() {
        let mut batches: Vec<usize> = Vec::new();
        let mut total = 0usize;
        {
            let mut consumer = |spans: &[Span]| {
                batches.push(spans.len());
                total += spans.len();
            };
            let mut buffer = SpanBuffer::new(&mut consumer, clip());
            for i in 0..SPAN_BUFFER_SIZE + 1 {
                buffer.add_span(i as i32 % 100, 1, i as i32 / 100, 255);
            }
        }
        assert_eq!(batches, vec![SPAN_BUFFER_SIZE, 1]);
        assert_eq!(total, SPAN_BUFFER_SIZE + 1);
    }

    #[test]
    fn test_suppresses_degenerate_spans() {
        let mut out: Vec<Span> = Vec::new();
        {
            let mut consumer = |spans: &[Span]| out.extend_from_slice(spans);
            let mut buffer = SpanBuffer::new(&mut consumer, clip());
            buffer.add_span(3, 0, 7, 255);
            buffer.add_span(3, -2, 7, 255);
            buffer.add_span(3, 5, 7, 0);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_flush_never_reaches_consumer() {
        let mut calls = 0usize;
        {
            let mut consumer = |_: &[Span]| calls += 1;
            let _buffer = SpanBuffer::new(&mut consumer, clip());
        }
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_preserves_order_across_batches() {
        let mut out: Vec<Span> = Vec::new();
        {
            let mut consumer = |spans: &[Span]| out.extend_from_slice(spans);
            let mut buffer = SpanBuffer::new(&mut consumer, clip());
            for i in 0..600 {
                buffer.add_span(i % 50, 1, i / 50, 100);
            }
        }
        assert_eq!(out.len(), 600);
        for (i, span) in out.iter().enumerate() {
            assert_eq!(span.x, i as i32 % 50);
            assert_eq!(span.y, i as i32 / 50);
        }
    }
}
