//! Shared frame buffer layout.
//! Must stay in sync with the TypeScript reader.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 12 floats]
//! [Instances: max_instances × 8 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header every frame.
//! TypeScript reads them from the header to compute offsets dynamically.

use crate::api::config::EngineConfig;
use crate::api::types::EngineEvent;
use crate::renderer::instance::RenderInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 12;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_BEAM_SPLIT: usize = 4;
pub const HEADER_MAX_EVENTS: usize = 5;
pub const HEADER_EVENT_COUNT: usize = 6;
pub const HEADER_SURFACE_WIDTH: usize = 7;
pub const HEADER_SURFACE_HEIGHT: usize = 8;
pub const HEADER_ACTIVE: usize = 9;
pub const HEADER_CLOCK_SECS: usize = 10;
pub const HEADER_DROPPED: usize = 11;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per render instance (fixed by the wire format).
pub const INSTANCE_FLOATS: usize = RenderInstance::FLOATS;

/// Floats per engine event: kind, a, b, c (fixed by the wire format).
pub const EVENT_FLOATS: usize = EngineEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum render instances.
    pub max_instances: usize,
    /// Maximum engine events per frame.
    pub max_events: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_events: usize) -> Self {
        let instance_data_offset = HEADER_FLOATS;
        let event_data_offset = instance_data_offset + max_instances * INSTANCE_FLOATS;
        let buffer_total_floats = event_data_offset + max_events * EVENT_FLOATS;

        Self {
            max_instances,
            max_events,
            instance_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from an EngineConfig.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_instances, config.max_events)
    }
}

/// Per-frame scalar state written into the header.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameHeader {
    pub frame_counter: u64,
    pub beam_split: u32,
    pub surface_width: f32,
    pub surface_height: f32,
    pub active: bool,
    pub clock_secs: f32,
}

/// Write one frame into `out`, resizing it to the layout.
/// Instances and events beyond capacity are dropped; the number of dropped
/// records is written to the header. Returns `(instances, events)` written.
pub fn pack_frame(
    layout: &ProtocolLayout,
    header: &FrameHeader,
    instances: &[RenderInstance],
    events: &[EngineEvent],
    out: &mut Vec<f32>,
) -> (usize, usize) {
    out.clear();
    out.resize(layout.buffer_total_floats, 0.0);

    let instance_count = instances.len().min(layout.max_instances);
    let event_count = events.len().min(layout.max_events);
    let dropped = (instances.len() - instance_count) + (events.len() - event_count);
    if dropped > 0 {
        log::debug!("frame {}: dropped {} records over capacity", header.frame_counter, dropped);
    }

    out[HEADER_FRAME_COUNTER] = header.frame_counter as f32;
    out[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    out[HEADER_MAX_INSTANCES] = layout.max_instances as f32;
    out[HEADER_INSTANCE_COUNT] = instance_count as f32;
    out[HEADER_BEAM_SPLIT] = header.beam_split.min(instance_count as u32) as f32;
    out[HEADER_MAX_EVENTS] = layout.max_events as f32;
    out[HEADER_EVENT_COUNT] = event_count as f32;
    out[HEADER_SURFACE_WIDTH] = header.surface_width;
    out[HEADER_SURFACE_HEIGHT] = header.surface_height;
    out[HEADER_ACTIVE] = if header.active { 1.0 } else { 0.0 };
    out[HEADER_CLOCK_SECS] = header.clock_secs;
    out[HEADER_DROPPED] = dropped as f32;

    let instance_floats: &[f32] = bytemuck::cast_slice(&instances[..instance_count]);
    let start = layout.instance_data_offset;
    out[start..start + instance_floats.len()].copy_from_slice(instance_floats);

    let event_floats: &[f32] = bytemuck::cast_slice(&events[..event_count]);
    let start = layout.event_data_offset;
    out[start..start + event_floats.len()].copy_from_slice(event_floats);

    (instance_count, event_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&EngineConfig::default());
        assert_eq!(layout.max_instances, 512);
        assert_eq!(layout.max_events, 64);
        assert_eq!(layout.instance_data_offset, HEADER_FLOATS);
        assert_eq!(layout.event_data_offset, HEADER_FLOATS + 512 * 8);
        assert_eq!(layout.buffer_total_floats, HEADER_FLOATS + 512 * 8 + 64 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn pack_writes_header_and_sections() {
        let layout = ProtocolLayout::new(4, 2);
        let header = FrameHeader {
            frame_counter: 7,
            beam_split: 1,
            surface_width: 800.0,
            surface_height: 600.0,
            active: true,
            clock_secs: 2.5,
        };
        let instances = [RenderInstance { x: 3.0, ..Default::default() }; 2];
        let events = [EngineEvent { kind: 1.0, a: 10.0, b: 600.0, c: 0.0 }];

        let mut out = Vec::new();
        let written = pack_frame(&layout, &header, &instances, &events, &mut out);

        assert_eq!(written, (2, 1));
        assert_eq!(out.len(), layout.buffer_total_floats);
        assert_eq!(out[HEADER_FRAME_COUNTER], 7.0);
        assert_eq!(out[HEADER_INSTANCE_COUNT], 2.0);
        assert_eq!(out[HEADER_ACTIVE], 1.0);
        assert_eq!(out[layout.instance_data_offset], 3.0);
        assert_eq!(out[layout.instance_data_offset + INSTANCE_FLOATS], 3.0);
        assert_eq!(out[layout.event_data_offset + 2], 600.0);
    }

    #[test]
    fn pack_truncates_to_capacity() {
        let layout = ProtocolLayout::new(1, 1);
        let instances = [RenderInstance::default(); 3];
        let events = [EngineEvent::default(); 2];
        let mut out = Vec::new();
        let written = pack_frame(&layout, &FrameHeader::default(), &instances, &events, &mut out);
        assert_eq!(written, (1, 1));
        assert_eq!(out[HEADER_DROPPED], 3.0);
    }
}
