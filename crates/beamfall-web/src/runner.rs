use beamfall::{
    build_render_buffer, pack_frame, Engine, FrameHeader, HostEvent, HostQueue,
    ProtocolLayout, RenderBuffer,
};

/// Runner that wires the backdrop engine to the browser.
///
/// The host pushes events at any time; they are applied at the start of the
/// next tick. After each tick the whole frame (header, instances, events) sits
/// in one flat `f32` buffer the TypeScript side reads without copying.
pub struct BackdropRunner {
    engine: Engine,
    host: HostQueue,
    render_buffer: RenderBuffer,
    layout: ProtocolLayout,
    /// Packed frame, sized by `layout`.
    frame_buffer: Vec<f32>,
    frame_counter: u64,
}

impl BackdropRunner {
    pub fn new(engine: Engine) -> Self {
        let layout = ProtocolLayout::from_config(engine.config());
        let render_buffer = RenderBuffer::with_capacity(layout.max_instances);
        let mut runner = Self {
            engine,
            host: HostQueue::new(),
            render_buffer,
            frame_buffer: vec![0.0; layout.buffer_total_floats],
            layout,
            frame_counter: 0,
        };
        // The placeholder frame is readable before the first tick
        runner.pack();
        runner
    }

    /// Queue a host event for the next tick.
    pub fn push_host_event(&mut self, event: HostEvent) {
        self.host.push(event);
    }

    /// Run one frame: apply host events, advance the engine, repack the buffer.
    pub fn tick(&mut self, dt: f32) {
        for event in self.host.drain() {
            self.engine.apply_host_event(event);
        }

        self.engine.tick(dt);
        self.frame_counter += 1;
        self.pack();
    }

    fn pack(&mut self) {
        build_render_buffer(&self.engine.frame(), &mut self.render_buffer);

        let (surface_width, surface_height) = self
            .engine
            .surface()
            .map_or((0.0, 0.0), |s| (s.width, s.height));
        let header = FrameHeader {
            frame_counter: self.frame_counter,
            beam_split: self.render_buffer.beam_split,
            surface_width,
            surface_height,
            active: self.engine.is_active(),
            clock_secs: self.engine.now() as f32 / 1000.0,
        };
        pack_frame(
            &self.layout,
            &header,
            &self.render_buffer.instances,
            self.engine.events(),
            &mut self.frame_buffer,
        );
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    // ---- Pointer accessors for zero-copy reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame_buffer.as_ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.frame_buffer.len() as u32
    }

    pub fn frame(&self) -> &[f32] {
        &self.frame_buffer
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count().min(self.layout.max_instances as u32)
    }

    pub fn beam_split(&self) -> u32 {
        self.render_buffer.beam_split
    }

    pub fn event_count(&self) -> u32 {
        self.engine.events().len().min(self.layout.max_events) as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn instance_data_offset(&self) -> u32 {
        self.layout.instance_data_offset as u32
    }

    pub fn event_data_offset(&self) -> u32 {
        self.layout.event_data_offset as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamfall::bridge::protocol::{
        HEADER_ACTIVE, HEADER_BEAM_SPLIT, HEADER_EVENT_COUNT, HEADER_FRAME_COUNTER,
        HEADER_INSTANCE_COUNT, HEADER_SURFACE_HEIGHT,
    };
    use beamfall::{BeamRegistry, EngineConfig, EngineEvent, InstanceKind, RenderInstance, Surface};

    fn runner() -> BackdropRunner {
        BackdropRunner::new(Engine::with_seed(
            EngineConfig::default(),
            BeamRegistry::default_backdrop(),
        ))
    }

    #[test]
    fn placeholder_frame_is_packed_on_construction() {
        let r = runner();
        let frame = r.frame();
        assert_eq!(frame.len(), r.buffer_total_floats() as usize);
        assert_eq!(frame[HEADER_INSTANCE_COUNT], 20.0);
        assert_eq!(frame[HEADER_BEAM_SPLIT], 20.0);
        assert_eq!(frame[HEADER_ACTIVE], 0.0);
        let first = r.instance_data_offset() as usize;
        assert_eq!(frame[first + 5], InstanceKind::Beam.as_f32());
    }

    #[test]
    fn host_events_apply_on_next_tick() {
        let mut r = runner();
        r.push_host_event(HostEvent::SurfaceChanged(Surface::sized(1440.0, 900.0)));
        r.push_host_event(HostEvent::Ready);
        assert!(!r.engine().is_active());

        r.tick(1.0 / 60.0);
        assert!(r.engine().is_active());
        assert_eq!(r.frame()[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(r.frame()[HEADER_SURFACE_HEIGHT], 900.0);
        assert_eq!(r.frame()[HEADER_ACTIVE], 1.0);
    }

    #[test]
    fn collisions_reach_the_event_section() {
        let mut r = runner();
        r.push_host_event(HostEvent::SurfaceChanged(Surface::sized(1440.0, 900.0)));
        r.push_host_event(HostEvent::Ready);

        let mut found = false;
        for _ in 0..1200 {
            r.tick(1.0 / 60.0);
            let events = r.event_count() as usize;
            let start = r.event_data_offset() as usize;
            for i in 0..events {
                if r.frame()[start + i * EngineEvent::FLOATS] == EngineEvent::KIND_COLLISION {
                    found = true;
                }
            }
            if found {
                // Glow and particles follow the beams
                assert!(r.instance_count() > r.beam_split());
                let glow = r.instance_data_offset() as usize
                    + r.beam_split() as usize * RenderInstance::FLOATS;
                assert_eq!(r.frame()[glow + 5], InstanceKind::Glow.as_f32());
                break;
            }
        }
        assert!(found);
        assert_eq!(r.frame()[HEADER_EVENT_COUNT], r.event_count() as f32);
    }

    #[test]
    fn shutdown_empties_the_frame() {
        let mut r = runner();
        r.push_host_event(HostEvent::Ready);
        r.tick(0.1);
        r.push_host_event(HostEvent::Shutdown);
        r.tick(0.1);
        assert!(r.engine().is_shut_down());
        assert_eq!(r.frame()[HEADER_INSTANCE_COUNT], 0.0);
        assert_eq!(r.frame()[HEADER_ACTIVE], 0.0);
    }
}
