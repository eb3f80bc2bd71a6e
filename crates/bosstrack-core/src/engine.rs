use crate::error::{EngineError, EngineResult};
use crate::frame::Frame;
use crate::module::{Bus, Module, ModuleCtx, Resources};

use std::time::Instant;

/// Fixed-tick module host.
///
/// Game clients run at a fixed simulation rate (20 ticks/s is typical); every
/// module sees the same tick numbering through [`Frame::tick`].
pub struct Engine<E: Send + 'static> {
    fixed_dt: f32,
    modules: Vec<Box<dyn Module<E>>>,

    resources: Resources,
    bus: Bus<E>,

    exit_requested: bool,

    frame_index: u64,
    tick: u64,
    last: Instant,
    acc: f32,
}

impl<E: Send + 'static> Engine<E> {
    pub fn new(fixed_dt_ms: u32, bus: Bus<E>) -> EngineResult<Self> {
        if fixed_dt_ms == 0 {
            return Err(EngineError::Config("fixed_dt_ms must be > 0".into()));
        }
        Ok(Self {
            fixed_dt: fixed_dt_ms as f32 / 1000.0,
            modules: Vec::new(),
            resources: Resources::default(),
            bus,
            exit_requested: false,
            frame_index: 0,
            tick: 0,
            last: Instant::now(),
            acc: 0.0,
        })
    }

    /// Host-owned handles (e.g. an in-process music director) must be inserted before modules are registered.
    #[inline]
    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    #[inline]
    pub fn bus(&self) -> &Bus<E> {
        &self.bus
    }

    /// Number of fixed ticks executed so far.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn register_module(&mut self, mut module: Box<dyn Module<E>>) -> EngineResult<()> {
        let mut ctx = ModuleCtx::new(&mut self.resources, &self.bus);
        module.init(&mut ctx)?;
        log::debug!(target: "engine", "module registered: {}", module.id());
        self.modules.push(module);
        Ok(())
    }

    pub fn start(&mut self) -> EngineResult<()> {
        for m in &mut self.modules {
            let mut ctx = ModuleCtx::new(&mut self.resources, &self.bus);
            m.start(&mut ctx)?;
        }
        self.last = Instant::now();
        Ok(())
    }

    /// Advance from the wall clock: runs as many fixed ticks as have elapsed, then one `update`.
    pub fn step(&mut self) -> EngineResult<Frame> {
        if self.exit_requested {
            return Err(EngineError::ExitRequested);
        }

        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;

        // A long stall (debugger, world load) must not turn into a burst of catch-up ticks.
        self.acc = (self.acc + dt).min(self.fixed_dt * 8.0);

        let mut fixed_steps = 0u32;
        while self.acc >= self.fixed_dt {
            self.acc -= self.fixed_dt;
            fixed_steps += 1;
            self.fixed_step(dt, fixed_steps)?;
        }

        let frame = self.frame(dt, fixed_steps);
        for m in &mut self.modules {
            let mut ctx = ModuleCtx::new(&mut self.resources, &self.bus);
            m.update(&mut ctx, &frame)?;
        }

        self.frame_index = self.frame_index.wrapping_add(1);
        Ok(frame)
    }

    /// Advance exactly `count` fixed ticks, ignoring the wall clock.
    ///
    /// Headless hosts and tests drive the simulation through this.
    pub fn run_ticks(&mut self, count: u32) -> EngineResult<()> {
        for _ in 0..count {
            if self.exit_requested {
                return Err(EngineError::ExitRequested);
            }
            self.fixed_step(self.fixed_dt, 1)?;
            self.frame_index = self.frame_index.wrapping_add(1);
        }
        Ok(())
    }

    fn fixed_step(&mut self, dt: f32, fixed_steps: u32) -> EngineResult<()> {
        let frame = self.frame(dt, fixed_steps);
        for m in &mut self.modules {
            let mut ctx = ModuleCtx::new(&mut self.resources, &self.bus);
            m.fixed_update(&mut ctx, &frame)?;
        }
        self.tick += 1;
        Ok(())
    }

    #[inline]
    fn frame(&self, dt: f32, fixed_steps: u32) -> Frame {
        Frame {
            frame_index: self.frame_index,
            tick: self.tick,
            dt,
            fixed_dt: self.fixed_dt,
            fixed_steps,
        }
    }

    /// Hand a host event (e.g. a pre-play sound hook) to every module in registration order.
    ///
    /// The engine treats it as opaque; modules downcast as needed and may mutate it.
    pub fn dispatch_external_event(&mut self, event: &mut dyn std::any::Any) -> EngineResult<()> {
        for m in &mut self.modules {
            let mut ctx = ModuleCtx::new(&mut self.resources, &self.bus);
            m.on_external_event(&mut ctx, event)?;
        }
        Ok(())
    }

    /// Shuts modules down in reverse registration order. Failures are logged, not returned.
    pub fn shutdown(&mut self) -> EngineResult<()> {
        for m in self.modules.iter_mut().rev() {
            let mut ctx = ModuleCtx::new(&mut self.resources, &self.bus);
            if let Err(e) = m.shutdown(&mut ctx) {
                log::warn!(target: "engine", "module '{}' shutdown failed: {e}", m.id());
            }
        }
        Ok(())
    }
}
