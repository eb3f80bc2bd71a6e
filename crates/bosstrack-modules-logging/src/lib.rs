use bosstrack_core::{EngineResult, Module, ModuleCtx};

const DEFAULT_FILTER: &str = "info";

/// Installs `env_logger` as the `log` backend.
///
/// `RUST_LOG` wins over the module's default filter. If a logger is already set
/// (tests, embedding host), init is a no-op.
pub struct LoggingModule {
    default_filter: String,
}

impl LoggingModule {
    #[inline]
    pub fn new() -> Self {
        Self::with_filter(DEFAULT_FILTER)
    }

    #[inline]
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            default_filter: filter.into(),
        }
    }
}

impl Default for LoggingModule {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send + 'static> Module<E> for LoggingModule {
    fn id(&self) -> &'static str {
        "logging"
    }

    fn init(&mut self, _ctx: &mut ModuleCtx<'_, E>) -> EngineResult<()> {
        let env = env_logger::Env::default().default_filter_or(self.default_filter.as_str());
        match env_logger::Builder::from_env(env)
            .format_timestamp_millis()
            .try_init()
        {
            Ok(()) => log::info!(target: "logging", "logger ready (default filter '{}')", self.default_filter),
            Err(_) => log::debug!(target: "logging", "logger already installed"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bosstrack_core::{Bus, Engine};

    #[test]
    fn registering_twice_is_harmless() {
        let mut engine: Engine<()> = Engine::new(50, Bus::unbounded()).unwrap();
        engine.register_module(Box::new(LoggingModule::new())).unwrap();
        engine
            .register_module(Box::new(LoggingModule::with_filter("debug")))
            .unwrap();
        assert!(log::log_enabled!(log::Level::Error));
    }
}
