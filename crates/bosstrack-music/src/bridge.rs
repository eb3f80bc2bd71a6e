use std::sync::Arc;

use bosstrack_audio_api::{AudioError, MusicDirector, MusicFader};
use bosstrack_core::module::Resources;
use parking_lot::Mutex;

use crate::config::DirectorConfig;
use crate::dynlib::{modules_dir_near_exe, LibraryDirector};

/// Asks whatever else is directing music to get out of the way.
pub trait MusicBridge: Send {
    /// `true` if a director was found and signalled, even if some of its instances
    /// rejected the request. `false` if nothing is there to signal.
    fn attempt_fade_out(&mut self, duration_ticks: u32) -> bool;
}

/// Stand-in when no director was discovered.
pub struct AbsentDirector;

impl MusicDirector for AbsentDirector {
    fn name(&self) -> &str {
        "none"
    }

    fn is_present(&self) -> bool {
        false
    }

    fn visit_instances(
        &mut self,
        _visit: &mut dyn FnMut(&mut dyn MusicFader),
    ) -> Result<usize, AudioError> {
        Err(AudioError::Unavailable("no music director".into()))
    }
}

/// In-process director published by another module through [`Resources`].
#[derive(Clone)]
pub struct SharedMusicDirector {
    name: String,
    inner: Arc<Mutex<dyn MusicDirector>>,
}

impl SharedMusicDirector {
    pub fn new<D: MusicDirector + 'static>(director: D) -> Self {
        Self {
            name: director.name().to_string(),
            inner: Arc::new(Mutex::new(director)),
        }
    }
}

impl MusicDirector for SharedMusicDirector {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_present(&self) -> bool {
        self.inner.lock().is_present()
    }

    fn visit_instances(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn MusicFader),
    ) -> Result<usize, AudioError> {
        self.inner.lock().visit_instances(visit)
    }
}

pub struct ExternalMusicBridge {
    director: Box<dyn MusicDirector>,
}

impl ExternalMusicBridge {
    #[inline]
    pub fn new(director: Box<dyn MusicDirector>) -> Self {
        Self { director }
    }

    #[inline]
    pub fn absent() -> Self {
        Self::new(Box::new(AbsentDirector))
    }

    /// Looks for a director: first a [`SharedMusicDirector`] resource, then a dynamic
    /// library next to the executable (or in the configured directory).
    pub fn discover(resources: &Resources, cfg: &DirectorConfig) -> Self {
        if let Some(shared) = resources.get::<SharedMusicDirector>() {
            log::info!(target: "boss_music", "music director '{}' found in-process", shared.name());
            return Self::new(Box::new((*shared).clone()));
        }

        if !cfg.enabled {
            return Self::absent();
        }

        let dir = match cfg.search_dir.clone() {
            Some(d) => Ok(d),
            None => modules_dir_near_exe(),
        };
        let file = libloading::library_filename(&cfg.library);
        let loaded = dir.and_then(|d| LibraryDirector::load(d.join(file)));

        match loaded {
            Ok(director) => {
                log::info!(target: "boss_music", "music director '{}' loaded", director.name());
                Self::new(Box::new(director))
            }
            Err(e) => {
                log::debug!(target: "boss_music", "no music director: {e}");
                Self::absent()
            }
        }
    }

    #[inline]
    pub fn director_name(&self) -> &str {
        self.director.name()
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.director.is_present()
    }
}

impl MusicBridge for ExternalMusicBridge {
    fn attempt_fade_out(&mut self, duration_ticks: u32) -> bool {
        if !self.director.is_present() {
            return false;
        }

        let mut failed = 0usize;
        let visited = self.director.visit_instances(&mut |inst| {
            if let Err(e) = inst.fade_to(0.0, duration_ticks) {
                failed += 1;
                log::debug!(target: "boss_music", "director fade_to failed: {e}");
            }
            if let Err(e) = inst.set_active(false) {
                failed += 1;
                log::debug!(target: "boss_music", "director set_active failed: {e}");
            }
        });

        match visited {
            Ok(n) => log::debug!(
                target: "boss_music",
                "asked '{}' to fade {n} instance(s), {failed} call(s) failed",
                self.director.name()
            ),
            Err(e) => log::debug!(
                target: "boss_music",
                "director '{}' exposes no instances: {e}",
                self.director.name()
            ),
        }
        true
    }
}
