#![forbid(unsafe_op_in_unsafe_fn)]

use libloading::Library;
use std::path::{Path, PathBuf};

use bosstrack_audio_api::{AudioError, MusicDirector, MusicFader};
use thiserror::Error;

/* =============================================================================================
   C ABI exported by an external music director library
   ============================================================================================= */

/// Number of managed instances; negative if the director has no instance table.
type InstanceCountFn = unsafe extern "C" fn() -> i32;
/// `(index, target_volume, duration_ticks) -> status`, 0 = ok.
type FadeToFn = unsafe extern "C" fn(u32, f32, u32) -> i32;
/// `(index, active) -> status`, 0 = ok.
type SetActiveFn = unsafe extern "C" fn(u32, bool) -> i32;

const SYM_INSTANCE_COUNT: &[u8] = b"bosstrack_director_instance_count\0";
const SYM_FADE_TO: &[u8] = b"bosstrack_director_fade_to\0";
const SYM_SET_ACTIVE: &[u8] = b"bosstrack_director_set_active\0";

#[derive(Debug, Error)]
pub enum DirectorLoadError {
    #[error("load library failed file='{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("missing symbol '{symbol}' in '{}'", .path.display())]
    MissingSymbol { path: PathBuf, symbol: &'static str },

    #[error("current_exe: {0}")]
    Exe(String),
}

/// Music director living in a separately shipped dynamic library.
///
/// Only the instance count is mandatory; a library lacking fade/activation entry
/// points is still a director, its instances just reject those calls.
pub struct LibraryDirector {
    name: String,
    instance_count: InstanceCountFn,
    fade_to: Option<FadeToFn>,
    set_active: Option<SetActiveFn>,
    // Keeps the code behind the function pointers mapped.
    _lib: Library,
}

impl LibraryDirector {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DirectorLoadError> {
        let path = path.as_ref();

        // Safety: loading runs the library's initialisers; the director library is trusted like any plugin.
        let lib = unsafe { Library::new(path) }.map_err(|source| DirectorLoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // Safety: the symbol types match the exported C ABI above. Pointers are copied out and
        // stay valid while `_lib` is alive.
        let instance_count = unsafe { lib.get::<InstanceCountFn>(SYM_INSTANCE_COUNT) }
            .map(|s| *s)
            .map_err(|_| DirectorLoadError::MissingSymbol {
                path: path.to_path_buf(),
                symbol: "bosstrack_director_instance_count",
            })?;
        let fade_to = unsafe { lib.get::<FadeToFn>(SYM_FADE_TO) }.ok().map(|s| *s);
        let set_active = unsafe { lib.get::<SetActiveFn>(SYM_SET_ACTIVE) }.ok().map(|s| *s);

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("external")
            .to_string();

        Ok(Self {
            name,
            instance_count,
            fade_to,
            set_active,
            _lib: lib,
        })
    }
}

impl MusicDirector for LibraryDirector {
    fn name(&self) -> &str {
        &self.name
    }

    fn visit_instances(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn MusicFader),
    ) -> Result<usize, AudioError> {
        // Safety: resolved from the live library with the declared signature.
        let count = unsafe { (self.instance_count)() };
        if count < 0 {
            return Err(AudioError::Unavailable(format!("'{}' has no instance table", self.name)));
        }

        for index in 0..count as u32 {
            let mut fader = LibraryFader {
                index,
                fade_to: self.fade_to,
                set_active: self.set_active,
            };
            visit(&mut fader);
        }
        Ok(count as usize)
    }
}

struct LibraryFader {
    index: u32,
    fade_to: Option<FadeToFn>,
    set_active: Option<SetActiveFn>,
}

impl MusicFader for LibraryFader {
    fn fade_to(&mut self, target_volume: f32, duration_ticks: u32) -> Result<(), AudioError> {
        let f = self.fade_to.ok_or(AudioError::Unsupported("fade_to"))?;
        // Safety: see `LibraryDirector::load`.
        let rc = unsafe { f(self.index, target_volume, duration_ticks) };
        status("fade_to", rc)
    }

    fn set_active(&mut self, active: bool) -> Result<(), AudioError> {
        let f = self.set_active.ok_or(AudioError::Unsupported("set_active"))?;
        // Safety: see `LibraryDirector::load`.
        let rc = unsafe { f(self.index, active) };
        status("set_active", rc)
    }
}

#[inline]
fn status(op: &'static str, rc: i32) -> Result<(), AudioError> {
    if rc == 0 {
        Ok(())
    } else {
        Err(AudioError::rejected(op, format!("status {rc}")))
    }
}

pub fn modules_dir_near_exe() -> Result<PathBuf, DirectorLoadError> {
    let exe = std::env::current_exe().map_err(|e| DirectorLoadError::Exe(e.to_string()))?;
    let base = exe
        .parent()
        .ok_or_else(|| DirectorLoadError::Exe("current_exe has no parent directory".into()))?;
    Ok(base.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_an_open_error() {
        let path = std::env::temp_dir().join(libloading::library_filename("no_such_director_lib"));
        match LibraryDirector::load(&path) {
            Err(DirectorLoadError::Open { path: p, .. }) => assert_eq!(p, path),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("library should not exist"),
        }
    }

    #[test]
    fn non_zero_status_is_rejection() {
        assert!(status("fade_to", 0).is_ok());
        assert_eq!(
            status("fade_to", -3),
            Err(AudioError::rejected("fade_to", "status -3"))
        );
    }

    #[test]
    fn missing_entry_points_are_unsupported() {
        let mut f = LibraryFader {
            index: 0,
            fade_to: None,
            set_active: None,
        };
        assert_eq!(f.fade_to(0.0, 20), Err(AudioError::Unsupported("fade_to")));
        assert_eq!(f.set_active(false), Err(AudioError::Unsupported("set_active")));
    }
}
