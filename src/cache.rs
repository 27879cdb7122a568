use crate::models::{AudioSettings, CachedCount};
use crate::store::DEFAULT_COUNT;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

const COUNT_FILENAME: &str = "counter.json";
const AUDIO_FILENAME: &str = "audio.json";

// Built-in fallback sounds, shipped as data URLs so a fresh install has
// working audio without any remote fetch.
pub const DEFAULT_ADD_PAYMENT_AUDIO: &str = "data:audio/wav;base64,UklGRnoGAABXQVZFZm10IBAAAAABAAEAQB8AAEAfAAABAAgAZGF0YQoGAACBhYqFbF1fdJivrJBhNjVgodDbq2EcBj+a2/LDciUFLIHO8tiJNwgZaLvt559NEAxQp+PwtmMcBjiR1/LMeSwFJHfH8N2QQAoUXrTp66hVFApGn+DyvGIcAz2N2e/eYyAAPU0cXILH7dmYOggaXLLl76dTFApIo9/v2XwwBSB9yO/ddygFK3nF796OPAkUY7Pm46tXUwo=";
pub const DEFAULT_PAYMENT_SUCCESS_AUDIO: &str = "data:audio/wav;base64,UklGRhQEAABXQVZFZm10IBAAAAABAAEARKwAAIhYAQACABAAZGF0YfADAACBhYqFbF1fdJivrJBhNjVgodDbq2EcBj+a2/LDciUFLIHO8tiJNwgZaLvt559NEAxQp+PwtmMcBjiR1/LMeSwFJHfH8N2QQAoUXrTp66hVFApGn+DyvGIcAz2N2e/ecSOBXwMAXYTF9N6OOQgQb7Dn46pYNAk=";

// Durable client-side records. Reads fall back to documented defaults and
// writes swallow failures, so callers never observe a cache error.
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn count(&self) -> u32 {
        match self.read_record::<CachedCount>(COUNT_FILENAME) {
            Some(record) => record.count,
            None => DEFAULT_COUNT,
        }
    }

    pub fn set_count(&self, count: u32) {
        let record = CachedCount {
            count,
            last_updated: Utc::now().to_rfc3339(),
        };
        self.write_record(COUNT_FILENAME, &record);
    }

    pub fn increment(&self) -> u32 {
        let next = self.count().saturating_add(1);
        self.set_count(next);
        next
    }

    pub fn decrement(&self) -> u32 {
        let current = self.count();
        if current == 0 {
            return 0;
        }
        let next = current - 1;
        self.set_count(next);
        next
    }

    pub fn audio_settings(&self) -> AudioSettings {
        self.read_record(AUDIO_FILENAME).unwrap_or_else(|| AudioSettings {
            add_payment_audio_url: Some(DEFAULT_ADD_PAYMENT_AUDIO.to_string()),
            payment_success_audio_url: Some(DEFAULT_PAYMENT_SUCCESS_AUDIO.to_string()),
        })
    }

    pub fn set_audio_settings(&self, settings: &AudioSettings) {
        self.write_record(AUDIO_FILENAME, settings);
    }

    pub fn set_add_payment_audio(&self, audio_url: impl Into<String>) {
        let mut settings = self.audio_settings();
        settings.add_payment_audio_url = Some(audio_url.into());
        self.set_audio_settings(&settings);
    }

    pub fn set_payment_success_audio(&self, audio_url: impl Into<String>) {
        let mut settings = self.audio_settings();
        settings.payment_success_audio_url = Some(audio_url.into());
        self.set_audio_settings(&settings);
    }

    pub fn reset(&self) {
        for filename in [COUNT_FILENAME, AUDIO_FILENAME] {
            let path = self.dir.join(filename);
            if let Err(err) = fs::remove_file(&path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %err, "failed to remove cached record");
                }
            }
        }
    }

    fn read_record<T: serde::de::DeserializeOwned>(&self, filename: &str) -> Option<T> {
        let path = self.dir.join(filename);
        match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "corrupt cached record, using defaults");
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read cached record");
                None
            }
        }
    }

    fn write_record<T: serde::Serialize>(&self, filename: &str, record: &T) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            warn!(dir = %self.dir.display(), error = %err, "failed to create cache dir");
            return;
        }
        let payload = match serde_json::to_vec_pretty(record) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize cached record");
                return;
            }
        };
        let path = self.dir.join(filename);
        if let Err(err) = fs::write(&path, payload) {
            warn!(path = %path.display(), error = %err, "failed to write cached record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        assert_eq!(cache.count(), DEFAULT_COUNT);
    }

    #[test]
    fn set_then_read_count() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        cache.set_count(9);
        assert_eq!(cache.count(), 9);

        let record: CachedCount = serde_json::from_slice(
            &fs::read(dir.path().join(COUNT_FILENAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(record.count, 9);
        assert!(!record.last_updated.is_empty());
    }

    #[test]
    fn count_defaults_on_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(COUNT_FILENAME), b"not json").unwrap();
        let cache = LocalCache::new(dir.path());
        assert_eq!(cache.count(), DEFAULT_COUNT);
    }

    #[test]
    fn increment_and_decrement_from_default() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        assert_eq!(cache.increment(), DEFAULT_COUNT + 1);
        assert_eq!(cache.decrement(), DEFAULT_COUNT);
    }

    #[test]
    fn decrement_floors_at_zero() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        cache.set_count(0);
        assert_eq!(cache.decrement(), 0);
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn audio_defaults_to_builtin_assets() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let settings = cache.audio_settings();
        assert_eq!(
            settings.add_payment_audio_url.as_deref(),
            Some(DEFAULT_ADD_PAYMENT_AUDIO)
        );
        assert_eq!(
            settings.payment_success_audio_url.as_deref(),
            Some(DEFAULT_PAYMENT_SUCCESS_AUDIO)
        );
    }

    #[test]
    fn setting_one_audio_url_keeps_the_other() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        cache.set_add_payment_audio("data:audio/wav;base64,AAAA");
        let settings = cache.audio_settings();
        assert_eq!(
            settings.add_payment_audio_url.as_deref(),
            Some("data:audio/wav;base64,AAAA")
        );
        assert_eq!(
            settings.payment_success_audio_url.as_deref(),
            Some(DEFAULT_PAYMENT_SUCCESS_AUDIO)
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        cache.set_count(1);
        cache.set_add_payment_audio("data:audio/wav;base64,AAAA");
        cache.reset();
        assert_eq!(cache.count(), DEFAULT_COUNT);
        assert_eq!(
            cache.audio_settings().add_payment_audio_url.as_deref(),
            Some(DEFAULT_ADD_PAYMENT_AUDIO)
        );
    }

    #[test]
    fn write_failure_is_swallowed() {
        // A file where the cache dir should be makes every write fail.
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("occupied");
        fs::write(&blocked, b"").unwrap();
        let cache = LocalCache::new(&blocked);
        cache.set_count(3);
        assert_eq!(cache.count(), DEFAULT_COUNT);
    }
}
