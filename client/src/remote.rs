//! Downloads remote assets into the local cache so the asset server can load them.
//!
//! A `.gltf` manifest is fetched together with every relative buffer and image
//! it references. Files already present in the cache are reused, which also
//! makes `--offline` runs possible after one successful download.

use bevy::tasks::{block_on, futures_lite::future, AsyncComputeTaskPool, Task};
use serde::Deserialize;
use std::{
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use thiserror::Error;

use shared::REMOTE_CACHE_DIR;

const READ_CHUNK_SIZE: usize = 16 * 1024;
const USER_AGENT: &str = concat!("sailboat/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{url} is not a valid glTF manifest: {source}")]
    InvalidManifest {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("refusing to fetch {uri}: {reason}")]
    UnsupportedUri { uri: String, reason: &'static str },
    #[error("{url} is not cached and network access is disabled")]
    Offline { url: String },
}

/// Where an asset comes from: a URL to download, or a path inside the data folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    Remote(String),
    Local(String),
}

impl AssetSource {
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            AssetSource::Remote(value.to_string())
        } else {
            AssetSource::Local(value.to_string())
        }
    }
}

/// Byte counters shared between a download task and the main thread.
#[derive(Debug, Default)]
pub struct FetchProgress {
    received: AtomicU64,
    expected: AtomicU64,
}

impl FetchProgress {
    fn record_expected(&self, bytes: u64) {
        self.expected.fetch_add(bytes, Ordering::Relaxed);
    }

    fn record_received(&self, bytes: u64) {
        self.received.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Completion in percent, once at least one response announced its length.
    ///
    /// Advisory only: the expected total grows as manifest dependencies are discovered.
    pub fn percent(&self) -> Option<f32> {
        let expected = self.expected.load(Ordering::Relaxed);
        if expected == 0 {
            return None;
        }
        let received = self.received.load(Ordering::Relaxed);
        Some((received as f32 / expected as f32 * 100.0).min(100.0))
    }
}

/// An in-flight download resolving to an asset path relative to the data folder.
pub struct PendingFetch {
    task: Task<Result<String, FetchError>>,
    pub progress: Arc<FetchProgress>,
}

impl PendingFetch {
    pub fn poll(&mut self) -> Option<Result<String, FetchError>> {
        block_on(future::poll_once(&mut self.task))
    }
}

/// Starts fetching `source` on the compute task pool.
///
/// Downloads block their thread, so they stay off the IO pool the asset server
/// reads files on. Local sources resolve immediately to their own path.
pub fn spawn_fetch(source: AssetSource, cache_dir: PathBuf, offline: bool) -> PendingFetch {
    let progress = Arc::new(FetchProgress::default());
    let task_progress = Arc::clone(&progress);
    let task = AsyncComputeTaskPool::get().spawn(async move {
        match source {
            AssetSource::Local(path) => Ok(path),
            AssetSource::Remote(url) => fetch_remote(&url, &cache_dir, offline, &task_progress),
        }
    });
    PendingFetch { task, progress }
}

fn fetch_remote(
    url: &str,
    cache_dir: &Path,
    offline: bool,
    progress: &FetchProgress,
) -> Result<String, FetchError> {
    let (base_url, file_name) = split_url(url)?;
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    // Files are keyed by host and directory so equal names from different origins never collide
    let origin = origin_segments(base_url);
    let origin_dir = origin
        .iter()
        .fold(cache_dir.to_path_buf(), |dir, segment| dir.join(segment));

    let destination = origin_dir.join(file_name);
    download(&client, url, &destination, offline, progress)?;

    if file_name.ends_with(".gltf") {
        let manifest = fs::read_to_string(&destination).map_err(|source| FetchError::Io {
            path: destination.clone(),
            source,
        })?;
        let dependencies =
            manifest_dependencies(&manifest).map_err(|source| FetchError::InvalidManifest {
                url: url.to_string(),
                source,
            })?;
        for uri in dependencies {
            let relative = cache_relative_path(&uri)?;
            let dependency_url = format!("{base_url}{uri}");
            download(
                &client,
                &dependency_url,
                &origin_dir.join(relative),
                offline,
                progress,
            )?;
        }
    }

    let mut asset_path = vec![REMOTE_CACHE_DIR];
    asset_path.extend(origin.iter().map(String::as_str));
    asset_path.push(file_name);
    Ok(asset_path.join("/"))
}

fn download(
    client: &reqwest::blocking::Client,
    url: &str,
    destination: &Path,
    offline: bool,
    progress: &FetchProgress,
) -> Result<(), FetchError> {
    if destination.exists() {
        log::debug!("Reusing cached {}", destination.display());
        return Ok(());
    }
    if offline {
        return Err(FetchError::Offline {
            url: url.to_string(),
        });
    }

    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };
    let io = |source| FetchError::Io {
        path: destination.to_path_buf(),
        source,
    };

    log::info!("Downloading {}", url);
    let mut response = client.get(url).send().map_err(transport)?;
    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    if let Some(length) = response.content_length() {
        progress.record_expected(length);
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(io)?;
    }
    // Written under a temporary name so an interrupted download is never mistaken for a cached file
    let partial = destination.with_extension("part");
    let mut file = File::create(&partial).map_err(io)?;
    let mut buffer = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let read = response.read(&mut buffer).map_err(io)?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read]).map_err(io)?;
        progress.record_received(read as u64);
    }
    file.flush().map_err(io)?;
    drop(file);
    fs::rename(&partial, destination).map_err(io)?;
    Ok(())
}

/// Splits a URL into its directory (with trailing slash) and file name.
fn split_url(url: &str) -> Result<(&str, &str), FetchError> {
    let path_start = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[path_start..].rfind('/') {
        Some(slash) => {
            let split = path_start + slash + 1;
            let file_name = &url[split..];
            if file_name.is_empty() || file_name == "." || file_name == ".." {
                return Err(FetchError::UnsupportedUri {
                    uri: url.to_string(),
                    reason: "the URL does not name a file",
                });
            }
            Ok((&url[..split], file_name))
        }
        None => Err(FetchError::UnsupportedUri {
            uri: url.to_string(),
            reason: "the URL has no path",
        }),
    }
}

/// Cache directories for a base URL: host first, then each directory, scheme dropped.
///
/// Characters outside `[A-Za-z0-9._-]` become `_`, and dot-only segments are
/// replaced, so the result never leaves the cache.
fn origin_segments(base_url: &str) -> Vec<String> {
    let without_scheme = base_url
        .find("://")
        .map_or(base_url, |i| &base_url[i + 3..]);
    without_scheme
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let clean: String = segment
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                        c
                    } else {
                        '_'
                    }
                })
                .collect();
            if clean.chars().all(|c| c == '.') {
                "_".repeat(clean.len())
            } else {
                clean
            }
        })
        .collect()
}

#[derive(Deserialize)]
struct GltfManifest {
    #[serde(default)]
    buffers: Vec<UriEntry>,
    #[serde(default)]
    images: Vec<UriEntry>,
}

#[derive(Deserialize)]
struct UriEntry {
    uri: Option<String>,
}

/// External files a glTF manifest refers to; embedded `data:` URIs are skipped.
fn manifest_dependencies(manifest: &str) -> Result<Vec<String>, serde_json::Error> {
    let manifest: GltfManifest = serde_json::from_str(manifest)?;
    let mut uris: Vec<String> = manifest
        .buffers
        .into_iter()
        .chain(manifest.images)
        .filter_map(|entry| entry.uri)
        .filter(|uri| !uri.starts_with("data:"))
        .collect();
    uris.dedup();
    Ok(uris)
}

/// Maps a manifest URI to a path below the cache directory.
fn cache_relative_path(uri: &str) -> Result<PathBuf, FetchError> {
    let reject = |reason| {
        Err(FetchError::UnsupportedUri {
            uri: uri.to_string(),
            reason,
        })
    };
    if uri.contains(':') {
        return reject("absolute URIs are not followed");
    }
    if uri.starts_with('/') || uri.contains('\\') {
        return reject("the path is not relative");
    }
    // The glTF loader percent-decodes URIs, so cached names would not match
    if uri.contains('%') {
        return reject("percent-encoded names are not supported");
    }

    let mut path = PathBuf::new();
    for segment in uri.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return reject("the path escapes the asset cache"),
            segment => path.push(segment),
        }
    }
    if path.as_os_str().is_empty() {
        return reject("the path is empty");
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_source_parse() {
        assert_eq!(
            AssetSource::parse("https://example.com/boat.gltf"),
            AssetSource::Remote("https://example.com/boat.gltf".to_string())
        );
        assert_eq!(
            AssetSource::parse("models/boat.glb"),
            AssetSource::Local("models/boat.glb".to_string())
        );
    }

    #[test]
    fn test_split_url() {
        let (base, file) = split_url("https://host/a/b/Sailboat.gltf").unwrap();
        assert_eq!(base, "https://host/a/b/");
        assert_eq!(file, "Sailboat.gltf");

        assert!(split_url("https://host/a/").is_err());
        assert!(split_url("https://host").is_err());
    }

    #[test]
    fn test_manifest_dependencies_skip_embedded_data() {
        let manifest = r#"{
            "asset": { "version": "2.0" },
            "buffers": [
                { "uri": "Sailboat.bin", "byteLength": 10 },
                { "uri": "data:application/octet-stream;base64,AAAA", "byteLength": 3 }
            ],
            "images": [
                { "uri": "textures/hull.png" },
                { "bufferView": 3, "mimeType": "image/png" }
            ]
        }"#;
        let uris = manifest_dependencies(manifest).unwrap();
        assert_eq!(uris, vec!["Sailboat.bin", "textures/hull.png"]);
    }

    #[test]
    fn test_manifest_without_external_files() {
        let uris = manifest_dependencies(r#"{ "asset": { "version": "2.0" } }"#).unwrap();
        assert!(uris.is_empty());
        assert!(manifest_dependencies("not json").is_err());
    }

    #[test]
    fn test_cache_relative_path() {
        assert_eq!(
            cache_relative_path("textures/./hull.png").unwrap(),
            PathBuf::from("textures").join("hull.png")
        );
        assert!(cache_relative_path("../secret.bin").is_err());
        assert!(cache_relative_path("a/../../secret.bin").is_err());
        assert!(cache_relative_path("/etc/passwd").is_err());
        assert!(cache_relative_path("https://elsewhere/x.bin").is_err());
        assert!(cache_relative_path("hull%20paint.png").is_err());
        assert!(cache_relative_path("").is_err());
    }

    #[test]
    fn test_progress_percent() {
        let progress = FetchProgress::default();
        assert_eq!(progress.percent(), None);
        progress.record_expected(200);
        progress.record_received(50);
        assert_eq!(progress.percent(), Some(25.0));
        progress.record_received(500);
        assert_eq!(progress.percent(), Some(100.0));
    }

    #[test]
    fn test_offline_fetch_without_cache_fails() {
        let cache_dir = std::env::temp_dir().join(format!("sailboat-remote-{}", std::process::id()));
        let progress = FetchProgress::default();
        let result = fetch_remote(
            "https://example.invalid/models/boat.gltf",
            &cache_dir,
            true,
            &progress,
        );
        assert!(matches!(result, Err(FetchError::Offline { .. })));
    }

    #[test]
    fn test_origin_segments() {
        assert_eq!(
            origin_segments("https://host:8080/a b/models/"),
            vec!["host_8080", "a_b", "models"]
        );
        assert_eq!(origin_segments("https://host/../x/"), vec!["host", "__", "x"]);
    }

    #[test]
    fn test_cached_manifest_is_reused_offline() {
        let cache_dir =
            std::env::temp_dir().join(format!("sailboat-remote-cached-{}", std::process::id()));
        let origin_dir = cache_dir.join("example.invalid").join("models");
        fs::create_dir_all(origin_dir.join("textures")).unwrap();
        fs::write(
            origin_dir.join("boat.gltf"),
            r#"{ "buffers": [ { "uri": "boat.bin" } ], "images": [ { "uri": "textures/hull.png" } ] }"#,
        )
        .unwrap();
        fs::write(origin_dir.join("boat.bin"), [0u8; 4]).unwrap();
        fs::write(origin_dir.join("textures").join("hull.png"), [0u8; 4]).unwrap();

        let progress = FetchProgress::default();
        let path = fetch_remote(
            "https://example.invalid/models/boat.gltf",
            &cache_dir,
            true,
            &progress,
        )
        .unwrap();
        assert_eq!(path, "remote/example.invalid/models/boat.gltf");

        let _ = fs::remove_dir_all(&cache_dir);
    }

    #[test]
    fn test_same_file_name_on_another_host_is_not_reused() {
        let cache_dir =
            std::env::temp_dir().join(format!("sailboat-remote-hosts-{}", std::process::id()));
        let first_dir = cache_dir.join("a.invalid").join("x");
        fs::create_dir_all(&first_dir).unwrap();
        fs::write(first_dir.join("normals.jpg"), [0u8; 4]).unwrap();

        let progress = FetchProgress::default();
        let first = fetch_remote("https://a.invalid/x/normals.jpg", &cache_dir, true, &progress);
        assert_eq!(first.unwrap(), "remote/a.invalid/x/normals.jpg");

        let second = fetch_remote("https://b.invalid/y/normals.jpg", &cache_dir, true, &progress);
        assert!(matches!(second, Err(FetchError::Offline { .. })));

        let _ = fs::remove_dir_all(&cache_dir);
    }
}
