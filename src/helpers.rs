//! Queue/poll/download helpers that produce a file on disk.

use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::jobs::{MovieState, MovieStatus, SubmittedJob};
use crate::params::{Parameters, Value, WireValue};
use crate::transport::Transport;
use crate::util::{expand_home, sanitize_filename, with_extension_appended};

#[derive(Debug, Clone)]
pub struct MovieOptions {
    /// Target path without extension; `.<format>` is appended. Defaults to
    /// the movie title.
    pub filename: Option<PathBuf>,
    /// Directory for the file when `filename` is relative or unset.
    pub output_dir: Option<PathBuf>,
    pub overwrite: bool,
    /// Download the higher-quality encoding (mp4 only).
    pub hq: bool,
    /// How long to wait for the server to finish the movie.
    pub timeout: Duration,
}

impl Default for MovieOptions {
    fn default() -> Self {
        Self {
            filename: None,
            output_dir: None,
            overwrite: false,
            hq: false,
            timeout: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScreenshotOptions {
    /// Target path without extension; `.png` is appended. Defaults to
    /// `<id>_<date>`.
    pub filename: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub overwrite: bool,
}

/// Writes `data` to `path`, expanding a leading `~`.
///
/// Without `overwrite` an existing file is left untouched and
/// [`Error::FileExists`] is returned. The bytes go to a temporary file next to
/// the target, which is renamed into place only once fully written, so a
/// failure never disturbs what was already at `path`.
pub fn save_file(data: &[u8], path: &Path, overwrite: bool) -> Result<PathBuf> {
    let path = write_atomically(&expand_home(path), overwrite, |out| out.write_all(data))?;
    tracing::info!(path = %path.display(), bytes = data.len(), "saved file");
    Ok(path)
}

fn write_atomically<F>(path: &Path, overwrite: bool, fill: F) -> Result<PathBuf>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    if !overwrite && path.exists() {
        return Err(Error::FileExists(path.to_path_buf()));
    }

    // Dropping the temp file on any early return removes it.
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    fill(&mut tmp).and_then(|_| tmp.flush()).map_err(io_err)?;

    let persisted = if overwrite {
        tmp.persist(path)
    } else {
        tmp.persist_noclobber(path)
    };
    match persisted {
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            Err(Error::FileExists(path.to_path_buf()))
        }
        Err(e) => Err(io_err(e.error)),
    }
}

fn target_path(
    filename: Option<&Path>,
    output_dir: Option<&Path>,
    derived: &str,
    ext: &str,
) -> PathBuf {
    let file = match filename {
        Some(f) => with_extension_appended(&expand_home(f), ext),
        None => PathBuf::from(format!("{}.{}", sanitize_filename(derived), ext)),
    };
    match output_dir {
        Some(dir) => expand_home(dir).join(file),
        None => file,
    }
}

fn without<K, I>(input: I, dropped: &'static [&'static str]) -> Vec<(K, Value)>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, Value)>,
{
    input
        .into_iter()
        .filter(|(k, _)| !dropped.contains(&k.as_ref()))
        .collect()
}

impl<T: Transport> Client<T> {
    fn json_reply<R: DeserializeOwned>(&self, params: &Parameters) -> Result<R> {
        let json = self.execute(params)?.into_json()?;
        serde_json::from_value(json).map_err(|e| Error::Decode {
            url: self.url_for(params),
            reason: format!("unexpected reply: {e}"),
        })
    }

    fn spinner(&self) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {elapsed} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    }

    /// Queues a movie, waits for it to render, and downloads it.
    ///
    /// `request` takes the `queueMovie` fields. Returns the path written.
    ///
    /// ```no_run
    /// use chrono::{Duration, Utc};
    /// use helioviewer::{create_events, create_layers, Client, DataSource, MovieOptions, Value};
    ///
    /// let end = Utc::now().naive_utc() - Duration::days(15);
    /// let client = Client::from_env()?;
    /// let path = client.create_movie(
    ///     [
    ///         ("startTime", Value::from(end - Duration::minutes(5))),
    ///         ("endTime", Value::from(end)),
    ///         ("layers", create_layers([(DataSource::Aia171, 100)])?.into()),
    ///         ("events", create_events(["AR"])?.into()),
    ///         ("eventsLabels", true.into()),
    ///         ("imageScale", 1.into()),
    ///     ],
    ///     &MovieOptions::default(),
    /// )?;
    /// println!("{}", path.display());
    /// # Ok::<(), helioviewer::Error>(())
    /// ```
    pub fn create_movie<K, I>(&self, request: I, options: &MovieOptions) -> Result<PathBuf>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        // A callback would wrap the reply in a function call.
        let params = Parameters::new(Endpoint::QueueMovie, without(request, &["callback"]))?;
        let format = params
            .get("format")
            .map(WireValue::to_string)
            .unwrap_or_else(|| "mp4".to_string());

        let job: SubmittedJob = self.json_reply(&params)?;
        if let Some(msg) = job.error_message() {
            return Err(Error::Job(msg));
        }
        let id = job.id()?;
        tracing::info!(id = %id, "movie queued");

        let pb = self.spinner();
        let polled = self.wait_for_movie(
            &id,
            &format,
            job.token.as_deref(),
            options.timeout,
            pb.as_ref(),
        );
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let title = polled?;

        let bytes = self
            .call(
                Endpoint::DownloadMovie,
                [
                    ("id", Value::from(&id)),
                    ("format", Value::from(&format)),
                    ("hq", Value::from(options.hq)),
                ],
            )?
            .into_bytes()?;

        let path = target_path(
            options.filename.as_deref(),
            options.output_dir.as_deref(),
            title.as_deref().unwrap_or(id.as_str()),
            &format,
        );
        save_file(&bytes, &path, options.overwrite)
    }

    fn wait_for_movie(
        &self,
        id: &str,
        format: &str,
        token: Option<&str>,
        timeout: Duration,
        pb: Option<&ProgressBar>,
    ) -> Result<Option<String>> {
        let deadline = Instant::now() + timeout;
        let mut last_state: Option<MovieState> = None;

        loop {
            let mut input = vec![("id", Value::from(id)), ("format", Value::from(format))];
            if let Some(token) = token {
                input.push(("token", Value::from(token)));
            }
            let params = Parameters::new(Endpoint::GetMovieStatus, input)?;
            let status: MovieStatus = self.json_reply(&params)?;
            let Some(state) = status.state() else {
                return Err(Error::Job(
                    status
                        .error_message()
                        .unwrap_or_else(|| format!("no status reported for movie {id}")),
                ));
            };

            if last_state != Some(state) {
                last_state = Some(state);
                tracing::info!(id = %id, state = %state.label(), "movie status");
                if let Some(pb) = pb {
                    pb.set_message(format!("movie {id}: {}", state.label()));
                }
            }

            match state {
                MovieState::Finished => return Ok(status.title),
                MovieState::Failed => {
                    return Err(Error::Job(
                        status
                            .error_message()
                            .unwrap_or_else(|| format!("movie {id} failed")),
                    ));
                }
                MovieState::Queued | MovieState::Processing => {}
                MovieState::Unknown(code) => {
                    return Err(Error::Job(format!("unknown movie status [{code}]")));
                }
            }

            if Instant::now() >= deadline {
                return Err(Error::JobTimeout {
                    id: id.to_string(),
                    timeout,
                });
            }
            thread::sleep(self.poll_interval);
        }
    }

    /// Takes a screenshot and downloads it as PNG.
    ///
    /// `request` takes the `takeScreenshot` fields; `display` is ignored so
    /// that the server replies with a screenshot id.
    pub fn create_screenshot<K, I>(&self, request: I, options: &ScreenshotOptions) -> Result<PathBuf>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let params = Parameters::new(
            Endpoint::TakeScreenshot,
            without(request, &["display", "callback"]),
        )?;
        let day = params
            .get("date")
            .and_then(WireValue::as_str)
            .and_then(|d| d.split('T').next())
            .unwrap_or_default()
            .to_string();

        let job: SubmittedJob = self.json_reply(&params)?;
        if let Some(msg) = job.error_message() {
            return Err(Error::Job(msg));
        }
        let id = job.id()?;
        tracing::info!(id = %id, "screenshot taken");

        let bytes = self
            .call(Endpoint::DownloadScreenshot, [("id", Value::from(&id))])?
            .into_bytes()?;

        let path = target_path(
            options.filename.as_deref(),
            options.output_dir.as_deref(),
            &format!("{id}_{day}"),
            "png",
        );
        save_file(&bytes, &path, options.overwrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_file_respects_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("test.png");

        let written = save_file(b"first", &target, false).unwrap();
        assert_eq!(written, target);
        assert_eq!(std::fs::read(&target).unwrap(), b"first");

        let err = save_file(b"second", &target, false).unwrap_err();
        assert!(matches!(err, Error::FileExists(ref p) if p == &target), "{err:?}");
        assert_eq!(std::fs::read(&target).unwrap(), b"first");

        save_file(b"third", &target, true).unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"third");
    }

    #[test]
    fn failed_write_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("movie.mp4");
        std::fs::write(&target, b"keep me").unwrap();

        let err = write_atomically(&target, true, |out| {
            out.write_all(&[7u8; 4096])?;
            Err(std::io::Error::other("disk full"))
        })
        .unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path == &target), "{err:?}");
        assert_eq!(std::fs::read(&target).unwrap(), b"keep me");
        // no temporary file left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("shot.png");
        assert!(write_atomically(&target, false, |_| Err(std::io::Error::other("boom"))).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn existing_directory_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("inner"), b"x").unwrap();

        assert!(save_file(b"data", &target, true).is_err());
        assert!(target.is_dir());
        assert_eq!(std::fs::read(target.join("inner")).unwrap(), b"x");
    }

    #[test]
    fn target_path_derivation() {
        assert_eq!(
            target_path(None, None, "AIA 171 (00:00:00)", "mp4"),
            PathBuf::from("AIA 171 (00_00_00).mp4")
        );
        assert_eq!(
            target_path(Some(Path::new("my_movie")), Some(Path::new("/out")), "ignored", "webm"),
            PathBuf::from("/out/my_movie.webm")
        );
        assert_eq!(
            target_path(Some(Path::new("/abs/shot")), Some(Path::new("/out")), "x", "png"),
            PathBuf::from("/abs/shot.png")
        );
        assert_eq!(
            target_path(None, Some(Path::new("/out")), "3240748_2022-01-01", "png"),
            PathBuf::from("/out/3240748_2022-01-01.png")
        );
    }

    #[test]
    fn without_drops_named_fields() {
        let kept = without(
            [("display", Value::from(true)), ("date", Value::from("x"))],
            &["display", "callback"],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0, "date");
    }
}
