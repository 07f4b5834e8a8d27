//! Opening audio files as `rodio` sources and sinks.
//!
//! Seeking rebuilds the sink: the file is decoded again and skipped forward
//! to the requested position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::source::SkipDuration;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::player::MediaError;

pub(super) type FileSource = SkipDuration<Decoder<BufReader<File>>>;

/// Decode `path` starting at `start_at`, along with the duration the decoder reports.
pub(super) fn open_source(
    path: &Path,
    start_at: Duration,
) -> Result<(FileSource, Option<Duration>), MediaError> {
    let file = File::open(path).map_err(|source| MediaError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let reported = decoder.total_duration();
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    Ok((decoder.skip_duration(start_at), reported))
}

/// Duration from the container's tags and properties. Zero counts as unknown.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    Some(tagged.properties().duration()).filter(|d| !d.is_zero())
}

/// Create a paused `Sink` playing `path` from `start_at` at `volume`.
///
/// Returns the sink and the best-known duration of the file.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), MediaError> {
    let (source, reported) = open_source(path, start_at)?;
    let duration = probe_duration(path).or(reported);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}
