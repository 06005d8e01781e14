use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Duration assumed when a file cannot be probed.
pub const DEFAULT_DURATION: f64 = 180.0;

/// Track duration in seconds, read from container metadata without decoding.
/// Falls back to [`DEFAULT_DURATION`].
pub fn probe_duration(path: &Path) -> f64 {
    match read_duration(path) {
        Ok(secs) => {
            log::debug!("Probed {}: {:.1}s", path.display(), secs);
            secs
        }
        Err(err) => {
            log::warn!(
                "Could not read duration of {} ({:#}), assuming {:.0}s",
                path.display(),
                err,
                DEFAULT_DURATION
            );
            DEFAULT_DURATION
        }
    }
}

fn read_duration(path: &Path) -> Result<f64> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let params = &track.codec_params;
    let n_frames = params.n_frames.context("Unknown frame count")?;

    let secs = if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(n_frames);
        time.seconds as f64 + time.frac
    } else {
        let sample_rate = params.sample_rate.context("Unknown sample rate")?;
        n_frames as f64 / sample_rate as f64
    };

    if !secs.is_finite() || secs <= 0.0 {
        anyhow::bail!("Non-positive duration {}", secs);
    }
    Ok(secs)
}
