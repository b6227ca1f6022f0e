use std::fs;
use std::path::Path;

use hound::{WavReader, WavWriter};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::DomainError;

/// Clip length and stride in seconds. Clips overlap by two seconds.
const CLIP_SECS: u32 = 5;
const STRIDE_SECS: u32 = 3;

/// Split every WAV under `<root>/musan/<category>/<source>/` into
/// fixed-length clips beneath `<root>/musan_split/`, mirroring the source
/// tree. Each source file becomes a directory of numbered clips carrying
/// its base name.
///
/// Returns the total number of clips written.
pub fn split_noise_corpus(root: &Path) -> Result<usize, DomainError> {
    let src_root = root.join("musan");
    let dst_root = root.join("musan_split");

    let wavs: Vec<_> = WalkDir::new(&src_root)
        .min_depth(3)
        .max_depth(3)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("wav"))
        .collect();

    let mut clips = 0usize;
    for file in &wavs {
        let relative = file.strip_prefix(&src_root).map_err(|_| {
            DomainError::Audio(format!("file outside noise corpus: {}", file.display()))
        })?;
        let dest_dir = dst_root.join(relative).with_extension("");
        let written = split_file(file, &dest_dir)?;
        debug!(file = ?file, clips = written, "Split");
        clips += written;
    }

    info!(files = wavs.len(), clips = clips, "Noise corpus split");
    Ok(clips)
}

/// Split one WAV into 5-second clips on a 3-second stride, numbered
/// `00000.wav`, `00001.wav`, … in window order.
///
/// The window bound is exclusive: trailing audio past the last full window
/// is dropped, never padded, and a file no longer than one clip yields no
/// output. The destination directory must not already exist; re-running
/// requires a clean split tree.
pub fn split_file(input: &Path, dest_dir: &Path) -> Result<usize, DomainError> {
    let mut reader = WavReader::open(input)?;
    let spec = reader.spec();
    let samples: Vec<i16> = reader.samples::<i16>().collect::<Result<_, _>>()?;

    let channels = spec.channels as usize;
    let frames = samples.len() / channels;
    let clip_frames = (spec.sample_rate * CLIP_SECS) as usize;
    let stride_frames = (spec.sample_rate * STRIDE_SECS) as usize;

    if let Some(parent) = dest_dir.parent() {
        fs::create_dir_all(parent)?;
    }
    // A pre-existing destination means a previous run; fail rather than
    // merge stale clips with new ones.
    fs::create_dir(dest_dir)?;

    let mut index = 0usize;
    let mut start = 0usize;
    while start + clip_frames < frames {
        let clip = &samples[start * channels..(start + clip_frames) * channels];
        let path = dest_dir.join(format!("{:05}.wav", index));
        let mut writer = WavWriter::create(&path, spec)?;
        for &sample in clip {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        index += 1;
        start += stride_frames;
    }

    Ok(index)
}
