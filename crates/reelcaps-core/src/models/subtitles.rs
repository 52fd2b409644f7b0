//! SRT subtitles returned alongside a rendered video.

use crate::error::{SessionError, SessionResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCue {
    pub index: u32,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

impl SubtitleCue {
    pub fn start_seconds(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }
}

/// Parsed subtitle track. The raw text is kept so it can be written out as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    raw: String,
    cues: Vec<SubtitleCue>,
}

impl SubtitleTrack {
    pub fn parse(raw: &str) -> SessionResult<Self> {
        let normalized = raw.replace("\r\n", "\n");
        let mut cues = Vec::new();

        for block in normalized.split("\n\n") {
            let mut lines = block.lines().filter(|l| !l.trim().is_empty());
            let Some(index_line) = lines.next() else {
                continue;
            };

            let index = index_line.trim().parse::<u32>().map_err(|_| {
                SessionError::Decode(format!("Invalid subtitle index: {}", index_line))
            })?;

            let timing = lines.next().ok_or_else(|| {
                SessionError::Decode(format!("Subtitle cue {} has no timing line", index))
            })?;
            let (start, end) = timing.split_once("-->").ok_or_else(|| {
                SessionError::Decode(format!("Invalid subtitle timing: {}", timing))
            })?;

            let text = lines.map(str::trim).collect::<Vec<_>>().join("\n");

            cues.push(SubtitleCue {
                index,
                start_ms: parse_timestamp(start.trim())?,
                end_ms: parse_timestamp(end.trim())?,
                text,
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            cues,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn cues(&self) -> &[SubtitleCue] {
        &self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Plain transcript: cue texts joined by spaces.
    pub fn transcript(&self) -> String {
        self.cues
            .iter()
            .map(|c| c.text.replace('\n', " "))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Parse `HH:MM:SS,mmm` into milliseconds.
pub fn parse_timestamp(timestamp: &str) -> SessionResult<u64> {
    let invalid = || SessionError::Decode(format!("Invalid subtitle timestamp: {}", timestamp));

    let (clock, millis) = timestamp.split_once(',').ok_or_else(invalid)?;
    let mut parts = clock.split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let hours: u64 = h.parse().map_err(|_| invalid())?;
    let minutes: u64 = m.parse().map_err(|_| invalid())?;
    let seconds: u64 = s.parse().map_err(|_| invalid())?;
    let millis: u64 = millis.parse().map_err(|_| invalid())?;
    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(invalid());
    }

    hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1000 + millis))
        .ok_or_else(invalid)
}

/// Format milliseconds as `HH:MM:SS,mmm`.
pub fn format_timestamp(total_ms: u64) -> String {
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}
