use clap::Args;
use reelcaps_core::{
    FontFile, FontSize, LetterSpacing, LineSpacing, StrokeColor, StrokeWidth, StyleConfigStore,
};
use serde::Serialize;

/// Subtitle styling flags shared by commands that render.
#[derive(Args, Debug, Clone)]
pub struct StyleArgs {
    /// Font file installed on the renderer (see `reelcaps fonts`)
    #[arg(long)]
    pub font: FontFile,
    /// small, medium or large
    #[arg(long, default_value = "medium")]
    pub font_size: FontSize,
    /// black, white, red or blue
    #[arg(long, default_value = "black")]
    pub stroke_color: StrokeColor,
    /// Stroke width in pixels (1-4)
    #[arg(long, default_value = "2")]
    pub stroke_width: StrokeWidth,
    /// Render subtitles without a background box
    #[arg(long)]
    pub transparent: bool,
    /// normal, wide, wider or widest
    #[arg(long, default_value = "normal")]
    pub letter_spacing: LetterSpacing,
    /// normal, wide, wider or widest
    #[arg(long, default_value = "normal")]
    pub line_spacing: LineSpacing,
}

impl StyleArgs {
    pub fn apply(&self, store: &mut StyleConfigStore) {
        store.select_font(self.font);
        store.set_font_size(self.font_size);
        store.set_stroke_color(self.stroke_color);
        store.set_stroke_width(self.stroke_width);
        store.set_transparent_background(self.transparent);
        store.set_letter_spacing(self.letter_spacing);
        store.set_line_spacing(self.line_spacing);
    }
}

#[derive(Debug, Serialize)]
pub struct FontEntry {
    pub id: &'static str,
}

pub fn font_entries() -> Vec<FontEntry> {
    FontFile::ALL
        .iter()
        .map(|f| FontEntry { id: f.file_name() })
        .collect()
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    let b = bytes as f64;
    if b >= MIB {
        format!("{:.1} MiB", b / MIB)
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}


/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
