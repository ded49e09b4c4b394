//! Static font-metric tables for the built-in Helvetica faces.
//!
//! Character widths are in em units (relative to font size), taken from the
//! standard AFM metrics (per-mille over 1000). The exporter embeds only the
//! base-14 Helvetica faces, so the tables cover exactly the guaranteed
//! repertoire: ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

/// Points to millimetres (25.4 / 72).
pub const PT_TO_MM: f32 = 0.352_778;

// ────────────────────────────────────────────────────────────────────────────
// Font styles
// ────────────────────────────────────────────────────────────────────────────

/// The three Helvetica faces the exporter uses. Oblique shares the regular
/// face's metrics (slanting does not change advance widths).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

// ────────────────────────────────────────────────────────────────────────────
// Export configuration
// ────────────────────────────────────────────────────────────────────────────

/// Layout parameters for the exported document: A4, single column, fixed
/// margins, per-section font sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub font_sizes: FontSizes,
}

/// Font-size table keyed by section type, in points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FontSizes {
    pub name: f32,
    pub section_title: f32,
    pub job_title: f32,
    pub body: f32,
}

pub fn default_export_config() -> ExportConfig {
    ExportConfig {
        page_width_mm: 210.0,
        page_height_mm: 297.0,
        margin_mm: 15.0,
        font_sizes: FontSizes {
            name: 16.0,
            section_title: 12.0,
            job_title: 11.0,
            body: 10.0,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face.
///
/// `widths[i]` = width of ASCII character `(i + 32)` in em units, covering
/// 0x20 (space) through 0x7E (~).
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback for anything outside the table. The sanitizer removes
    /// non-ASCII before layout, so this only covers defensive paths.
    average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Rendered width in millimetres at the given font size.
    pub fn measure_mm(&self, s: &str, font_size_pt: f32) -> f32 {
        self.measure_str(s) * font_size_pt * PT_TO_MM
    }
}

/// Returns the static metric table for a given face.
pub fn metrics_for(style: FontStyle) -> &'static FontMetricTable {
    match style {
        FontStyle::Regular | FontStyle::Oblique => &HELVETICA_TABLE,
        FontStyle::Bold => &HELVETICA_BOLD_TABLE,
    }
}

/// Greedy word-wrap: splits `s` into lines whose rendered width at
/// `font_size_pt` fits within `max_width_mm`. A single word wider than the
/// line goes on its own line rather than being split mid-word.
pub fn wrap_words(s: &str, style: FontStyle, font_size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let metrics = metrics_for(style);
    let max_width_em = max_width_mm / (font_size_pt * PT_TO_MM);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in s.split_whitespace() {
        let word_width = metrics.measure_str(word);

        if !current.is_empty() && current_width + metrics.space_width + word_width > max_width_em {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_width += metrics.space_width;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each, AFM / 1000)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.51,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.56,
    space_width: 0.278,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
