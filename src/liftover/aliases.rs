//! Chromosome label normalization.
//!
//! Marker tables label chromosomes in several ways:
//! - PLINK/HapMap numeric codes: 1, ..., 22, 23 (X), 24 (Y), 25 (XY), 26 (MT)
//! - Ensembl: 1, ..., 22, X, Y, MT
//! - UCSC: chr1, ..., chr22, chrX, chrY, chrM
//!
//! [`Chromosome`] is the canonical form; [`ChromStyle`] picks how it is
//! rendered. Labels outside the recognized set (unplaced contigs, patches)
//! are never dropped: they pass through unchanged and the caller records a
//! warning.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering convention for chromosome labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChromStyle {
    /// 1, ..., 22, X, Y, XY, MT
    #[default]
    Canonical,
    /// chr1, ..., chr22, chrX, chrY, chrM (XY renders as chrX)
    Ucsc,
    /// 1, ..., 22, 23, 24, 25, 26
    PlinkNumeric,
}

impl FromStr for ChromStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "canonical" | "ensembl" => Ok(ChromStyle::Canonical),
            "ucsc" | "chr" => Ok(ChromStyle::Ucsc),
            "plink-numeric" | "plink" | "numeric" => Ok(ChromStyle::PlinkNumeric),
            other => Err(format!(
                "unknown chromosome style '{}' (expected canonical, ucsc or plink-numeric)",
                other
            )),
        }
    }
}

/// A recognized human chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chromosome {
    /// Autosome 1..=22
    Autosome(u8),
    X,
    Y,
    /// Pseudo-autosomal region of X (PLINK code 25)
    XY,
    /// Mitochondrial
    MT,
}

impl Chromosome {
    /// Parse any recognized label, ignoring case and an optional `chr` prefix.
    ///
    /// ```
    /// use ferro_liftover::liftover::Chromosome;
    ///
    /// assert_eq!(Chromosome::parse("23"), Some(Chromosome::X));
    /// assert_eq!(Chromosome::parse("chrM"), Some(Chromosome::MT));
    /// assert_eq!(Chromosome::parse("chrUn_gl000220"), None);
    /// ```
    pub fn parse(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        let bare = match trimmed.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &trimmed[3..],
            _ => trimmed,
        };

        match bare.to_ascii_uppercase().as_str() {
            "X" | "23" => Some(Chromosome::X),
            "Y" | "24" => Some(Chromosome::Y),
            "XY" | "25" => Some(Chromosome::XY),
            "MT" | "M" | "26" => Some(Chromosome::MT),
            digits => match digits.parse::<u8>() {
                // "01" is not a label anyone writes; keep it unrecognized
                Ok(n) if (1..=22).contains(&n) && !digits.starts_with('0') => {
                    Some(Chromosome::Autosome(n))
                }
                _ => None,
            },
        }
    }

    /// Render in the given style.
    pub fn render(&self, style: ChromStyle) -> String {
        match (style, self) {
            (ChromStyle::Canonical, Chromosome::Autosome(n)) => n.to_string(),
            (ChromStyle::Canonical, Chromosome::X) => "X".to_string(),
            (ChromStyle::Canonical, Chromosome::Y) => "Y".to_string(),
            (ChromStyle::Canonical, Chromosome::XY) => "XY".to_string(),
            (ChromStyle::Canonical, Chromosome::MT) => "MT".to_string(),

            (ChromStyle::Ucsc, Chromosome::Autosome(n)) => format!("chr{}", n),
            (ChromStyle::Ucsc, Chromosome::X | Chromosome::XY) => "chrX".to_string(),
            (ChromStyle::Ucsc, Chromosome::Y) => "chrY".to_string(),
            (ChromStyle::Ucsc, Chromosome::MT) => "chrM".to_string(),

            (ChromStyle::PlinkNumeric, Chromosome::Autosome(n)) => n.to_string(),
            (ChromStyle::PlinkNumeric, Chromosome::X) => "23".to_string(),
            (ChromStyle::PlinkNumeric, Chromosome::Y) => "24".to_string(),
            (ChromStyle::PlinkNumeric, Chromosome::XY) => "25".to_string(),
            (ChromStyle::PlinkNumeric, Chromosome::MT) => "26".to_string(),
        }
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(ChromStyle::Canonical))
    }
}

/// Result of normalizing one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLabel {
    /// Label rendered in the requested style, or the input unchanged.
    pub label: String,
    /// False when the input was not a recognized chromosome.
    pub recognized: bool,
}

/// Normalize `label` into `style`; unrecognized labels pass through unchanged.
///
/// ```
/// use ferro_liftover::liftover::{normalize_label, ChromStyle};
///
/// assert_eq!(normalize_label("23", ChromStyle::Canonical).label, "X");
/// assert_eq!(normalize_label("24", ChromStyle::Ucsc).label, "chrY");
///
/// let unplaced = normalize_label("GL000192.1", ChromStyle::Ucsc);
/// assert_eq!(unplaced.label, "GL000192.1");
/// assert!(!unplaced.recognized);
/// ```
pub fn normalize_label(label: &str, style: ChromStyle) -> NormalizedLabel {
    match Chromosome::parse(label) {
        Some(chrom) => NormalizedLabel {
            label: chrom.render(style),
            recognized: true,
        },
        None => NormalizedLabel {
            label: label.to_string(),
            recognized: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autosomes() {
        for n in 1..=22u8 {
            let expected = Some(Chromosome::Autosome(n));
            assert_eq!(Chromosome::parse(&n.to_string()), expected);
            assert_eq!(Chromosome::parse(&format!("chr{}", n)), expected);
            assert_eq!(Chromosome::parse(&format!("CHR{}", n)), expected);
        }
        assert_eq!(Chromosome::parse("0"), None);
        assert_eq!(Chromosome::parse("27"), None);
        assert_eq!(Chromosome::parse("01"), None);
    }

    #[test]
    fn test_sex_chromosome_codes() {
        assert_eq!(normalize_label("23", ChromStyle::Canonical).label, "X");
        assert_eq!(normalize_label("24", ChromStyle::Canonical).label, "Y");
        assert_eq!(normalize_label("25", ChromStyle::Canonical).label, "XY");
        assert_eq!(normalize_label("26", ChromStyle::Canonical).label, "MT");
        assert_eq!(normalize_label("23", ChromStyle::Ucsc).label, "chrX");
        assert_eq!(normalize_label("24", ChromStyle::Ucsc).label, "chrY");
    }

    #[test]
    fn test_mitochondrial() {
        assert_eq!(Chromosome::parse("chrM"), Some(Chromosome::MT));
        assert_eq!(Chromosome::parse("MT"), Some(Chromosome::MT));
        assert_eq!(Chromosome::MT.render(ChromStyle::Ucsc), "chrM");
        assert_eq!(Chromosome::MT.render(ChromStyle::PlinkNumeric), "26");
    }

    #[test]
    fn test_pseudo_autosomal_renders_as_x_in_ucsc() {
        assert_eq!(Chromosome::XY.render(ChromStyle::Ucsc), "chrX");
        assert_eq!(Chromosome::XY.render(ChromStyle::PlinkNumeric), "25");
    }

    #[test]
    fn test_plink_numeric_roundtrip() {
        for label in ["1", "22", "23", "24", "25", "26"] {
            let chrom = Chromosome::parse(label).unwrap();
            assert_eq!(chrom.render(ChromStyle::PlinkNumeric), label);
        }
    }

    #[test]
    fn test_unrecognized_passthrough() {
        let out = normalize_label("chrUn_gl000220", ChromStyle::Canonical);
        assert_eq!(out.label, "chrUn_gl000220");
        assert!(!out.recognized);
        let out = normalize_label("", ChromStyle::Ucsc);
        assert!(!out.recognized);
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("ucsc".parse::<ChromStyle>().unwrap(), ChromStyle::Ucsc);
        assert_eq!("Ensembl".parse::<ChromStyle>().unwrap(), ChromStyle::Canonical);
        assert_eq!("plink".parse::<ChromStyle>().unwrap(), ChromStyle::PlinkNumeric);
        assert!("bogus".parse::<ChromStyle>().is_err());
    }
}
