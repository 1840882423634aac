use sha2::{Digest, Sha256};

const PALETTE: [(u8, u8, u8); 12] = [
    (54, 162, 235),
    (255, 99, 132),
    (255, 159, 64),
    (75, 192, 192),
    (153, 102, 255),
    (255, 205, 86),
    (201, 203, 207),
    (46, 204, 113),
    (231, 76, 60),
    (52, 73, 94),
    (241, 196, 15),
    (142, 68, 173),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesColor {
    pub background: String,
    pub border: String,
}

/// Palette entry picked from a SHA-256 digest of the label, so a service
/// keeps its color across renders and reloads.
pub fn color_for(label: &str) -> SeriesColor {
    let digest = Sha256::digest(label.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let index = (u64::from_be_bytes(prefix) % PALETTE.len() as u64) as usize;
    let (r, g, b) = PALETTE[index];

    SeriesColor {
        background: format!("rgba({r}, {g}, {b}, 0.7)"),
        border: format!("rgba({r}, {g}, {b}, 1)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_stable_per_label() {
        assert_eq!(color_for("Amazon EC2"), color_for("Amazon EC2"));
        let color = color_for("Amazon S3");
        assert!(color.background.starts_with("rgba("));
        assert!(color.background.ends_with(", 0.7)"));
        assert!(color.border.ends_with(", 1)"));
    }

    #[test]
    fn test_border_matches_background_channels() {
        let color = color_for("AWS Lambda");
        let channels = |s: &str| s.rsplit_once(',').map(|(head, _)| head.to_string());
        assert_eq!(channels(&color.background), channels(&color.border));
    }
}
