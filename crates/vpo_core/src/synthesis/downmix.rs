//! Channel conversion checks and FFmpeg downmix filters.

/// Stereo with Dolby Pro Logic II matrix encoding, center and surrounds folded in.
const STEREO_FILTER: &str =
    "aresample=matrix_encoding=dplii,pan=stereo|FL=FC+0.30*FL+0.30*BL|FR=FC+0.30*FR+0.30*BR";

/// 7.1 to 5.1, side and back channels averaged.
const SURROUND_71_TO_51_FILTER: &str =
    "pan=5.1|FL=FL|FR=FR|FC=FC|LFE=LFE|BL=0.5*BL+0.5*SL|BR=0.5*BR+0.5*SR";

/// Why a channel conversion was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpmixRejected {
    pub source: u32,
    pub target: u32,
}

impl std::fmt::Display for UpmixRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cannot upmix {}ch source to {}ch target",
            self.source, self.target
        )
    }
}

/// Only downmixing (or keeping the layout) is allowed.
pub fn validate_downmix(source: u32, target: u32) -> Result<(), UpmixRejected> {
    if target > source {
        Err(UpmixRejected { source, target })
    } else {
        Ok(())
    }
}

fn layout_name(channels: u32) -> String {
    match channels {
        1 => "mono".to_string(),
        2 => "stereo".to_string(),
        6 => "5.1".to_string(),
        8 => "7.1".to_string(),
        n => format!("{n}c"),
    }
}

/// Filter converting `source` channels to `target`; `None` when they match.
pub fn downmix_filter(source: u32, target: u32) -> Option<String> {
    if source == target {
        return None;
    }
    let filter = match (source, target) {
        (_, 2) => STEREO_FILTER.to_string(),
        (8, 6) => SURROUND_71_TO_51_FILTER.to_string(),
        _ => format!("aformat=channel_layouts={}", layout_name(target)),
    };
    Some(filter)
}
