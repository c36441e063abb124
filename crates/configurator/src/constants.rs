/// Opacity of the currently selected part.
pub const HIGHLIGHT_OPACITY: f32 = 0.8;

/// Opacity of every part that is not selected.
pub const OPAQUE: f32 = 1.0;

/// Order summary value when no palette color was picked.
pub const DEFAULT_COLOR_LABEL: &str = "Default Color";

/// Order summary value when no fabric swatch was picked.
pub const DEFAULT_FABRIC_LABEL: &str = "Default Fabric";

/// Order summary value when the personalization field is empty.
pub const DEFAULT_PERSONALIZATION_LABEL: &str = "None";

/// Epsilon for floating point comparisons in ray intersection.
pub const RAY_EPSILON: f32 = 1e-6;

/// Number of recent warnings a session keeps for inspection.
pub const MAX_RECORDED_WARNINGS: usize = 64;
