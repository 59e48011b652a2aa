//! Effect identifiers the rewrite tables and the tile scaler key on.

/// Venetian-blinds transition.
pub const BLINDS: &str = "com.apple.iWork.Keynote.BLTBlinds";
/// Tile-mosaic flip transition.
pub const MOSAIC_FLIP: &str = "com.apple.iWork.Keynote.BLTMosaicFlip";
/// Grid transition.
pub const GRID: &str = "apple:apple-grid";
/// Swoosh transition.
pub const SWOOSH: &str = "com.apple.iWork.Keynote.BLTSwoosh";
/// Repeated wobble emphasis.
pub const JIGGLE: &str = "apple:action-jiggle";
/// Falling-page transition.
pub const FALL: &str = "apple:fall";
/// Scale transition.
pub const SCALE: &str = "apple:scale";
/// Swap transition.
pub const SWAP: &str = "com.apple.iWork.Keynote.KLNSwap";
/// Bounce transition.
pub const BOUNCE: &str = "apple:bounce";
/// Slide transition.
pub const SLIDE: &str = "apple:slide";
/// Pivot transition.
pub const PIVOT: &str = "apple:pivot";
/// Opening-doors transition.
pub const DOORWAY: &str = "apple:doorway";
/// Rotating cube transition.
pub const CUBE: &str = "apple:3D-cube";
/// Reflection transition.
pub const REFLECTION: &str = "com.apple.iWork.Keynote.BLTReflection";
/// Revolve transition.
pub const REVOLVE: &str = "apple:revolve";
/// Revolving-door transition.
pub const REVOLVING_DOOR: &str = "com.apple.iWork.Keynote.BLTRevolvingDoor";
/// Page-flip transition.
pub const FLIP_THROUGH: &str = "apple:FlipThrough";

/// Depth channel carrying z-order markers.
pub const PROP_TRANSLATION_Z: &str = "transform.translation.z";
/// Visibility toggle channel.
pub const PROP_HIDDEN: &str = "hidden";
/// Opacity channel.
pub const PROP_OPACITY: &str = "opacity";
/// In-plane rotation channel.
pub const PROP_ROTATION_Z: &str = "transform.rotation.z";
/// Position channel.
pub const PROP_POSITION: &str = "position";
