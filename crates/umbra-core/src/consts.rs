/// Minimum number of pixel reads per profile to use Rayon parallelism.
pub const PARALLEL_SAMPLE_THRESHOLD: usize = 65_536;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Number of channels in an RGB frame.
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Full sweep of the angular profile, in integer degrees.
pub const FULL_TURN_DEGREES: usize = 360;

/// Circle used when no detection has happened yet in a clip.
pub const DEFAULT_CIRCLE_X: i32 = 680;
pub const DEFAULT_CIRCLE_Y: i32 = 630;
pub const DEFAULT_CIRCLE_RADIUS: u32 = 280;

/// Hough accumulator resolution (inverse ratio to image resolution).
pub const DEFAULT_HOUGH_DP: f32 = 1.0;

/// Minimum distance between detected circle centers, in pixels.
/// Large enough that an eclipse frame yields a single circle.
pub const DEFAULT_HOUGH_MIN_DIST: f32 = 1000.0;

/// Upper Canny threshold on the L1 Sobel magnitude; the lower one is half.
pub const DEFAULT_CANNY_THRESHOLD: f32 = 30.0;

/// Minimum accumulator votes for a center and minimum edge support for a radius.
pub const DEFAULT_ACCUMULATOR_THRESHOLD: u32 = 73;

/// Gaussian sigma applied before edge detection.
pub const DEFAULT_HOUGH_BLUR_SIGMA: f32 = 2.0;

/// Radius window (in bins, each side) when scoring radius candidates.
pub const HOUGH_RADIUS_WINDOW: usize = 1;

/// Frame rate assumed for SER files without a timestamp trailer.
pub const DEFAULT_SOURCE_FRAME_RATE: f64 = 30.0;

/// Frames per second sampled from the clip by default.
pub const DEFAULT_SAMPLE_FPS: f64 = 1.0;

/// Padding added to the tracked radius when the polar sweep radius is not fixed.
pub const DEFAULT_POLAR_MARGIN: u32 = 100;

/// Fixed-point decimals used for the RGB tables.
pub const RGB_TABLE_DECIMALS: usize = 4;

/// Fixed-point decimals used for spatial and polar profile tables.
pub const PROFILE_TABLE_DECIMALS: usize = 0;

/// SER timestamps count 100 ns ticks.
pub const SER_TICKS_PER_SECOND: f64 = 10_000_000.0;
