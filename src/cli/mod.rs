//! CLI module
//!
//! Tokenizes the ffmpeg-style argument vector and holds the usage text.

pub mod args;

pub use args::{is_flag, parse_args};

/// Flags the tool consumes itself; never forwarded to ffmpeg
pub const TOOL_FLAGS: [&str; 5] = ["-h", "-size", "-o", "-keep-size", "-keep-fps"];

/// Usage text printed for `-h` or when no input is given
pub const HELP: &str = "\
Discord video encoder
  * Can take multiple files and process them in sequence
      - All arguments that don't start with `-` are interpreted as input files
  * Re-encodes audio with AAC when
      - Current audio is a different codec
      - Current audio bitrate is > 200kb/s
      - `-ss` start time option is supplied (keeps audio in sync after seeking)
      - Audio takes up more than 15% of the total file size
  * Resizes video when
      - Video is larger than 1080p, resize to 1080p
      - Video is longer than 2 minutes, resize to 720p
      - Pass `-keep-size` to disable resizing
  * If average FPS is > 60, limit to 60
      - Pass `-keep-fps` to disable this
  * Uses two-pass ABR to target a known file size
      - File size is capped by default at 24MB (may be a little off), with a max bit rate of 10Mbit/s
      - Pass `-size [size in MB]` to override default size; e.g. `-size 100` to get a 100MB file
  * Metadata is stripped
  * Use `-o [path]` to define an output path
      - If not specified, the original filename is used with `_discord` appended
      - Ensure it ends with `.mp4` for optimal compatibility
      - Used as output file suffix when processing multiple files
  * All other arguments are passed through to FFmpeg
      - Provided arguments override the default ones
      - `-ss` and `-t` options are useful for trimming video
      - `-an` option to remove audio

Environment:
  DISCORD_ENCODE_CONFIG      settings file (default ./discord-encode.toml)
  DISCORD_ENCODE_FFMPEG      ffmpeg executable
  DISCORD_ENCODE_FFPROBE     ffprobe executable
  DISCORD_ENCODE_LOG         log level (RUST_LOG also honored)
  DISCORD_ENCODE_LOG_FORMAT  pretty or json
";
