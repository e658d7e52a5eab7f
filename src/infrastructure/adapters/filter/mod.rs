//! Audio Filter Adapter - 外部音频处理进程

mod ffmpeg_filter;

pub use ffmpeg_filter::FfmpegFilter;
