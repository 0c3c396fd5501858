/// One downloadable rendition of a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Resolution label such as `720p`; `None` for audio-only formats.
    pub resolution: Option<String>,
    /// Container subtype, e.g. `mp4`.
    pub subtype: String,
    /// Total byte size, when the resolver knows it.
    pub filesize: Option<u64>,
    /// Direct source locator of the bytes.
    pub url: String,
    /// Audio and video in one file; no muxing needed.
    pub progressive: bool,
}

impl StreamDescriptor {
    pub fn is_progressive_mp4(&self) -> bool {
        self.progressive && self.subtype == "mp4"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDescriptor {
    pub title: String,
    /// In the order the resolver listed them.
    pub streams: Vec<StreamDescriptor>,
}
