use crate::params::FieldKind::{Bool, DateTime, DateTimeList, Float, Int, SourceId, Str};
use crate::params::{FieldSpec, OutputType, Parameters};

/// The Helioviewer API endpoints this crate can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GetJP2Image,
    GetJP2Header,
    GetJPX,
    GetJPXClosestToMidPoint,
    GetStatus,
    GetClosestImage,
    GetDataSources,
    TakeScreenshot,
    DownloadScreenshot,
    QueueMovie,
    ReQueueMovie,
    GetMovieStatus,
    DownloadMovie,
    GetNewsFeed,
    ShortenURL,
    GetTile,
}

const GET_JP2_IMAGE: &[FieldSpec] = &[
    FieldSpec::required("date", DateTime),
    FieldSpec::required("sourceId", SourceId),
    FieldSpec::flag("jpip", false),
    FieldSpec::flag("json", false),
];

const GET_JP2_HEADER: &[FieldSpec] = &[
    FieldSpec::required("id", Int),
    FieldSpec::optional("callback", Str),
];

const GET_JPX: &[FieldSpec] = &[
    FieldSpec::required("startTime", DateTime),
    FieldSpec::required("endTime", DateTime),
    FieldSpec::required("sourceId", SourceId),
    FieldSpec::flag("linked", false),
    FieldSpec::flag("verbose", false),
    FieldSpec::flag("jpip", false),
    FieldSpec::optional("cadence", Int),
];

const GET_JPX_CLOSEST_TO_MID_POINT: &[FieldSpec] = &[
    FieldSpec::required("startTimes", DateTimeList),
    FieldSpec::required("endTimes", DateTimeList),
    FieldSpec::required("sourceId", SourceId),
    FieldSpec::flag("linked", false),
    FieldSpec::flag("verbose", false),
    FieldSpec::flag("jpip", false),
];

const GET_STATUS: &[FieldSpec] = &[];

const GET_CLOSEST_IMAGE: &[FieldSpec] = &[
    FieldSpec::required("date", DateTime),
    FieldSpec::required("sourceId", SourceId),
    FieldSpec::optional("callback", Str),
];

const GET_DATA_SOURCES: &[FieldSpec] = &[
    FieldSpec::flag("verbose", false),
    FieldSpec::optional("enable", Str),
    FieldSpec::optional("callback", Str),
];

const TAKE_SCREENSHOT: &[FieldSpec] = &[
    FieldSpec::required("date", DateTime),
    FieldSpec::required("imageScale", Float),
    FieldSpec::required("layers", Str),
    FieldSpec::optional("events", Str),
    FieldSpec::flag("eventLabels", false),
    FieldSpec::flag("scale", false),
    FieldSpec::optional("scaleType", Str),
    FieldSpec::optional("scaleX", Int),
    FieldSpec::optional("scaleY", Int),
    FieldSpec::optional("width", Str),
    FieldSpec::optional("height", Str),
    FieldSpec::optional("x0", Str),
    FieldSpec::optional("y0", Str),
    FieldSpec::optional("x1", Str),
    FieldSpec::optional("y1", Str),
    FieldSpec::optional("x2", Str),
    FieldSpec::optional("y2", Str),
    FieldSpec::flag("display", false),
    FieldSpec::flag("watermark", false),
    FieldSpec::optional("callback", Str),
];

const DOWNLOAD_SCREENSHOT: &[FieldSpec] = &[FieldSpec::required("id", Int)];

const QUEUE_MOVIE: &[FieldSpec] = &[
    FieldSpec::required("startTime", DateTime),
    FieldSpec::required("endTime", DateTime),
    FieldSpec::required("layers", Str),
    FieldSpec::required("events", Str),
    FieldSpec::required("eventsLabels", Bool),
    FieldSpec::required("imageScale", Float),
    FieldSpec::str_or("format", "mp4"),
    FieldSpec::str_or("frameRate", "15"),
    FieldSpec::optional("maxFrames", Str),
    FieldSpec::optional("scale", Bool),
    FieldSpec::optional("scaleType", Str),
    FieldSpec::optional("scaleX", Float),
    FieldSpec::optional("scaleY", Float),
    FieldSpec::optional("movieLength", Float),
    FieldSpec::flag("watermark", true),
    FieldSpec::optional("width", Str),
    FieldSpec::optional("height", Str),
    FieldSpec::optional("x0", Str),
    FieldSpec::optional("y0", Str),
    FieldSpec::optional("x1", Str),
    FieldSpec::optional("y1", Str),
    FieldSpec::optional("x2", Str),
    FieldSpec::optional("y2", Str),
    FieldSpec::optional("callback", Str),
    FieldSpec::int_or("size", 0),
    FieldSpec::optional("movieIcons", Int),
    FieldSpec::optional("followViewport", Int),
    FieldSpec::optional("reqObservationDate", DateTime),
];

const RE_QUEUE_MOVIE: &[FieldSpec] = &[
    FieldSpec::required("id", Str),
    FieldSpec::flag("force", false),
];

const GET_MOVIE_STATUS: &[FieldSpec] = &[
    FieldSpec::required("id", Str),
    FieldSpec::required("format", Str),
    FieldSpec::flag("verbose", false),
    FieldSpec::optional("callback", Str),
    FieldSpec::optional("token", Str),
];

const DOWNLOAD_MOVIE: &[FieldSpec] = &[
    FieldSpec::required("id", Str),
    FieldSpec::required("format", Str),
    FieldSpec::flag("hq", false),
];

const GET_NEWS_FEED: &[FieldSpec] = &[FieldSpec::optional("callback", Str)];

const SHORTEN_URL: &[FieldSpec] = &[
    FieldSpec::required("queryString", Str),
    FieldSpec::optional("callback", Str),
];

const GET_TILE: &[FieldSpec] = &[
    FieldSpec::required("id", Int),
    FieldSpec::required("x", Int),
    FieldSpec::required("y", Int),
    FieldSpec::required("imageScale", Int),
    FieldSpec::optional("difference", Int),
    FieldSpec::optional("diffCount", Int),
    FieldSpec::optional("diffTime", Int),
    FieldSpec::optional("baseDiffTime", DateTime),
];

impl Endpoint {
    pub const ALL: &'static [Endpoint] = &[
        Endpoint::GetJP2Image,
        Endpoint::GetJP2Header,
        Endpoint::GetJPX,
        Endpoint::GetJPXClosestToMidPoint,
        Endpoint::GetStatus,
        Endpoint::GetClosestImage,
        Endpoint::GetDataSources,
        Endpoint::TakeScreenshot,
        Endpoint::DownloadScreenshot,
        Endpoint::QueueMovie,
        Endpoint::ReQueueMovie,
        Endpoint::GetMovieStatus,
        Endpoint::DownloadMovie,
        Endpoint::GetNewsFeed,
        Endpoint::ShortenURL,
        Endpoint::GetTile,
    ];

    /// Path segment used in the request URL.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::GetJP2Image => "getJP2Image",
            Endpoint::GetJP2Header => "getJP2Header",
            Endpoint::GetJPX => "getJPX",
            Endpoint::GetJPXClosestToMidPoint => "getJPXClosestToMidPoint",
            Endpoint::GetStatus => "getStatus",
            Endpoint::GetClosestImage => "getClosestImage",
            Endpoint::GetDataSources => "getDataSources",
            Endpoint::TakeScreenshot => "takeScreenshot",
            Endpoint::DownloadScreenshot => "downloadScreenshot",
            Endpoint::QueueMovie => "queueMovie",
            Endpoint::ReQueueMovie => "reQueueMovie",
            Endpoint::GetMovieStatus => "getMovieStatus",
            Endpoint::DownloadMovie => "downloadMovie",
            Endpoint::GetNewsFeed => "getNewsFeed",
            Endpoint::ShortenURL => "shortenURL",
            Endpoint::GetTile => "getTile",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Endpoint::ALL.iter().copied().find(|e| e.name() == name)
    }

    /// Declared fields, in the order they are sent.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Endpoint::GetJP2Image => GET_JP2_IMAGE,
            Endpoint::GetJP2Header => GET_JP2_HEADER,
            Endpoint::GetJPX => GET_JPX,
            Endpoint::GetJPXClosestToMidPoint => GET_JPX_CLOSEST_TO_MID_POINT,
            Endpoint::GetStatus => GET_STATUS,
            Endpoint::GetClosestImage => GET_CLOSEST_IMAGE,
            Endpoint::GetDataSources => GET_DATA_SOURCES,
            Endpoint::TakeScreenshot => TAKE_SCREENSHOT,
            Endpoint::DownloadScreenshot => DOWNLOAD_SCREENSHOT,
            Endpoint::QueueMovie => QUEUE_MOVIE,
            Endpoint::ReQueueMovie => RE_QUEUE_MOVIE,
            Endpoint::GetMovieStatus => GET_MOVIE_STATUS,
            Endpoint::DownloadMovie => DOWNLOAD_MOVIE,
            Endpoint::GetNewsFeed => GET_NEWS_FEED,
            Endpoint::ShortenURL => SHORTEN_URL,
            Endpoint::GetTile => GET_TILE,
        }
    }

    /// Resolves how the response to `params` must be decoded.
    pub(crate) fn output_type(self, params: &Parameters) -> OutputType {
        let callback = params.is_set("callback");
        match self {
            Endpoint::GetJP2Image => match (params.flag("jpip"), params.flag("json")) {
                (false, _) => OutputType::Raw,
                (true, false) => OutputType::String,
                (true, true) => OutputType::Json,
            },
            Endpoint::GetJPX | Endpoint::GetJPXClosestToMidPoint => {
                match (params.flag("jpip"), params.flag("verbose")) {
                    (false, false) => OutputType::Raw,
                    (true, false) => OutputType::String,
                    (_, true) => OutputType::Json,
                }
            }
            Endpoint::GetJP2Header if callback => OutputType::String,
            Endpoint::GetJP2Header => OutputType::Raw,
            Endpoint::GetClosestImage
            | Endpoint::GetDataSources
            | Endpoint::GetMovieStatus
            | Endpoint::ShortenURL
                if callback =>
            {
                OutputType::String
            }
            Endpoint::GetClosestImage
            | Endpoint::GetDataSources
            | Endpoint::GetMovieStatus
            | Endpoint::ShortenURL => OutputType::Json,
            Endpoint::GetNewsFeed => OutputType::String,
            Endpoint::TakeScreenshot if params.flag("display") => OutputType::Raw,
            Endpoint::TakeScreenshot => OutputType::Json,
            Endpoint::GetStatus | Endpoint::QueueMovie | Endpoint::ReQueueMovie => OutputType::Json,
            Endpoint::DownloadScreenshot | Endpoint::DownloadMovie | Endpoint::GetTile => {
                OutputType::Raw
            }
        }
    }
}
