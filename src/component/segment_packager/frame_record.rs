use serde::{Deserialize, Deserializer, Serialize};

/// frame 列表中的純量欄位可以是字串或數字，例如 `"video_rate": 25`
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(text) => text,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(String::from)
        .unwrap_or_default())
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

/// 每個 run 內固定、只會在 run 邊界改變的技術參數
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalAttributes {
    /// 例如 "720x480"
    #[serde(deserialize_with = "string_or_number")]
    pub frame_size: String,
    /// 例如 "30000/1001"
    #[serde(deserialize_with = "string_or_number")]
    pub video_rate: String,
    /// 例如 "4:1:1"
    #[serde(deserialize_with = "string_or_number")]
    pub chroma_subsampling: String,
    /// 例如 "4/3"
    #[serde(deserialize_with = "string_or_number")]
    pub aspect_ratio: String,
    /// 例如 "48000"
    #[serde(deserialize_with = "string_or_number")]
    pub audio_rate: String,
    pub channel_count: Option<u32>,
}

/// 分析器輸出的單一 frame 資訊，依串流順序排列
///
/// `sequence_index` 與 `pts` 為必要欄位，保留 `Option` 是為了讓規劃器
/// 能明確回報缺漏，而不是在反序列化時默默補上預設值。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameRecord {
    pub sequence_index: Option<usize>,
    pub index_in_sequence: usize,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub pts: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub end_pts_of_run: String,
    #[serde(deserialize_with = "string_or_number")]
    pub timecode: String,
    #[serde(deserialize_with = "string_or_number")]
    pub recording_datetime: String,
    #[serde(flatten)]
    pub technical: TechnicalAttributes,
    pub is_recording_start: bool,
    pub recording_time_discontinuous: bool,
    pub timecode_discontinuous: bool,
}

impl FrameRecord {
    #[must_use]
    pub fn new(sequence_index: usize, index_in_sequence: usize, pts: impl Into<String>) -> Self {
        Self {
            sequence_index: Some(sequence_index),
            index_in_sequence,
            pts: Some(pts.into()),
            ..Self::default()
        }
    }

    /// 是否為實體錄製段的第一個 frame
    #[must_use]
    pub const fn starts_sequence(&self) -> bool {
        self.index_in_sequence == 0
    }

    /// 是否與 `previous` 屬於同一個未中斷的 run
    #[must_use]
    pub fn continues_run_of(&self, previous: &Self) -> bool {
        !self.starts_sequence() && self.sequence_index == previous.sequence_index
    }
}
