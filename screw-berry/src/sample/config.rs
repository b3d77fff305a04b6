//! 样本配置. 每次分析构建一次, 之后只读.

use super::Calibration;
use crate::consts::DEFAULT_ROI_SIZE_UM;
use crate::label::LabelDictionary;
use crate::{Idx2d, MorphError, MorphResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
#[inline]
fn default_roi_size() -> f64 {
    DEFAULT_ROI_SIZE_UM
}

/// 一个样本的完整配置.
///
/// 通过 [`SampleConfig::builder`] 构建时会检查所有字段;
/// 反序列化得到的配置需要调用 [`SampleConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleConfig {
    /// 样本名称.
    pub name: String,

    /// 植入至扫描经过的天数.
    pub num_days: u32,

    /// 参考扫描 (未降解骨钉) 的图像路径模式, 如 `ref/*.tif`.
    pub reference: String,

    /// 目标扫描 (降解骨钉 + 骨) 的图像路径模式.
    pub target: String,

    /// 若非空, 加载后对目标扫描中的这些标签做中值滤波平滑.
    #[cfg_attr(feature = "serde", serde(default))]
    pub smooth: Option<Vec<u8>>,

    /// 各向同性像素尺寸, 单位为微米.
    pub pixel_size: f64,

    /// 标签字典. 缺省时使用 [`LabelDictionary::default`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub labels: LabelDictionary,

    /// 切片形状 (H, W).
    pub img_size: Idx2d,

    /// BV/TV 的 ROI 半径, 单位为微米.
    #[cfg_attr(feature = "serde", serde(default = "default_roi_size"))]
    pub roi_size: f64,
}

impl SampleConfig {
    /// 以样本名 `name` 开始构建配置.
    #[inline]
    pub fn builder(name: impl Into<String>) -> SampleConfigBuilder {
        SampleConfigBuilder::new(name)
    }

    /// 由配置得到标定信息.
    #[inline]
    pub fn calibration(&self) -> MorphResult<Calibration> {
        Calibration::new(self.pixel_size, self.num_days, self.img_size)
    }

    /// 检查配置是否合法.
    pub fn validate(&self) -> MorphResult<()> {
        self.calibration()?;
        self.labels.validate()?;
        if !(self.roi_size.is_finite() && self.roi_size >= 0.0) {
            return Err(MorphError::InvalidCalibration("roi size must be non-negative"));
        }
        if let Some(l) = self
            .smooth
            .iter()
            .flatten()
            .find(|l| !self.labels.contains_code(**l))
        {
            return Err(MorphError::UnknownLabel(*l));
        }
        Ok(())
    }
}

/// [`SampleConfig`] 构建器.
#[derive(Clone, Debug)]
pub struct SampleConfigBuilder {
    name: String,
    num_days: u32,
    reference: Option<String>,
    target: Option<String>,
    smooth: Option<Vec<u8>>,
    pixel_size: Option<f64>,
    labels: LabelDictionary,
    img_size: Option<Idx2d>,
    roi_size: f64,
}

impl SampleConfigBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_days: 0,
            reference: None,
            target: None,
            smooth: None,
            pixel_size: None,
            labels: LabelDictionary::default(),
            img_size: None,
            roi_size: DEFAULT_ROI_SIZE_UM,
        }
    }

    /// 植入天数. 默认为 0.
    pub fn num_days(mut self, num_days: u32) -> Self {
        self.num_days = num_days;
        self
    }

    /// 参考扫描路径模式. 必填.
    pub fn reference(mut self, pattern: impl Into<String>) -> Self {
        self.reference = Some(pattern.into());
        self
    }

    /// 目标扫描路径模式. 必填.
    pub fn target(mut self, pattern: impl Into<String>) -> Self {
        self.target = Some(pattern.into());
        self
    }

    /// 对目标扫描中的 `labels` 做平滑.
    pub fn smooth(mut self, labels: impl Into<Vec<u8>>) -> Self {
        self.smooth = Some(labels.into());
        self
    }

    /// 像素尺寸 (微米). 必填.
    pub fn pixel_size(mut self, pixel_size: f64) -> Self {
        self.pixel_size = Some(pixel_size);
        self
    }

    /// 标签字典. 默认为 [`LabelDictionary::default`].
    pub fn labels(mut self, labels: LabelDictionary) -> Self {
        self.labels = labels;
        self
    }

    /// 切片形状 (H, W). 必填.
    pub fn img_size(mut self, img_size: Idx2d) -> Self {
        self.img_size = Some(img_size);
        self
    }

    /// BV/TV 的 ROI 半径 (微米). 默认为 [`DEFAULT_ROI_SIZE_UM`].
    pub fn roi_size(mut self, roi_size: f64) -> Self {
        self.roi_size = roi_size;
        self
    }

    /// 完成构建. 缺少必填字段或字段非法时返回 `Err`.
    pub fn build(self) -> MorphResult<SampleConfig> {
        let ans = SampleConfig {
            name: self.name,
            num_days: self.num_days,
            reference: self.reference.ok_or(MorphError::MissingConfig("reference"))?,
            target: self.target.ok_or(MorphError::MissingConfig("target"))?,
            smooth: self.smooth,
            pixel_size: self.pixel_size.ok_or(MorphError::MissingConfig("pixel_size"))?,
            labels: self.labels,
            img_size: self.img_size.ok_or(MorphError::MissingConfig("img_size"))?,
            roi_size: self.roi_size,
        };
        ans.validate()?;
        Ok(ans)
    }
}
