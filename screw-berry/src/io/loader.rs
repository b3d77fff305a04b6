//! 标签图像栈的加载.

use crate::{LabelVolume, MorphError};
use image::{ColorType, GenericImageView};
use itertools::Itertools;
use ndarray::Array2;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 加载样本时的错误. 读取失败与形态学校验失败是不同的变体.
#[derive(Debug, Error)]
pub enum LoadError {
    /// 路径模式没有匹配到任何文件.
    #[error("empty input: pattern `{0}` matches no file")]
    EmptyInput(String),

    /// 路径模式语法错误.
    #[error("invalid path pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// 遍历匹配结果时无法访问某个路径.
    #[error("unreadable path: {0}")]
    Glob(#[from] glob::GlobError),

    /// 图像解码失败.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// `.npy` 文件读取失败.
    #[error("npy error: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),

    /// 彩色或浮点图像无法解释为标签图像.
    #[error("`{path}`: unsupported color type {color:?}, expected a gray label image")]
    UnsupportedColor {
        /// 图像路径.
        path: PathBuf,
        /// 图像的颜色类型.
        color: ColorType,
    },

    /// 16 位图像中的像素值超出了标签编码的范围.
    #[error("`{path}`: pixel value {value} does not fit into an 8-bit label")]
    LabelOutOfRange {
        /// 图像路径.
        path: PathBuf,
        /// 越界的像素值.
        value: u16,
    },

    /// 加载完成后的校验失败.
    #[error(transparent)]
    Morph(#[from] MorphError),
}

/// 将一张单通道标签图像读取为 (H, W) 数组.
///
/// 只接受灰度图像 (可带 alpha 通道, alpha 被忽略). 8 位图像按原样读取;
/// 16 位图像要求所有像素值不超过 255, 否则返回 `Err(LabelOutOfRange)`.
/// 彩色与浮点图像返回 `Err(UnsupportedColor)`.
pub fn load_slice<P: AsRef<Path>>(path: P) -> Result<Array2<u8>, LoadError> {
    let path = path.as_ref();
    let img = image::open(path)?;
    let (width, height) = (img.width() as usize, img.height() as usize);
    let raw: Vec<u8> = match img.color() {
        ColorType::L8 | ColorType::La8 => img.into_luma8().into_raw(),
        ColorType::L16 | ColorType::La16 => img
            .into_luma16()
            .into_raw()
            .into_iter()
            .map(|v| {
                u8::try_from(v).map_err(|_| LoadError::LabelOutOfRange {
                    path: path.to_owned(),
                    value: v,
                })
            })
            .collect::<Result<_, _>>()?,
        color => {
            return Err(LoadError::UnsupportedColor {
                path: path.to_owned(),
                color,
            })
        }
    };
    Ok(Array2::from_shape_fn((height, width), |(h, w)| raw[h * width + w]))
}

/// 加载一组标签图像并沿 z 方向堆叠.
///
/// `pattern` 为 glob 路径模式, 匹配到的文件按路径字典序排列, 该顺序即 z 轴顺序.
/// 若 `pattern` 指向单个 `.npy` 文件, 则直接读取其中的 3D 数组.
///
/// 没有匹配项时返回 `Err(EmptyInput)`, 切片形状不一致时返回
/// `Err(Morph(SliceShapeMismatch))`.
pub fn load_volume(pattern: &str) -> Result<LabelVolume, LoadError> {
    let as_path = Path::new(pattern);
    if as_path.extension().is_some_and(|ext| ext == "npy") && as_path.is_file() {
        log::info!("loading volume from `{pattern}`");
        return Ok(LabelVolume::open_npy(as_path)?);
    }

    let paths: Vec<PathBuf> = glob::glob(pattern)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .sorted()
        .collect();
    if paths.is_empty() {
        return Err(LoadError::EmptyInput(pattern.to_owned()));
    }
    log::info!("loading {} slices from `{pattern}`", paths.len());

    let slices = paths.iter().map(load_slice).collect::<Result<Vec<_>, _>>()?;
    Ok(LabelVolume::from_slices(slices)?)
}
