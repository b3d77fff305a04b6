//! 图像的持久化存储.

use crate::{LabelSlice, LabelSliceMut, OwnedLabelSlice};
use image::ImageResult;
use std::path::Path;

/// 表明一个可以通过 **按原样** 模式持久化存储的图像对象.
///
/// 按原样保存的标签图像可以被 [`crate::io::load_volume`] 重新加载.
pub trait ImgWriteRaw {
    /// 按原样将图片保存到 `path` 路径.
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

macro_rules! impl_label_save {
    ($($slice: ty),+) => {
        $(
            /// 按原样存储.
            impl ImgWriteRaw for $slice {
                fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
                    let (height, width) = self.shape();
                    let mut buf = image::GrayImage::new(width as u32, height as u32);
                    for ((h, w), &pix) in self.indexed_iter() {
                        buf.put_pixel(w as u32, h as u32, image::Luma([pix]));
                    }
                    buf.save(path)
                }
            }
        )+
    };
}

impl_label_save!(LabelSlice<'_>, LabelSliceMut<'_>);

impl ImgWriteRaw for OwnedLabelSlice {
    #[inline]
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.as_immut().save_raw(path)
    }
}
