#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 提供可降解骨钉 µCT 标签体数据的结构化信息和形态学定量算法.
//!
//! 该 crate 仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 输入为已经分割完毕的标签图像栈, 每个体素的值是标签字典中的一个编码.
//!   该 crate 不做图像分割.
//! 2. 所有派生量的除零情形都以 `Err(DivisionByZero)` 报告, 不会返回 inf 或 NaN.
//!
//! # 开发计划
//!
//! ### 标签体数据与标签字典 ✅
//!
//! 五种角色 (背景, 骨钉, 参考骨钉, 降解层, 骨) 与样本自己的整数编码解耦.
//!
//! 实现位于 `screw-berry/src/data` 和 `screw-berry/src/label.rs`.
//!
//! ### 接触计数 ✅
//!
//! 3D 版本统计 z, H, W 三个方向, 逐层版本只统计层内两个方向.
//!
//! 实现位于 `screw-berry/src/morph/contact.rs`.
//!
//! ### ROI 掩膜 ✅
//!
//! 逐层精确欧氏距离变换 (Felzenszwalb & Huttenlocher), 阈值为
//! `round(roi_size / pixel_size)` 个像素.
//!
//! 实现位于 `screw-berry/src/morph/{edt, roi}.rs`.
//!
//! ### 样本派生量 ✅
//!
//! 初始体积, 残余体积, 初始面积, 降解速率, BIC, BV/TV, 以及逐层统计.
//!
//! 实现位于 `screw-berry/src/sample`.
//!
//! ### 加载, 平滑与导出 ✅
//!
//! 1. glob 路径模式加载图像栈, 字典序即 z 轴顺序. ✅
//! 2. 3x3 中值滤波平滑指定标签. ✅
//! 3. CSV 导出逐层统计. ✅
//!
//! 实现位于 `screw-berry/src/io`.
//!
//! ### 3D 欧氏距离变换的 ROI ⌛️
//!
//! 目前 ROI 逐层计算, 层间距离被忽略.

/// 二维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 3D 标签体数据基础数据结构.
mod data;

pub use data::{
    Histogram, ImgWriteRaw, LabelSlice, LabelSliceMut, LabelVolume, OwnedLabelSlice,
};

pub mod consts;

mod error;
pub use error::{MorphError, MorphResult};

pub mod io;
pub mod label;
pub mod morph;
pub mod prelude;
pub mod sample;
