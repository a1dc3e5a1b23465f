use thiserror::Error;

/// 张量层面的错误（与图无关）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}（共{expected}个元素）不符")]
    DataShapeMismatch {
        data_len: usize,
        shape: Vec<usize>,
        expected: usize,
    },
    #[error("张量形状不兼容：无法将形状{from:?}变为{to:?}")]
    IncompatibleShape { from: Vec<usize>, to: Vec<usize> },

    #[error("张量：未知错误")]
    UnKnown,
}
